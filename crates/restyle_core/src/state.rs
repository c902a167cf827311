use std::path::PathBuf;

use crate::view_model::AppViewModel;
use crate::{ApiResponse, FormInputs, SubmitResult};

pub type RequestId = u64;

/// Exactly one of these is active at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Loading {
        request_id: RequestId,
    },
    Success(ApiResponse),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    inputs: FormInputs,
    request: RequestState,
    saved_path: Option<PathBuf>,
    received_bytes: Option<u64>,
    download_notice: Option<String>,
    next_request_id: RequestId,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inputs(&self) -> &FormInputs {
        &self.inputs
    }

    pub fn request(&self) -> &RequestState {
        &self.request
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.request, RequestState::Loading { .. })
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel::from_parts(
            &self.inputs,
            &self.request,
            self.saved_path.as_deref(),
            self.received_bytes,
            self.download_notice.as_deref(),
            self.dirty,
        )
    }

    /// Returns whether the view changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_input_url(&mut self, value: String) {
        if self.inputs.input_url != value {
            self.inputs.input_url = value;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_topic(&mut self, value: String) {
        if self.inputs.topic != value {
            self.inputs.topic = value;
            self.mark_dirty();
        }
    }

    pub(crate) fn fail_validation(&mut self, message: String) {
        self.request = RequestState::Error(message);
        self.saved_path = None;
        self.download_notice = None;
        self.mark_dirty();
    }

    /// Enters `Loading` under a fresh request id; previous results are cleared.
    pub(crate) fn begin_request(&mut self) -> RequestId {
        self.next_request_id += 1;
        let request_id = self.next_request_id;
        self.request = RequestState::Loading { request_id };
        self.saved_path = None;
        self.received_bytes = None;
        self.download_notice = None;
        self.mark_dirty();
        request_id
    }

    pub(crate) fn apply_progress(&mut self, request_id: RequestId, bytes: u64) {
        let in_flight = self.request == RequestState::Loading { request_id };
        if in_flight && self.received_bytes != Some(bytes) {
            self.received_bytes = Some(bytes);
            self.mark_dirty();
        }
    }

    /// Applies a completion. Returns `false` when the id is not the one in flight.
    pub(crate) fn finish_request(&mut self, request_id: RequestId, result: SubmitResult) -> bool {
        match self.request {
            RequestState::Loading { request_id: current } if current == request_id => {}
            _ => return false,
        }
        self.received_bytes = None;
        self.request = match result {
            SubmitResult::Saved { filename, path } => {
                self.saved_path = Some(path);
                RequestState::Success(ApiResponse::file_saved(&filename))
            }
            SubmitResult::Status(response) => RequestState::Success(response),
            SubmitResult::Failed(message) => RequestState::Error(message),
        };
        self.mark_dirty();
        true
    }

    /// Sets the line shown under the response after a repeat download.
    pub(crate) fn set_download_notice(&mut self, notice: String) {
        self.download_notice = Some(notice);
        self.mark_dirty();
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

impl RequestState {
    /// The `(url, filename)` pair the repeat-download action would use, if offered.
    pub fn download_again_target(&self) -> Option<(String, String)> {
        match self {
            RequestState::Success(response) if response.success => {
                let url = response.download_url.clone()?;
                let filename = response
                    .filename
                    .clone()
                    .unwrap_or_else(|| crate::DEFAULT_DOWNLOAD_AGAIN_FILENAME.to_owned());
                Some((url, filename))
            }
            _ => None,
        }
    }
}
