use std::path::{Path, PathBuf};

use crate::{FormInputs, RequestState};

pub const SUBMIT_LABEL_IDLE: &str = "Generate Download for HTML Preview";
pub const SUBMIT_LABEL_LOADING: &str = "Processing...";

const SUCCESS_FALLBACK_MESSAGE: &str = "File processed successfully";

/// What the result area of the form shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusView {
    #[default]
    None,
    Error(String),
    Success {
        message: String,
        filename: Option<String>,
        download_url: Option<String>,
        saved_path: Option<PathBuf>,
    },
    /// A parsed response with `success: false`: the remote error, or the raw JSON.
    Response(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub input_url: String,
    pub topic: String,
    pub loading: bool,
    /// Body bytes received so far while loading.
    pub received_bytes: Option<u64>,
    pub submit_label: &'static str,
    pub status: StatusView,
    pub can_download_again: bool,
    pub download_notice: Option<String>,
    pub dirty: bool,
}

impl AppViewModel {
    pub(crate) fn from_parts(
        inputs: &FormInputs,
        request: &RequestState,
        saved_path: Option<&Path>,
        received_bytes: Option<u64>,
        download_notice: Option<&str>,
        dirty: bool,
    ) -> Self {
        let loading = matches!(request, RequestState::Loading { .. });
        let status = match request {
            RequestState::Idle | RequestState::Loading { .. } => StatusView::None,
            RequestState::Error(message) => StatusView::Error(message.clone()),
            RequestState::Success(response) if response.success => StatusView::Success {
                message: response
                    .message
                    .clone()
                    .filter(|message| !message.is_empty())
                    .unwrap_or_else(|| SUCCESS_FALLBACK_MESSAGE.to_owned()),
                filename: response.filename.clone(),
                download_url: response.download_url.clone(),
                saved_path: saved_path.map(Path::to_path_buf),
            },
            RequestState::Success(response) => StatusView::Response(
                response
                    .error
                    .clone()
                    .filter(|error| !error.is_empty())
                    .unwrap_or_else(|| response.to_json()),
            ),
        };

        Self {
            input_url: inputs.input_url.clone(),
            topic: inputs.topic.clone(),
            loading,
            received_bytes: received_bytes.filter(|_| loading),
            submit_label: if loading {
                SUBMIT_LABEL_LOADING
            } else {
                SUBMIT_LABEL_IDLE
            },
            can_download_again: request.download_again_target().is_some(),
            status,
            download_notice: download_notice.map(ToOwned::to_owned),
            dirty,
        }
    }
}
