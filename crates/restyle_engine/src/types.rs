use std::fmt;
use std::path::PathBuf;

use restyle_core::{ApiResponse, RequestId};

/// The two shapes a successful response can take, decided by its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiOutcome {
    FileDownload {
        bytes: Vec<u8>,
        filename: String,
        content_type: String,
    },
    StatusResponse(ApiResponse),
}

/// What a submission amounted to once any file payload has been written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    FileSaved { filename: String, path: PathBuf },
    Status(ApiResponse),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestProgress {
    pub request_id: RequestId,
    pub bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Progress(RequestProgress),
    SubmitCompleted {
        request_id: RequestId,
        result: Result<SubmitOutcome, RequestError>,
    },
    DownloadCompleted {
        url: String,
        result: Result<PathBuf, RequestError>,
    },
}

/// A failed request. `message` is what the user sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestError {
    pub kind: FailureKind,
    pub message: String,
}

impl RequestError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn http_status(code: u16) -> Self {
        Self::new(
            FailureKind::HttpStatus(code),
            format!("HTTP error! status: {code}"),
        )
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for RequestError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Network,
    InvalidJson,
    Io,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::InvalidJson => write!(f, "invalid json body"),
            FailureKind::Io => write!(f, "io error"),
        }
    }
}
