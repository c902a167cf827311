//! Restyle engine: outbound request, response classification and file saves.
mod classify;
mod engine;
mod fetch;
mod filename;
mod persist;
mod types;

pub use classify::{classify_content_type, filename_from_content_disposition, PayloadKind};
pub use engine::EngineHandle;
pub use fetch::{
    ApiClient, ClientSettings, ProgressSink, ReqwestApiClient, API_URL_ENV, DEFAULT_API_BASE_URL,
    LEGACY_API_URL_ENV,
};
pub use filename::safe_filename;
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use types::{
    ApiOutcome, EngineEvent, FailureKind, RequestError, RequestProgress, SubmitOutcome,
};
