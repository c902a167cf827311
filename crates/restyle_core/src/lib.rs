//! Restyle core: pure request-form state machine and view-model helpers.
mod effect;
mod form;
mod msg;
mod response;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use form::{
    build_request_url, FormInputs, ValidatedInputs, ValidationError, REQUEST_PATH,
    VALIDATION_MESSAGE,
};
pub use msg::Msg;
pub use response::{
    file_saved_message, ApiResponse, ResponseShapeError, SubmitResult, DEFAULT_DOWNLOAD_AGAIN_FILENAME,
    DEFAULT_FILE_FILENAME,
};
pub use state::{AppState, RequestId, RequestState};
pub use update::update;
pub use view_model::{AppViewModel, StatusView, SUBMIT_LABEL_IDLE, SUBMIT_LABEL_LOADING};
