use crate::{AppState, Effect, Msg};

/// Message shown when a repeat download fails, whatever the cause.
const DOWNLOAD_AGAIN_FAILED: &str = "Failed to download file";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputUrlChanged(value) => {
            state.set_input_url(value);
            Vec::new()
        }
        Msg::TopicChanged(value) => {
            state.set_topic(value);
            Vec::new()
        }
        Msg::SubmitClicked => {
            // One submission at a time; the completion clears the loading state.
            if state.is_loading() {
                return (state, Vec::new());
            }
            match state.inputs().validate() {
                Ok(inputs) => {
                    let request_id = state.begin_request();
                    vec![Effect::Submit { request_id, inputs }]
                }
                Err(err) => {
                    state.fail_validation(err.to_string());
                    Vec::new()
                }
            }
        }
        Msg::Progress { request_id, bytes } => {
            state.apply_progress(request_id, bytes);
            Vec::new()
        }
        Msg::SubmitDone { request_id, result } => {
            state.finish_request(request_id, result);
            Vec::new()
        }
        Msg::DownloadAgainClicked => match state.request().download_again_target() {
            Some((url, filename)) => vec![Effect::DownloadUrl { url, filename }],
            None => Vec::new(),
        },
        Msg::DownloadAgainDone { result } => {
            let notice = match result {
                Ok(path) => format!("Saved again to {}", path.display()),
                Err(_) => DOWNLOAD_AGAIN_FAILED.to_owned(),
            };
            state.set_download_notice(notice);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
