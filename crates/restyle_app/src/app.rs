use std::process::ExitCode;

use anyhow::Context;
use restyle_core::{
    update, AppState, AppViewModel, Effect, Msg, RequestState, StatusView, SubmitResult,
};
use restyle_engine::{ClientSettings, EngineHandle};
use restyle_logging::{restyle_info, restyle_warn};

use crate::cli::Cli;
use crate::effects::EffectRunner;
use crate::ui::render::render;
use crate::ui::terminal::Terminal;

const ENGINE_STOPPED: &str = "engine stopped";

pub fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let settings = match &cli.api_url {
        Some(api_url) => ClientSettings::new(api_url, cli.output_dir.clone()),
        None => ClientSettings::from_env(cli.output_dir.clone()),
    }
    .context("invalid service configuration")?;
    restyle_info!(
        "api base url {} saving to {:?}",
        settings.api_base_url,
        settings.download_dir
    );

    let engine = EngineHandle::new(settings).context("failed to start engine")?;
    let mut app = App::new(EffectRunner::new(engine));
    Ok(app.execute(cli))
}

struct App {
    state: AppState,
    runner: EffectRunner,
    terminal: Terminal,
    awaiting_download: bool,
}

impl App {
    fn new(runner: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            runner,
            terminal: Terminal::new(),
            awaiting_download: false,
        }
    }

    /// Fills the form from the command line, submits, waits for the outcome
    /// and optionally repeats the download.
    fn execute(&mut self, cli: &Cli) -> ExitCode {
        self.dispatch(Msg::InputUrlChanged(cli.input_url.clone().unwrap_or_default()));
        self.dispatch(Msg::TopicChanged(cli.topic.clone().unwrap_or_default()));
        self.dispatch(Msg::SubmitClicked);
        self.pump();

        if cli.download_again {
            if self.state.view().can_download_again {
                self.dispatch(Msg::DownloadAgainClicked);
                self.pump();
            } else {
                restyle_warn!("--download-again given but the response offers no download_url");
            }
        }

        exit_code(&self.state.view())
    }

    fn dispatch(&mut self, msg: Msg) {
        if matches!(msg, Msg::DownloadAgainDone { .. }) {
            self.awaiting_download = false;
        }
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        let view = state.view();
        self.state = state;
        if effects
            .iter()
            .any(|effect| matches!(effect, Effect::DownloadUrl { .. }))
        {
            self.awaiting_download = true;
        }
        self.runner.enqueue(effects);

        if was_dirty {
            self.terminal.show(render(&view));
        }
    }

    /// Feeds engine events into `update` while a submission or repeat download
    /// is outstanding.
    fn pump(&mut self) {
        while self.state.is_loading() || self.awaiting_download {
            let Some(msg) = self.runner.next_msg() else {
                restyle_warn!("engine stopped before the request completed");
                self.abandon_outstanding();
                break;
            };
            self.dispatch(msg);
        }
    }

    /// Completes whatever is still in flight with an error.
    fn abandon_outstanding(&mut self) {
        if let RequestState::Loading { request_id } = *self.state.request() {
            self.dispatch(Msg::SubmitDone {
                request_id,
                result: SubmitResult::Failed(ENGINE_STOPPED.to_owned()),
            });
        }
        if self.awaiting_download {
            self.dispatch(Msg::DownloadAgainDone {
                result: Err(ENGINE_STOPPED.to_owned()),
            });
        }
    }
}

fn exit_code(view: &AppViewModel) -> ExitCode {
    match view.status {
        StatusView::Success { .. } => ExitCode::SUCCESS,
        StatusView::None | StatusView::Error(_) | StatusView::Response(_) => ExitCode::FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;

    use clap::Parser;
    use pretty_assertions::assert_eq;
    use restyle_core::{ApiResponse, RequestId, ValidatedInputs};
    use restyle_engine::{
        ApiClient, ApiOutcome, AtomicFileWriter, FailureKind, ProgressSink, RequestError,
    };
    use tempfile::TempDir;

    use super::*;

    /// Answers by topic; `hang` never completes.
    struct StubClient;

    #[async_trait::async_trait]
    impl ApiClient for StubClient {
        async fn submit(
            &self,
            _request_id: RequestId,
            inputs: &ValidatedInputs,
            _sink: &dyn ProgressSink,
        ) -> Result<ApiOutcome, RequestError> {
            match inputs.topic() {
                "status" => Ok(ApiOutcome::StatusResponse(ApiResponse {
                    success: true,
                    message: Some("done".to_string()),
                    download_url: Some("/files/page.html".to_string()),
                    filename: Some("page.html".to_string()),
                    ..ApiResponse::default()
                })),
                "refused" => Ok(ApiOutcome::StatusResponse(ApiResponse {
                    success: false,
                    error: Some("File not found: page.html".to_string()),
                    ..ApiResponse::default()
                })),
                "hang" => std::future::pending().await,
                _ => Err(RequestError {
                    kind: FailureKind::HttpStatus(500),
                    message: "HTTP error! status: 500".to_string(),
                }),
            }
        }

        async fn fetch_url(&self, url: &str) -> Result<Vec<u8>, RequestError> {
            if url.ends_with("page.html") {
                Ok(b"<html>again</html>".to_vec())
            } else {
                Err(RequestError {
                    kind: FailureKind::Network,
                    message: "unreachable".to_string(),
                })
            }
        }
    }

    fn app_in(dir: &TempDir) -> App {
        let writer = AtomicFileWriter::new(dir.path().to_path_buf());
        let engine = EngineHandle::with_client(Arc::new(StubClient), writer).unwrap();
        App::new(EffectRunner::new(engine))
    }

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("restyle").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn success_view_exits_zero() {
        let temp = TempDir::new().unwrap();
        let mut app = app_in(&temp);

        let code = app.execute(&cli(&["https://example.com", "status"]));

        assert_eq!(code, ExitCode::SUCCESS);
        assert!(!app.state.is_loading());
        assert!(matches!(app.state.view().status, StatusView::Success { .. }));
    }

    #[test]
    fn request_error_exits_one() {
        let temp = TempDir::new().unwrap();
        let mut app = app_in(&temp);

        let code = app.execute(&cli(&["https://example.com", "boom"]));

        assert_eq!(code, ExitCode::FAILURE);
        assert_eq!(
            app.state.view().status,
            StatusView::Error("HTTP error! status: 500".to_string())
        );
    }

    #[test]
    fn unsuccessful_response_exits_one() {
        let temp = TempDir::new().unwrap();
        let mut app = app_in(&temp);

        let code = app.execute(&cli(&["https://example.com", "refused"]));

        assert_eq!(code, ExitCode::FAILURE);
        assert_eq!(
            app.state.view().status,
            StatusView::Response("File not found: page.html".to_string())
        );
    }

    #[test]
    fn missing_topic_exits_one_without_waiting() {
        let temp = TempDir::new().unwrap();
        let mut app = app_in(&temp);

        let code = app.execute(&cli(&["https://example.com"]));

        assert_eq!(code, ExitCode::FAILURE);
        assert_eq!(
            app.state.view().status,
            StatusView::Error("Please provide both URL and topic".to_string())
        );
    }

    #[test]
    fn download_again_waits_for_the_saved_file() {
        let temp = TempDir::new().unwrap();
        let mut app = app_in(&temp);

        let code = app.execute(&cli(&["https://example.com", "status", "--download-again"]));

        assert_eq!(code, ExitCode::SUCCESS);
        assert!(!app.awaiting_download);
        let saved = temp.path().join("page.html");
        assert_eq!(
            app.state.view().download_notice,
            Some(format!("Saved again to {}", saved.display()))
        );
        assert_eq!(fs::read_to_string(saved).unwrap(), "<html>again</html>");
    }

    #[test]
    fn abandoned_request_shows_engine_stopped() {
        let temp = TempDir::new().unwrap();
        let mut app = app_in(&temp);
        app.dispatch(Msg::InputUrlChanged("https://example.com".to_string()));
        app.dispatch(Msg::TopicChanged("hang".to_string()));
        app.dispatch(Msg::SubmitClicked);
        assert!(app.state.is_loading());

        app.abandon_outstanding();

        assert!(!app.state.is_loading());
        assert_eq!(
            app.state.view().status,
            StatusView::Error("engine stopped".to_string())
        );
        assert_eq!(exit_code(&app.state.view()), ExitCode::FAILURE);
    }
}
