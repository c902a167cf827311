use restyle_core::{Effect, Msg, SubmitResult};
use restyle_engine::{EngineEvent, EngineHandle, SubmitOutcome};
use restyle_logging::{restyle_info, restyle_warn};

/// Runs core effects on the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Submit { request_id, inputs } => {
                    restyle_info!(
                        "Submit request_id={} input_url={} topic={}",
                        request_id,
                        inputs.input_url(),
                        inputs.topic()
                    );
                    self.engine.submit(request_id, inputs);
                }
                Effect::DownloadUrl { url, filename } => {
                    restyle_info!("DownloadUrl url={} filename={}", url, filename);
                    self.engine.download_url(url, filename);
                }
            }
        }
    }

    /// Blocks for the next engine event. `None` once the engine has stopped.
    pub fn next_msg(&self) -> Option<Msg> {
        self.engine.recv().map(map_event)
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Progress(progress) => Msg::Progress {
            request_id: progress.request_id,
            bytes: progress.bytes,
        },
        EngineEvent::SubmitCompleted { request_id, result } => {
            let result = match result {
                Ok(SubmitOutcome::FileSaved { filename, path }) => {
                    SubmitResult::Saved { filename, path }
                }
                Ok(SubmitOutcome::Status(response)) => SubmitResult::Status(response),
                Err(err) => SubmitResult::Failed(err.to_string()),
            };
            Msg::SubmitDone { request_id, result }
        }
        EngineEvent::DownloadCompleted { url, result } => {
            if let Err(err) = &result {
                restyle_warn!("Download of {} failed: {}", url, err);
            }
            Msg::DownloadAgainDone {
                result: result.map_err(|err| err.to_string()),
            }
        }
    }
}
