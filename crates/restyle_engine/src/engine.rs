use std::io;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;

use restyle_core::{RequestId, ValidatedInputs};
use restyle_logging::{restyle_info, restyle_warn};

use crate::fetch::{ApiClient, ChannelProgressSink, ClientSettings, ReqwestApiClient};
use crate::{
    ApiOutcome, AtomicFileWriter, EngineEvent, FailureKind, RequestError, SubmitOutcome,
};

enum EngineCommand {
    Submit {
        request_id: RequestId,
        inputs: ValidatedInputs,
    },
    DownloadUrl {
        url: String,
        filename: String,
    },
}

/// Background worker owning the async runtime. Commands go in, [`EngineEvent`]s come out.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings) -> io::Result<Self> {
        let writer = AtomicFileWriter::new(settings.download_dir.clone());
        let client: Arc<dyn ApiClient> = Arc::new(ReqwestApiClient::new(settings));
        Self::with_client(client, writer)
    }

    /// Builds a handle around any [`ApiClient`], e.g. a stub in tests.
    pub fn with_client(client: Arc<dyn ApiClient>, writer: AtomicFileWriter) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;
        let writer = Arc::new(writer);

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let client = client.clone();
                let writer = writer.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(client.as_ref(), writer.as_ref(), command, event_tx).await;
                });
            }
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn submit(&self, request_id: RequestId, inputs: ValidatedInputs) {
        let _ = self
            .cmd_tx
            .send(EngineCommand::Submit { request_id, inputs });
    }

    pub fn download_url(&self, url: impl Into<String>, filename: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::DownloadUrl {
            url: url.into(),
            filename: filename.into(),
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Blocks until the next event. `None` once the worker has gone away.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }
}

async fn handle_command(
    client: &dyn ApiClient,
    writer: &AtomicFileWriter,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Submit { request_id, inputs } => {
            let sink = ChannelProgressSink::new(event_tx.clone());
            let result = match client.submit(request_id, &inputs, &sink).await {
                Ok(outcome) => save_outcome(writer, outcome),
                Err(err) => Err(err),
            };
            if let Err(err) = &result {
                restyle_warn!("request {} failed ({}): {}", request_id, err.kind, err);
            }
            let _ = event_tx.send(EngineEvent::SubmitCompleted { request_id, result });
        }
        EngineCommand::DownloadUrl { url, filename } => {
            let result = match client.fetch_url(&url).await {
                Ok(bytes) => save_bytes(writer, &filename, &bytes),
                Err(err) => Err(err),
            };
            if let Err(err) = &result {
                restyle_warn!("download of {} failed ({}): {}", url, err.kind, err);
            }
            let _ = event_tx.send(EngineEvent::DownloadCompleted { url, result });
        }
    }
}

fn save_outcome(
    writer: &AtomicFileWriter,
    outcome: ApiOutcome,
) -> Result<SubmitOutcome, RequestError> {
    match outcome {
        ApiOutcome::FileDownload {
            bytes,
            filename,
            content_type,
        } => {
            let path = save_bytes(writer, &filename, &bytes)?;
            restyle_info!(
                "saved {} bytes of {} as {}",
                bytes.len(),
                content_type,
                path.display()
            );
            Ok(SubmitOutcome::FileSaved { filename, path })
        }
        ApiOutcome::StatusResponse(response) => Ok(SubmitOutcome::Status(response)),
    }
}

fn save_bytes(
    writer: &AtomicFileWriter,
    filename: &str,
    bytes: &[u8],
) -> Result<PathBuf, RequestError> {
    writer
        .write(filename, bytes)
        .map_err(|err| RequestError::new(FailureKind::Io, err.to_string()))
}
