use std::path::PathBuf;

use futures_util::StreamExt;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use restyle_core::{
    build_request_url, ApiResponse, RequestId, ValidatedInputs, DEFAULT_FILE_FILENAME,
};
use restyle_logging::{restyle_debug, restyle_info};
use url::Url;

use crate::classify::{classify_content_type, filename_from_content_disposition, PayloadKind};
use crate::{ApiOutcome, EngineEvent, FailureKind, RequestError, RequestProgress};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
/// Environment variable holding the API base URL.
pub const API_URL_ENV: &str = "RESTYLE_API_URL";
/// Older name of [`API_URL_ENV`], still honoured when the new one is unset.
pub const LEGACY_API_URL_ENV: &str = "NEXT_PUBLIC_API_URL";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub api_base_url: Url,
    pub download_dir: PathBuf,
}

impl ClientSettings {
    pub fn new(api_base_url: &str, download_dir: PathBuf) -> Result<Self, RequestError> {
        let api_base_url = Url::parse(api_base_url.trim()).map_err(|err| {
            RequestError::new(
                FailureKind::InvalidUrl,
                format!("invalid api base url {api_base_url:?}: {err}"),
            )
        })?;
        Ok(Self {
            api_base_url,
            download_dir,
        })
    }

    /// Settings from the environment, falling back to [`DEFAULT_API_BASE_URL`].
    pub fn from_env(download_dir: PathBuf) -> Result<Self, RequestError> {
        let base = Self::resolve_api_base_url(
            std::env::var(API_URL_ENV).ok(),
            std::env::var(LEGACY_API_URL_ENV).ok(),
        );
        Self::new(&base, download_dir)
    }

    /// First non-blank candidate wins.
    pub fn resolve_api_base_url(primary: Option<String>, legacy: Option<String>) -> String {
        [primary, legacy]
            .into_iter()
            .flatten()
            .map(|value| value.trim().to_owned())
            .find(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned())
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub(crate) struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub(crate) fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// The outbound side of the form: one submission call and a plain URL fetch.
#[async_trait::async_trait]
pub trait ApiClient: Send + Sync {
    async fn submit(
        &self,
        request_id: RequestId,
        inputs: &ValidatedInputs,
        sink: &dyn ProgressSink,
    ) -> Result<ApiOutcome, RequestError>;

    /// Fetches `url`, resolved against the API base when relative.
    async fn fetch_url(&self, url: &str) -> Result<Vec<u8>, RequestError>;
}

/// No retries, timeouts or cancellation: each call runs to completion or failure.
#[derive(Debug, Clone)]
pub struct ReqwestApiClient {
    settings: ClientSettings,
}

impl ReqwestApiClient {
    pub fn new(settings: ClientSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, RequestError> {
        reqwest::Client::builder()
            .build()
            .map_err(|err| RequestError::new(FailureKind::Network, err.to_string()))
    }
}

#[async_trait::async_trait]
impl ApiClient for ReqwestApiClient {
    async fn submit(
        &self,
        request_id: RequestId,
        inputs: &ValidatedInputs,
        sink: &dyn ProgressSink,
    ) -> Result<ApiOutcome, RequestError> {
        let url = build_request_url(&self.settings.api_base_url, inputs)
            .map_err(|err| RequestError::new(FailureKind::InvalidUrl, err.to_string()))?;
        restyle_info!("request {} GET {}", request_id, url);
        let client = self.build_client()?;

        let response = client
            .get(url)
            // Informational only; the request has no body.
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RequestError::http_status(status.as_u16()));
        }

        let content_type = header_string(&response, CONTENT_TYPE);
        let disposition = header_string(&response, CONTENT_DISPOSITION);
        let bytes = read_body(Some(request_id), response, sink).await?;
        restyle_debug!(
            "request {} received {} bytes, content-type {:?}",
            request_id,
            bytes.len(),
            content_type
        );

        match classify_content_type(content_type.as_deref()) {
            PayloadKind::File => {
                let filename = filename_from_content_disposition(disposition.as_deref())
                    .unwrap_or_else(|| DEFAULT_FILE_FILENAME.to_owned());
                Ok(ApiOutcome::FileDownload {
                    bytes,
                    filename,
                    content_type: content_type.unwrap_or_default(),
                })
            }
            PayloadKind::Json => {
                let parsed: ApiResponse = serde_json::from_slice(&bytes)
                    .map_err(|err| RequestError::new(FailureKind::InvalidJson, err.to_string()))?;
                Ok(ApiOutcome::StatusResponse(parsed))
            }
        }
    }

    async fn fetch_url(&self, url: &str) -> Result<Vec<u8>, RequestError> {
        let resolved = self
            .settings
            .api_base_url
            .join(url)
            .map_err(|err| RequestError::new(FailureKind::InvalidUrl, err.to_string()))?;
        restyle_info!("GET {}", resolved);
        let client = self.build_client()?;

        let response = client
            .get(resolved)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(RequestError::http_status(status.as_u16()));
        }

        read_body(None, response, &NullSink).await
    }
}

struct NullSink;

impl ProgressSink for NullSink {
    fn emit(&self, _event: EngineEvent) {}
}

fn header_string(response: &reqwest::Response, name: reqwest::header::HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
}

async fn read_body(
    request_id: Option<RequestId>,
    response: reqwest::Response,
    sink: &dyn ProgressSink,
) -> Result<Vec<u8>, RequestError> {
    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(map_reqwest_error)?;
        bytes.extend_from_slice(&chunk);
        if let Some(request_id) = request_id {
            sink.emit(EngineEvent::Progress(RequestProgress {
                request_id,
                bytes: bytes.len() as u64,
            }));
        }
    }
    Ok(bytes)
}

fn map_reqwest_error(err: reqwest::Error) -> RequestError {
    if err.is_builder() {
        return RequestError::new(FailureKind::InvalidUrl, err.to_string());
    }
    RequestError::new(FailureKind::Network, err.to_string())
}
