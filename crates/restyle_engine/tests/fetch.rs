use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use restyle_core::FormInputs;
use restyle_engine::{
    ApiClient, ApiOutcome, ClientSettings, EngineEvent, FailureKind, ProgressSink,
    ReqwestApiClient, DEFAULT_API_BASE_URL,
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct TestSink {
    events: Arc<Mutex<Vec<EngineEvent>>>,
}

impl TestSink {
    fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn take(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn client_for(server: &MockServer) -> ReqwestApiClient {
    let settings = ClientSettings::new(&server.uri(), PathBuf::from("unused")).unwrap();
    ReqwestApiClient::new(settings)
}

fn inputs() -> restyle_core::ValidatedInputs {
    FormInputs::new(" https://example.com ", " cats ")
        .validate()
        .unwrap()
}

#[tokio::test]
async fn json_response_is_adopted_as_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/input_url"))
        .and(query_param("input_url", "https://example.com"))
        .and(query_param("topic", "cats"))
        .and(header("content-type", "application/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"success": true, "message": "done"}"#, "application/json"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let sink = TestSink::new();
    let outcome = client.submit(1, &inputs(), &sink).await.expect("submit ok");

    match outcome {
        ApiOutcome::StatusResponse(response) => {
            assert!(response.success);
            assert_eq!(response.message.as_deref(), Some("done"));
            assert_eq!(response.download_url, None);
        }
        other => panic!("expected status response, got {other:?}"),
    }
    assert!(!sink.take().is_empty());
}

#[tokio::test]
async fn html_response_becomes_file_download_with_header_filename() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/input_url"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<html>cats</html>", "text/html; charset=utf-8")
                .insert_header(
                    "content-disposition",
                    r#"attachment; filename="example.com_.html""#,
                ),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let sink = TestSink::new();
    let outcome = client.submit(2, &inputs(), &sink).await.expect("submit ok");

    assert_eq!(
        outcome,
        ApiOutcome::FileDownload {
            bytes: b"<html>cats</html>".to_vec(),
            filename: "example.com_.html".to_string(),
            content_type: "text/html; charset=utf-8".to_string(),
        }
    );
}

#[tokio::test]
async fn file_without_disposition_defaults_to_download_html() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/input_url"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![1u8, 2, 3], "application/pdf"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let outcome = client
        .submit(3, &inputs(), &TestSink::new())
        .await
        .expect("submit ok");

    match outcome {
        ApiOutcome::FileDownload { filename, bytes, .. } => {
            assert_eq!(filename, "download.html");
            assert_eq!(bytes, vec![1, 2, 3]);
        }
        other => panic!("expected file download, got {other:?}"),
    }
}

#[tokio::test]
async fn non_success_status_reports_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/input_url"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .submit(4, &inputs(), &TestSink::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::HttpStatus(503));
    assert!(err.to_string().contains("503"));
    assert_eq!(err.message, "HTTP error! status: 503");
}

#[tokio::test]
async fn malformed_json_is_a_request_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/input_url"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("not json", "application/json"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .submit(5, &inputs(), &TestSink::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::InvalidJson);
    assert!(!err.message.is_empty());
}

#[tokio::test]
async fn loosely_typed_json_keeps_the_received_object() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/input_url"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"status": "queued", "message": 7, "success": null}"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let outcome = client.submit(6, &inputs(), &TestSink::new()).await.unwrap();

    match outcome {
        ApiOutcome::StatusResponse(response) => {
            assert!(!response.success);
            assert_eq!(response.message, None);
            assert_eq!(
                response.to_json(),
                r#"{"status":"queued","message":7,"success":null}"#
            );
        }
        other => panic!("expected status response, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let settings = ClientSettings::new("http://127.0.0.1:9", PathBuf::from("unused")).unwrap();
    let client = ReqwestApiClient::new(settings);

    let err = client
        .submit(6, &inputs(), &TestSink::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Network);
}

#[tokio::test]
async fn fetch_url_resolves_relative_paths_against_base() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files/out.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("again"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let bytes = client.fetch_url("/files/out.html").await.expect("fetch ok");
    assert_eq!(bytes, b"again");

    let absolute = format!("{}/files/out.html", server.uri());
    let bytes = client.fetch_url(&absolute).await.expect("fetch ok");
    assert_eq!(bytes, b"again");
}

#[test]
fn base_url_resolution_prefers_first_non_blank() {
    assert_eq!(
        ClientSettings::resolve_api_base_url(None, None),
        DEFAULT_API_BASE_URL
    );
    assert_eq!(
        ClientSettings::resolve_api_base_url(Some("  ".to_string()), Some("http://b".to_string())),
        "http://b"
    );
    assert_eq!(
        ClientSettings::resolve_api_base_url(
            Some("http://a".to_string()),
            Some("http://b".to_string())
        ),
        "http://a"
    );
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = ClientSettings::new("not a url", PathBuf::from("unused")).unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}
