// tests/client_tests.rs
use graphlens::client::AnalyzeClient;
use graphlens::models::{
    ErrorResponse, ANALYSIS_FAILED_MESSAGE, CONNECTION_FAILURE_MESSAGE, UNEXPECTED_FORMAT_MESSAGE,
};
use graphlens::render::render_state;
use graphlens::session::{AnalysisState, Session};
use graphlens::upload::ImageUpload;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PNG_BYTES: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

fn png_upload() -> Option<ImageUpload> {
    ImageUpload::capture("recta.png", None, PNG_BYTES.to_vec())
}

async fn server_replying(reply: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .respond_with(reply)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_straight_line_scenario_renders_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .and(body_partial_json(json!({"image": "data:image/png;base64,iVBORw0KGgo="})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "equation": "y = 2x + 1",
            "graphType": "lineal",
            "steps": [{"title": "Paso 1", "description": "..."}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = AnalyzeClient::new(server.uri());
    let mut session = Session::new();

    assert!(client.submit(&mut session, png_upload()).await.unwrap());

    let AnalysisState::Result { result, .. } = session.state() else {
        panic!("expected a result, got {:?}", session.state());
    };
    assert_eq!(result.steps.len(), 1);

    let screen = render_state(session.state());
    assert!(screen.contains("y = 2x + 1"));
    assert!(screen.contains(" 1. Paso 1"));
}

#[tokio::test]
async fn test_missing_field_goes_to_error_not_result() {
    let server = server_replying(ResponseTemplate::new(200).set_body_json(json!({
        "equation": "y = 2x + 1",
        "steps": []
    })))
    .await;

    let client = AnalyzeClient::new(server.uri());
    let mut session = Session::new();
    client.submit(&mut session, png_upload()).await.unwrap();

    match session.state() {
        AnalysisState::Error { message, .. } => assert_eq!(message, UNEXPECTED_FORMAT_MESSAGE),
        other => panic!("expected an error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_server_error_message_is_shown() {
    let server = server_replying(
        ResponseTemplate::new(500).set_body_json(ErrorResponse::analysis_failed("Received empty text response from model")),
    )
    .await;

    let client = AnalyzeClient::new(server.uri());
    let mut session = Session::new();
    client.submit(&mut session, png_upload()).await.unwrap();

    assert_eq!(
        session.state(),
        &AnalysisState::Error {
            image: "data:image/png;base64,iVBORw0KGgo=".to_string(),
            message: ANALYSIS_FAILED_MESSAGE.to_string(),
        }
    );

    session.reset();
    assert_eq!(session.state(), &AnalysisState::Idle);
}

#[tokio::test]
async fn test_non_json_body_is_a_connection_error() {
    let server = server_replying(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>")).await;

    let client = AnalyzeClient::new(server.uri());
    assert_eq!(
        client.request_analysis("data:image/png;base64,iVBORw0KGgo=").await.unwrap_err(),
        CONNECTION_FAILURE_MESSAGE
    );
}

#[tokio::test]
async fn test_unreachable_server_is_a_connection_error() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let client = AnalyzeClient::new(uri);
    let mut session = Session::new();
    client.submit(&mut session, png_upload()).await.unwrap();

    match session.state() {
        AnalysisState::Error { message, .. } => assert_eq!(message, CONNECTION_FAILURE_MESSAGE),
        other => panic!("expected an error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_image_upload_keeps_session_idle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = AnalyzeClient::new(server.uri());
    let mut session = Session::new();
    let upload = ImageUpload::capture("datos.csv", None, b"x,y\n1,3\n".to_vec());

    assert!(!client.submit(&mut session, upload).await.unwrap());
    assert_eq!(session.state(), &AnalysisState::Idle);
}

#[tokio::test]
async fn test_submit_is_rejected_until_reset() {
    let server = server_replying(ResponseTemplate::new(200).set_body_json(json!({
        "equation": "y = x^2",
        "graphType": "cuadrática",
        "steps": []
    })))
    .await;

    let client = AnalyzeClient::new(format!("{}/", server.uri()));
    let mut session = Session::new();
    client.submit(&mut session, png_upload()).await.unwrap();
    assert_eq!(session.state().name(), "result");

    assert!(client.submit(&mut session, png_upload()).await.is_err());
    assert_eq!(session.state().name(), "result");

    session.reset();
    client.submit(&mut session, png_upload()).await.unwrap();
    assert_eq!(session.state().name(), "result");
}

#[tokio::test]
async fn test_progress_hook_sees_the_analyzing_state() {
    let server = server_replying(ResponseTemplate::new(200).set_body_json(json!({
        "equation": "y = 2x + 1",
        "graphType": "lineal",
        "steps": []
    })))
    .await;

    let client = AnalyzeClient::new(server.uri());
    let mut session = Session::new();
    let mut seen = None;

    client
        .submit_with_progress(&mut session, png_upload(), |state| seen = Some(state.clone()))
        .await
        .unwrap();

    assert_eq!(
        seen,
        Some(AnalysisState::Analyzing { image: "data:image/png;base64,iVBORw0KGgo=".to_string() })
    );
    assert!(render_state(seen.as_ref().unwrap()).starts_with("Analizando gráfica..."));
    assert_eq!(session.state().name(), "result");
}

#[tokio::test]
async fn test_progress_hook_is_skipped_for_non_images() {
    let client = AnalyzeClient::new("http://127.0.0.1:9");
    let mut session = Session::new();
    let mut called = false;

    let upload = ImageUpload::capture("notas.txt", None, b"hola".to_vec());
    let submitted = client
        .submit_with_progress(&mut session, upload, |_| called = true)
        .await
        .unwrap();

    assert!(!submitted);
    assert!(!called);
    assert_eq!(session.state(), &AnalysisState::Idle);
}
