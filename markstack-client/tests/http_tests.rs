use markstack_client::{operation, ClientConfig, ClientError, HttpTransport, Transport};
use markstack_types::EntityId;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn transport(server: &MockServer) -> HttpTransport {
    HttpTransport::new(ClientConfig {
        endpoint: format!("{}/graphql", server.uri()),
        timeout_ms: 2_000,
        ..Default::default()
    })
    .unwrap()
}

#[tokio::test]
async fn posts_document_and_returns_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({
            "operationName": "createBookmark",
            "variables": {"folderId": 5, "url": "https://rust-lang.org"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"createBookmark": {"__typename": "BaseError", "path": null, "message": "nope"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let data = transport(&server)
        .send(&operation::create_bookmark(EntityId::new(5), "https://rust-lang.org"))
        .await
        .unwrap();
    assert_eq!(data["createBookmark"]["message"], "nope");
}

#[tokio::test]
async fn bearer_token_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"bookmarks": null}})))
        .expect(1)
        .mount(&server)
        .await;

    let t = transport(&server);
    t.set_token(Some("secret".into())).await;
    t.send(&operation::all_bookmarks()).await.unwrap();
}

#[tokio::test]
async fn graphql_errors_become_client_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{"message": "Cannot query field \"foo\""}, {"message": "second"}]
        })))
        .mount(&server)
        .await;

    let err = transport(&server).send(&operation::all_bookmarks()).await.unwrap_err();
    match err {
        ClientError::GraphQl(msg) => assert_eq!(msg, "Cannot query field \"foo\"; second"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn server_error_status_is_retryable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let err = transport(&server).send(&operation::all_bookmarks()).await.unwrap_err();
    assert!(matches!(err, ClientError::Status { status: 503, .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn client_error_status_is_not_retryable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad query"))
        .mount(&server)
        .await;

    let err = transport(&server).send(&operation::all_bookmarks()).await.unwrap_err();
    match &err {
        ClientError::Status { status, body } => {
            assert_eq!(*status, 400);
            assert_eq!(body, "bad query");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn missing_data_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let err = transport(&server).send(&operation::all_bookmarks()).await.unwrap_err();
    assert!(matches!(err, ClientError::MissingData(_)));
}

#[tokio::test]
async fn slow_backend_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": {}}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let t = HttpTransport::new(ClientConfig {
        endpoint: format!("{}/graphql", server.uri()),
        timeout_ms: 50,
        ..Default::default()
    })
    .unwrap();
    let err = t.send(&operation::all_bookmarks()).await.unwrap_err();
    assert!(matches!(err, ClientError::Timeout));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let t = HttpTransport::new(ClientConfig {
        endpoint: "http://127.0.0.1:9/graphql".into(),
        timeout_ms: 2_000,
        ..Default::default()
    })
    .unwrap();
    let err = t.send(&operation::all_bookmarks()).await.unwrap_err();
    assert!(err.is_retryable(), "got {err:?}");
}

#[test]
fn invalid_endpoint_is_rejected() {
    let err = HttpTransport::new(ClientConfig {
        endpoint: "localhost:4000".into(),
        ..Default::default()
    })
    .err()
    .unwrap();
    assert!(matches!(err, ClientError::Config(_)));
}
