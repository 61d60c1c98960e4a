use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tempfile::TempDir;
use tforge::domain::config::ApiConfig;
use tforge_server::Server;
use tower::ServiceExt;

async fn server(cors_permissive: bool) -> (Server, TempDir) {
    let scratch = tempfile::tempdir().unwrap();
    let mut config = ApiConfig::default();
    config.security.api_token = "hK7pQ2mW9xZr".to_owned();
    config.server.cors_permissive = cors_permissive;
    config.toolchain.scratch_dir = scratch.path().to_path_buf();

    (Server::builder().config(config).build().await.unwrap(), scratch)
}

#[tokio::test]
async fn registers_the_tokens_slice() {
    let (server, _scratch) = server(true).await;
    assert_eq!(server.state().slice_names(), vec!["Tokens"]);
}

#[tokio::test]
async fn serves_health_and_api_reference() {
    let (server, _scratch) = server(true).await;

    let health = server
        .router()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(health.status(), StatusCode::OK);

    let docs = server
        .router()
        .oneshot(Request::get("/api").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(docs.status(), StatusCode::OK);
    let html = axum::body::to_bytes(docs.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&html).contains("/create"));
}

#[tokio::test]
async fn create_requires_the_api_token() {
    let (server, _scratch) = server(true).await;
    let response = server
        .router()
        .oneshot(
            Request::post("/create")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "unauthorized");
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn cors_follows_configuration() {
    for (permissive, expected) in [(true, Some("*")), (false, None)] {
        let (server, _scratch) = server(permissive).await;
        let response = server
            .router()
            .oneshot(
                Request::get("/health")
                    .header(header::ORIGIN, "https://wallet.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let allow = response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok());
        assert_eq!(allow, expected);
    }
}

#[tokio::test]
async fn missing_tls_files_fail_the_build() {
    let mut config = ApiConfig::default();
    config.server.ssl = Some(tforge::domain::config::SslConfig {
        cert: "/nonexistent/cert.pem".into(),
        key: "/nonexistent/key.pem".into(),
    });
    let err = Server::builder().config(config).build().await.unwrap_err();
    assert!(err.to_string().contains("SSL certificate not found"));
}
