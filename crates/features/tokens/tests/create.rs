#![cfg(all(unix, feature = "server"))]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use tempfile::TempDir;
use tforge_domain::config::ApiConfig;
use tforge_domain::constants::ADDRESS_RESPONSE_KEY;
use tforge_kernel::server::ApiState;
use tower::ServiceExt;

const TOKEN: &str = "hK7pQ2mW9xZr";
const ADDRESS: &str = "KT1HbQepzV1nVGg8QVznG7z4RcHseD5kwqBn";

const COMPILER_OK: &str = r#"#!/bin/sh
id="${1%.py}"
id="${id#contract_}"
mkdir -p "$id"
echo 'code' > "$id/step_003_cont_0_contract.tz"
echo 'Unit' > "$id/step_003_cont_0_storage.tz"
"#;

struct App {
    router: Router,
    _tools: TempDir,
    _scratch: TempDir,
}

fn script(dir: &TempDir, name: &str, body: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, body).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path.display().to_string()
}

fn app(compiler: &str, deployer: &str, api_token: &str) -> App {
    let tools = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();

    let mut config = ApiConfig::default();
    config.security.api_token = api_token.to_owned();
    config.toolchain.scratch_dir = scratch.path().to_path_buf();
    config.toolchain.compiler.program = script(&tools, "compiler", compiler);
    config.toolchain.deployer.program = script(&tools, "deployer", deployer);

    let slice = tforge_tokens::init(&config).unwrap();
    let state = ApiState::builder().config(config).register_slice(slice).build().unwrap();
    let (router, _api) = tforge_tokens::router::tokens_router().split_for_parts();

    App { router: router.with_state(state), _tools: tools, _scratch: scratch }
}

fn deployed() -> App {
    app(COMPILER_OK, &format!("#!/bin/sh\necho 'New contract {ADDRESS} originated.'\n"), TOKEN)
}

fn body() -> Value {
    json!({
        "token_name": "Demo",
        "symbol": "DMO",
        "initial_supply": 1000,
        "decimals": 6,
        "initial_owner": "tz1VSUr8wwNhLAzempoch5d6hLRiTh8Cjcjb",
        "can_mint": true,
    })
}

async fn post(app: &App, auth: Option<&str>, body: &Value) -> (StatusCode, Value) {
    post_raw(app, auth, body.to_string()).await
}

async fn post_raw(app: &App, auth: Option<&str>, body: String) -> (StatusCode, Value) {
    let mut request = Request::post("/create").header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
        request = request.header(header::AUTHORIZATION, auth);
    }
    let response = app
        .router
        .clone()
        .oneshot(request.body(Body::from(body)).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn deploys_and_returns_the_address() {
    let app = deployed();
    let (status, json) = post(&app, Some(TOKEN), &body()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json[ADDRESS_RESPONSE_KEY], ADDRESS);
    assert_eq!(json["outcome"], "deployed");
    assert_eq!(json["contractId"].as_str().map(str::len), Some(12));
    assert_eq!(json["fingerprint"].as_str().map(str::len), Some(64));
}

#[tokio::test]
async fn bearer_form_is_accepted() {
    let app = deployed();
    let (status, _) = post(&app, Some(&format!("Bearer {TOKEN}")), &body()).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn credentials_are_checked_before_the_body() {
    let app = deployed();
    let (status, json) = post(&app, None, &json!({ "garbage": true })).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "unauthorized");

    let (status, _) = post(&app, Some("wrong"), &body()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn empty_configured_token_rejects_everyone() {
    let app = app(COMPILER_OK, "#!/bin/sh\nexit 0\n", "");
    let (status, _) = post(&app, Some(""), &body()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_selections_are_unprocessable() {
    let app = deployed();
    let mut bad = body();
    bad["decimals"] = json!(0);

    let (status, json) = post(&app, Some(TOKEN), &bad).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"], "validation");
    assert!(json["detail"].as_str().unwrap().contains("decimals"));
}

#[tokio::test]
async fn undecodable_bodies_are_unprocessable() {
    let app = deployed();

    let truncated = body().to_string();
    let truncated = truncated[..truncated.len() / 2].to_owned();
    let (status, json) = post_raw(&app, Some(TOKEN), truncated).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"], "validation");
    assert!(json["detail"].is_string());

    let mut out_of_range = body();
    out_of_range["decimals"] = json!(300);
    let (status, json) = post(&app, Some(TOKEN), &out_of_range).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"], "validation");
    assert!(json["detail"].as_str().unwrap().contains("decimals"));
}

#[tokio::test]
async fn compiler_failures_are_bad_gateway() {
    let app = app("#!/bin/sh\necho 'boom' >&2\nexit 3\n", "#!/bin/sh\nexit 0\n", TOKEN);
    let (status, json) = post(&app, Some(TOKEN), &body()).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["error"], "compile");
}

#[tokio::test]
async fn missing_marker_is_a_null_address() {
    let app = app(COMPILER_OK, "#!/bin/sh\necho 'Fatal error: counter'\n", TOKEN);
    let (status, json) = post(&app, Some(TOKEN), &body()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json[ADDRESS_RESPONSE_KEY].is_null());
    assert_eq!(json["outcome"], "marker_missing");
}
