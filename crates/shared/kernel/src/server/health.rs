use axum::http::header;
use axum::{Json, response::IntoResponse};
use std::sync::LazyLock;
use std::time::Instant;
use tforge_derive::{api_handler, api_model};
use tforge_domain::constants::SYSTEM_TAG;

#[api_model]
/// Liveness report
pub(crate) struct HealthResponse {
    /// Always `up` while the process serves requests
    status: String,
    version: String,
    /// Seconds since the first health probe
    uptime: u64,
}

static START_TIME: LazyLock<Instant> = LazyLock::new(Instant::now);

#[api_handler(
    get,
    path = "/health",
    responses((status = OK, description = "Liveness probe", body = HealthResponse)),
    tag = SYSTEM_TAG,
)]
pub(super) async fn health_handler() -> impl IntoResponse {
    let body = HealthResponse {
        status: "up".to_owned(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
        uptime: START_TIME.elapsed().as_secs(),
    };

    ([(header::CACHE_CONTROL, "no-store, no-cache, must-revalidate")], Json(body))
}
