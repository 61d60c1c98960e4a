use crate::handlers;
use tforge_kernel::server::ApiState;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub fn tokens_router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new().routes(routes!(handlers::create_token_handler))
}
