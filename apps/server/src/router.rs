use axum::Router;
use tforge::kernel::server::ApiState;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

#[derive(OpenApi)]
#[openapi(
    info(title = "TokenForge", description = "FA1.2 token contract generator"),
    modifiers(&ApiTokenScheme),
    tags(
        (name = "System", description = "Service health"),
        (name = "Tokens", description = "Token contract generation and deployment"),
    )
)]
struct ApiDoc;

/// Registers the static token accepted in the `Authorization` header.
struct ApiTokenScheme;

impl Modify for ApiTokenScheme {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_token",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}

#[allow(unreachable_pub)]
pub fn init(state: ApiState) -> Router {
    let cors_permissive = state.config.server.cors_permissive;
    let api = ApiDoc::openapi();

    // Separate the OpenAPI routes and the API documentation object
    let (openapi_routes, api_doc) = OpenApiRouter::with_openapi(api)
        .merge(tforge::server::router::system_router())
        .merge(tforge::server::router::tokens_router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        .split_for_parts();

    // Create the Scalar UI routes
    let scalar_routes = Scalar::with_url("/api", api_doc);

    let router = Router::new().merge(openapi_routes).merge(scalar_routes);
    if cors_permissive { router.layer(CorsLayer::permissive()) } else { router }
}
