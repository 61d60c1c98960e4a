use crate::error::TokensError;
use crate::model::{CreateTokenRequest, CreateTokenResponse, ErrorResponse};
use crate::Tokens;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequestParts, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::Json;
use tforge_derive::api_handler;
use tforge_domain::constants::TOKENS_TAG;
use tforge_kernel::server::ApiState;

/// The request carried the configured API token. Checked before the body is parsed.
pub(crate) struct Authorized;

impl FromRequestParts<ApiState> for Authorized {
    type Rejection = TokensError;

    async fn from_request_parts(parts: &mut Parts, state: &ApiState) -> Result<Self, Self::Rejection> {
        let tokens = slice(state)?;
        let header = parts.headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok());
        tokens.guard.verify(header)?;
        Ok(Self)
    }
}

fn slice(state: &ApiState) -> Result<&Tokens, TokensError> {
    state.try_get_slice::<Tokens>().map_err(|err| TokensError::from(err.to_string()))
}

#[api_handler(
    post,
    path = "/create",
    request_body = CreateTokenRequest,
    responses(
        (status = OK, description = "Contract built and submitted", body = CreateTokenResponse),
        (status = UNAUTHORIZED, description = "Missing or wrong API token", body = ErrorResponse),
        (status = UNPROCESSABLE_ENTITY, description = "Invalid token parameters", body = ErrorResponse),
        (status = BAD_GATEWAY, description = "Compiler or deployer failed", body = ErrorResponse),
        (status = SERVICE_UNAVAILABLE, description = "Build pipeline closed", body = ErrorResponse),
        (status = GATEWAY_TIMEOUT, description = "Compiler or deployer timed out", body = ErrorResponse),
    ),
    security(("api_token" = [])),
    tag = TOKENS_TAG,
)]
pub(crate) async fn create_token_handler(
    _auth: Authorized,
    State(state): State<ApiState>,
    request: Result<Json<CreateTokenRequest>, JsonRejection>,
) -> Result<Json<CreateTokenResponse>, TokensError> {
    let Json(request) = request?;
    let report = slice(&state)?.service.create(request.into()).await?;
    Ok(Json(report.into()))
}
