use std::borrow::Cow;
use tforge_composer::ComposeError;
use tforge_kernel::security::token::TokenGuardError;
use tforge_pipeline::PipelineError;

#[tforge_derive::forge_error]
pub enum TokensError {
    #[error("{source}{}", format_context(.context))]
    Compose { source: ComposeError, context: Option<Cow<'static, str>> },

    #[error("{source}{}", format_context(.context))]
    Pipeline { source: PipelineError, context: Option<Cow<'static, str>> },

    #[error("{source}{}", format_context(.context))]
    Unauthorized { source: TokenGuardError, context: Option<Cow<'static, str>> },

    #[error("Invalid request body{}: {message}", format_context(.context))]
    Request { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal tokens error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl TokensError {
    /// Stable machine-readable kind, also used as the `error` field of HTTP bodies.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Compose { source: ComposeError::Validation { .. }, .. } | Self::Request { .. } => {
                "validation"
            },
            Self::Compose { .. } => "composition",
            Self::Pipeline { source, .. } => match source {
                PipelineError::Persist { .. } => "persist",
                PipelineError::Compile { .. } => "compile",
                PipelineError::DeployLaunch { .. } => "deploy_launch",
                PipelineError::Timeout { .. } => "timeout",
                PipelineError::Busy { .. } => "busy",
                PipelineError::Internal { .. } => "internal",
            },
            Self::Unauthorized { .. } => "unauthorized",
            Self::Internal { .. } => "internal",
        }
    }

    /// HTTP status for this failure.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::Unauthorized { .. } => 401,
            Self::Compose { source: ComposeError::Validation { .. }, .. } | Self::Request { .. } => 422,
            Self::Pipeline {
                source: PipelineError::Compile { .. } | PipelineError::DeployLaunch { .. },
                ..
            } => 502,
            Self::Pipeline { source: PipelineError::Busy { .. }, .. } => 503,
            Self::Pipeline { source: PipelineError::Timeout { .. }, .. } => 504,
            _ => 500,
        }
    }
}

#[cfg(feature = "server")]
mod response {
    use super::TokensError;
    use crate::model::ErrorResponse;
    use axum::Json;
    use axum::extract::rejection::JsonRejection;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use tracing::{error, warn};

    impl From<JsonRejection> for TokensError {
        fn from(rejection: JsonRejection) -> Self {
            Self::Request { message: rejection.body_text().into(), context: None }
        }
    }

    impl IntoResponse for TokensError {
        fn into_response(self) -> Response {
            let status =
                StatusCode::from_u16(self.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

            let detail = if status == StatusCode::INTERNAL_SERVER_ERROR {
                error!(error = %self, kind = self.kind(), "Token request failed");
                "internal server error".to_owned()
            } else {
                if status.is_server_error() {
                    error!(error = %self, kind = self.kind(), "Token request failed");
                } else {
                    warn!(error = %self, kind = self.kind(), "Token request rejected");
                }
                self.to_string()
            };

            (status, Json(ErrorResponse { error: self.kind().to_owned(), detail })).into_response()
        }
    }
}
