use std::borrow::Cow;
use subtle::ConstantTimeEq;

#[tforge_derive::forge_error]
pub enum TokenGuardError {
    #[error("Unauthorized{}: {message}", format_context(.context))]
    Unauthorized { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

const BEARER_PREFIX: &str = "Bearer ";

/// Checks the static API token carried by the `Authorization` header.
///
/// Accepts `Bearer <token>` and the bare token. Comparison is constant time over the
/// token bytes. A guard built from an empty token rejects everything.
#[derive(Clone)]
pub struct TokenGuard {
    expected: Box<[u8]>,
}

impl std::fmt::Debug for TokenGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenGuard").field("configured", &!self.expected.is_empty()).finish()
    }
}

impl TokenGuard {
    pub fn new(expected: impl AsRef<str>) -> Self {
        Self { expected: expected.as_ref().trim().as_bytes().into() }
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.expected.is_empty()
    }

    /// # Errors
    /// [`TokenGuardError::Unauthorized`] when the header is absent, blank or wrong,
    /// or when no token is configured.
    pub fn verify(&self, header: Option<&str>) -> Result<(), TokenGuardError> {
        if !self.is_configured() {
            return Err(TokenGuardError::Unauthorized {
                message: "no API token configured".into(),
                context: None,
            });
        }

        let presented = header
            .map(str::trim)
            .map(|value| value.strip_prefix(BEARER_PREFIX).map_or(value, str::trim_start))
            .filter(|value| !value.is_empty())
            .ok_or_else(|| TokenGuardError::Unauthorized {
                message: "missing Authorization header".into(),
                context: None,
            })?;

        if bool::from(presented.as_bytes().ct_eq(&self.expected)) {
            Ok(())
        } else {
            Err(TokenGuardError::Unauthorized { message: "invalid API token".into(), context: None })
        }
    }
}
