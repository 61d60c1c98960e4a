use crate::capability::Capability;
use std::borrow::Cow;

#[tforge_derive::forge_error]
pub enum ComposeError {
    /// The feature selection failed ingress validation.
    #[error("Invalid {field}{}: {message}", format_context(.context))]
    Validation {
        field: Cow<'static, str>,
        message: Cow<'static, str>,
        context: Option<Cow<'static, str>>,
    },

    /// A capability has no registry entry.
    #[error("Unknown capability '{capability}'{}", format_context(.context))]
    UnknownCapability { capability: Capability, context: Option<Cow<'static, str>> },

    /// The selected capabilities cannot form a sound contract.
    #[error("Invalid composition{}: {message}", format_context(.context))]
    InvalidComposition { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A template or binding could not be rendered.
    #[error("Render error{}: {message}", format_context(.context))]
    Render { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal composer error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl ComposeError {
    pub(crate) fn validation(
        field: &'static str,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::Validation { field: field.into(), message: message.into(), context: None }
    }

    pub(crate) fn composition(message: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidComposition { message: message.into(), context: None }
    }

    /// Render failure located by `context`, e.g. `template:line`.
    pub(crate) fn render(
        message: impl Into<Cow<'static, str>>,
        context: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::Render { message: message.into(), context: Some(context.into()) }
    }
}
