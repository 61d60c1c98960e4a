use std::borrow::Cow;

#[tforge_derive::forge_error]
pub enum PipelineError {
    /// The scratch directory or the source file could not be written.
    #[error("Failed to persist contract source{}: {source}", format_context(.context))]
    Persist { source: std::io::Error, context: Option<Cow<'static, str>> },

    /// The compiler failed to start, exited non-zero or left no artifacts.
    #[error("Compilation failed{}: {message}", format_context(.context))]
    Compile { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Failed to launch the deployer{}: {message}", format_context(.context))]
    DeployLaunch { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("{stage} exceeded {secs}s{}", format_context(.context))]
    Timeout { stage: Cow<'static, str>, secs: u64, context: Option<Cow<'static, str>> },

    /// No build slot could be acquired.
    #[error("Build pipeline unavailable{}: {message}", format_context(.context))]
    Busy { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal pipeline error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
