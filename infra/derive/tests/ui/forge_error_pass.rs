use std::borrow::Cow;
use tforge_derive::forge_error;

#[forge_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Timed out after {seconds}s{}", format_context(context))]
    Timeout { seconds: u64, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn main() {
    let err: DemoError = "boom".into();
    let _ = err.to_string();
}
