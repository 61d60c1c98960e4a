#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the forge crates: error enums, feature slices,
//! API models/handlers and the runtime entry point.
//!
//! The examples below are `ignore`d because a proc-macro crate cannot use its own
//! macros in doctests; the consuming crates exercise them in their tests.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Turns an `async fn main` into a blocking `fn main` running on a `tforge_runtime` profile.
///
/// # Arguments
///
/// * `high_performance` - Server profile (larger stacks, long keep-alive).
/// * `memory_efficient` - CLI profile (half the workers, smaller stacks).
/// * `default` - Worker threads auto-detected from available parallelism.
///
/// # Examples
///
/// ```rust,ignore
/// #[tforge_runtime::main(high_performance)]
/// async fn main() -> anyhow::Result<()> {
///     Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn main(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::runtime::expand_main(args.into(), input).into()
}

/// Declares an API data transfer object.
///
/// Adds `Debug`, `Serialize` and `Deserialize` when missing, `utoipa::ToSchema` behind the
/// `server` feature, `rename_all = "camelCase"` and `deny_unknown_fields` unless overridden.
///
/// # Example
///
/// ```rust,ignore
/// #[tforge_derive::api_model(rename_all = "snake_case", deny_unknown_fields = false)]
/// pub struct CreateTokenRequest {
///     pub token_name: String,
/// }
/// ```
#[proc_macro_attribute]
pub fn api_model(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::api::expand_api_model(attr.into(), input).into()
}

/// Wraps an Axum handler with `utoipa::path` (behind the `server` feature).
///
/// # Example
///
/// ```rust,ignore
/// #[tforge_derive::api_handler(
///     post,
///     path = "/create",
///     responses((status = OK, body = CreateTokenResponse)),
///     tag = "Tokens"
/// )]
/// pub async fn create_token_handler() -> impl IntoResponse { /* ... */ }
/// ```
#[proc_macro_attribute]
pub fn api_handler(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::api::expand_api_handler(args.into(), input).into()
}

/// Defines a crate error enum on top of `thiserror`.
///
/// # Generated Items
///
/// * `#[derive(Debug, thiserror::Error)]` unless already derived.
/// * `<Name>Ext` trait adding `.context(...)` to `Result<T, Name>` and to
///   `Result<T, Source>` for every variant carrying a `source`.
/// * `From<Source>` for every variant carrying a `source` and a `context`.
/// * `From<&'static str>` / `From<String>` when an `Internal` variant exists.
/// * A private `format_context` helper for `#[error(...)]` strings.
///
/// # Requirements
///
/// Variants use named fields. A `context` field must be `Option<Cow<'static, str>>`, and every
/// variant with a `source` must also carry a `context`.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[tforge_derive::forge_error]
/// pub enum PipelineError {
///     #[error("Scratch persistence failed{}: {source}", format_context(context))]
///     Persist { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal pipeline error{}: {message}", format_context(context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
/// ```
#[proc_macro_attribute]
pub fn forge_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

/// Turns a struct into a registrable feature slice.
///
/// The annotated struct becomes `<Name>Inner`; `<Name>` is an `Arc` handle that derefs to it
/// and implements `tforge_kernel::domain::registry::FeatureSlice`.
///
/// # Example
///
/// ```rust,ignore
/// #[tforge_derive::forge_slice]
/// pub struct Tokens {
///     pub service: TokenService,
/// }
///
/// let slice = Tokens::new(TokensInner { service });
/// ```
#[proc_macro_attribute]
pub fn forge_slice(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(item as ItemStruct);
    macros::slice::expand_slice(input).into()
}
