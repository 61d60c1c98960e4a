use proc_macro2::TokenStream;
use quote::quote;
use syn::{Error, Ident, ItemFn, ReturnType, Type};

/// Expands `#[tforge_runtime::main]`.
#[must_use]
pub fn expand_main(args: TokenStream, input: ItemFn) -> TokenStream {
    if input.sig.asyncness.is_none() {
        return Error::new_spanned(
            input.sig.fn_token,
            "#[tforge_runtime::main] can only be used on async functions",
        )
        .to_compile_error();
    }

    if !returns_result(&input.sig.output) {
        return Error::new_spanned(
            &input.sig.output,
            "#[tforge_runtime::main] requires a Result return type",
        )
        .to_compile_error();
    }

    let profile = match profile_constructor(args) {
        Ok(profile) => profile,
        Err(err) => return err.to_compile_error(),
    };

    let ItemFn { attrs, vis, sig, block } = input;
    let name = &sig.ident;
    let output = &sig.output;

    quote! {
        #(#attrs)*
        #vis fn #name() #output {
            let config = #profile;
            let rt = ::tforge_runtime::build_runtime_with_config(&config)?;
            rt.block_on(async #block)
        }
    }
}

fn profile_constructor(args: TokenStream) -> syn::Result<TokenStream> {
    if args.is_empty() {
        return Ok(quote! { ::tforge_runtime::RuntimeConfig::default() });
    }

    let ident: Ident = syn::parse2(args)?;
    match ident.to_string().as_str() {
        "high_performance" => Ok(quote! { ::tforge_runtime::RuntimeConfig::high_performance() }),
        "memory_efficient" => Ok(quote! { ::tforge_runtime::RuntimeConfig::memory_efficient() }),
        "default" => Ok(quote! { ::tforge_runtime::RuntimeConfig::default() }),
        _ => Err(Error::new_spanned(
            ident,
            "unknown runtime profile; use high_performance, memory_efficient or default",
        )),
    }
}

fn returns_result(output: &ReturnType) -> bool {
    let ReturnType::Type(_, ty) = output else {
        return false;
    };
    let Type::Path(path) = &**ty else {
        return false;
    };
    path.path.segments.last().is_some_and(|seg| seg.ident == "Result")
}
