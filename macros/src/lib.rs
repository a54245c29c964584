use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, spanned::Spanned, Ident, ItemFn, LitStr};

const USAGE: &str = "rxsignal_macro::test only accepts: #[rxsignal_macro::test], \
                     #[rxsignal_macro::test(local)] or #[rxsignal_macro::test(shared)]";

/// Test attribute used across the rxsignal suites.
///
/// Sync functions become plain `#[test]`s. Async functions run on tokio:
/// `local` selects the current-thread runtime, `shared` the multi-thread one
/// (needed whenever a test drives a worker-backed scheduler from async code).
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
  let input = parse_macro_input!(item as ItemFn);
  let is_async = input.sig.asyncness.is_some();
  let raw_args = proc_macro2::TokenStream::from(attr);

  let tokio_args = if raw_args.is_empty() {
    proc_macro2::TokenStream::new()
  } else {
    if !is_async {
      return syn::Error::new(
        raw_args.span(),
        "flavor args are only supported for async tests; drop the argument or make the \
         function async",
      )
      .to_compile_error()
      .into();
    }

    let flavor = if let Ok(ident) = syn::parse2::<Ident>(raw_args.clone()) {
      Some((ident.to_string(), ident.span()))
    } else if let Ok(lit) = syn::parse2::<LitStr>(raw_args.clone()) {
      Some((lit.value(), lit.span()))
    } else {
      None
    };

    match flavor {
      Some((name, _)) if name == "local" => quote!(flavor = "current_thread"),
      Some((name, _)) if name == "shared" => quote!(flavor = "multi_thread"),
      Some((_, span)) => return syn::Error::new(span, USAGE).to_compile_error().into(),
      None => return syn::Error::new(raw_args.span(), USAGE).to_compile_error().into(),
    }
  };

  let attr = if is_async { quote!(#[tokio::test(#tokio_args)]) } else { quote!(#[test]) };

  TokenStream::from(quote! {
    #attr
    #input
  })
}
