use unsynn::*;

keyword! {
    KFn = "fn";
}

unsynn! {
    struct BeforeFn {
        items: Any<Cons<Except<KFn>, TokenTree>>,
    }

    struct Signature {
        items: Any<Cons<Except<BraceGroup>, TokenTree>>,
    }

    struct TestFn {
        before_fn: BeforeFn,
        _fn: KFn,
        name: Ident,
        signature: Signature,
        body: BraceGroup,
    }
}

impl quote::ToTokens for BeforeFn {
    fn to_tokens(&self, tokens: &mut unsynn::TokenStream) {
        self.items.to_tokens(tokens)
    }
}

impl quote::ToTokens for Signature {
    fn to_tokens(&self, tokens: &mut unsynn::TokenStream) {
        self.items.to_tokens(tokens)
    }
}

/// Runs `fieldmap_testhelpers::setup()` before the test body.
///
/// ```ignore
/// #[fieldmap_testhelpers::test]
/// fn resolves() {
///     // logs from fieldmap show up here, filtered by FIELDMAP_LOG
/// }
/// ```
///
/// An argument replaces the harness attribute, e.g.
/// `#[fieldmap_testhelpers::test(some_harness::test)]`.
#[proc_macro_attribute]
pub fn test(
    attr: proc_macro::TokenStream,
    item: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
    let item = TokenStream::from(item);
    let mut tokens = item.to_token_iter();
    let TestFn {
        before_fn,
        _fn,
        name,
        signature,
        body,
    } = match tokens.parse::<TestFn>() {
        Ok(decl) => decl,
        Err(err) => {
            let message = format!("#[fieldmap_testhelpers::test] expects a function: {err}");
            return quote::quote! { ::core::compile_error!(#message); }.into();
        }
    };
    let body = body.0.stream();

    let harness = if attr.is_empty() {
        quote::quote! { #[::core::prelude::rust_2024::test] }
    } else {
        let attr = TokenStream::from(attr);
        quote::quote! { #[#attr] }
    };

    quote::quote! {
        #harness
        #before_fn fn #name #signature {
            ::fieldmap_testhelpers::setup();

            #body
        }
    }
    .into()
}
