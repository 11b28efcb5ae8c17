#![warn(missing_docs)]
//! Implementation of `#[derive(Keyed)]`.
//!
//! Lives outside the `proc-macro` crate so the expansion can be unit tested
//! on `proc_macro2` token streams.

use unsynn::*;

keyword! {
    KStruct = "struct";
    KEnum = "enum";
    KPub = "pub";
    KRename = "rename";
    KSkip = "skip";
    KParent = "parent";
    KNull = "null";
}

operator! {
    /// Represents the '=' operator.
    Eq = "=";
}

unsynn! {
    /// `pub`, `pub(crate)`, `pub(in path)`.
    enum Vis {
        /// Restricted visibility.
        PubIn(Cons<KPub, ParenthesisGroup>),
        /// Plain `pub`.
        Pub(KPub),
    }

    /// An outer attribute, `#[...]`.
    struct Attribute {
        /// The `#`.
        _pound: Pound,
        /// The bracketed content.
        content: BracketGroup,
    }

    /// `struct` or `enum`.
    enum AdtKeyword {
        /// A struct.
        Struct(KStruct),
        /// An enum.
        Enum(KEnum),
    }

    /// The derive input up to its name; the rest is split by hand.
    struct AdtDecl {
        /// Container attributes.
        attrs: Vec<Attribute>,
        /// Container visibility.
        vis: Option<Vis>,
        /// Struct or enum.
        keyword: AdtKeyword,
        /// Type name.
        name: Ident,
        /// Generics, body and anything after.
        rest: Vec<TokenTree>,
    }

    /// A struct field or enum variant up to its name.
    struct MemberDecl {
        /// Member attributes.
        attrs: Vec<Attribute>,
        /// Field visibility.
        vis: Option<Vis>,
        /// Field or variant name.
        name: Ident,
        /// `: Type` for fields; nothing, `= discriminant` or a body for variants.
        rest: Vec<TokenTree>,
    }

    /// One argument of `#[keyed(...)]`.
    enum KeyedArg {
        /// `rename = "wire name"`
        Rename(Cons<KRename, Cons<Eq, Literal>>),
        /// `skip`
        Skip(KSkip),
        /// `parent`
        Parent(KParent),
        /// `null`
        Null(KNull),
    }
}

mod parsed;

mod process_struct;
mod process_enum;

use quote::{quote, quote_spanned};

/// Expands `#[derive(Keyed)]`.
///
/// Invalid input expands to `compile_error!` invocations pointing at the
/// offending tokens, never to a panic.
pub fn derive_keyed(input: TokenStream) -> TokenStream {
    let mut tokens = input.to_token_iter();
    let decl = match tokens.parse::<AdtDecl>() {
        Ok(decl) => decl,
        Err(err) => {
            let message = format!("#[derive(Keyed)] expects a struct or an enum: {err}");
            return quote! { ::core::compile_error!(#message); };
        }
    };

    let result = match &decl.keyword {
        AdtKeyword::Struct(_) => process_struct::process_struct(&decl),
        AdtKeyword::Enum(_) => process_enum::process_enum(&decl),
    };

    match result {
        Ok(tokens) => tokens,
        Err(errors) => {
            let errors = errors.iter().map(|e| {
                let message = &e.message;
                quote_spanned! { e.span => ::core::compile_error!(#message); }
            });
            quote! { #(#errors)* }
        }
    }
}
