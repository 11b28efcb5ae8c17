use quote::{format_ident, quote};
use unsynn::*;

use crate::AdtDecl;
use crate::parsed::*;
use crate::process_struct::{check_container, find_body, gen_doc, gen_flags, gen_rename};

/// Unit variants become constant keys; anything carrying data is rejected.
pub(crate) fn process_enum(decl: &AdtDecl) -> DeriveResult<TokenStream> {
    let mut errors = Vec::new();
    let name = &decl.name;
    let name_str = ident_name(name);

    let container = KeyedAttrs::parse(&decl.attrs, &mut errors);
    check_container(&container, name, &mut errors);

    let body = find_body(decl, "enum")?.unwrap_or_default();

    let mut accessors = Vec::new();
    let mut variants = Vec::new();
    let mut has_null = false;

    for (index, tokens) in split_members(body).into_iter().enumerate() {
        let member = match parse_member(tokens) {
            Ok(member) => member,
            Err(err) => {
                errors.push(err);
                continue;
            }
        };
        let variant = &member.name;
        let variant_str = ident_name(variant);

        match member.rest.first() {
            None => {}
            Some(TokenTree::Punct(eq)) if eq.as_char() == '=' => {}
            Some(other) => {
                errors.push(DeriveError::new(
                    other.span(),
                    "#[derive(Keyed)] only supports enums whose variants carry no data",
                ));
                continue;
            }
        }

        let attrs = KeyedAttrs::parse(&member.attrs, &mut errors);
        if let Some(span) = attrs.parent {
            errors.push(DeriveError::new(span, "`parent` only applies to struct fields"));
        }
        if let Some(span) = attrs.null {
            if has_null {
                errors.push(DeriveError::new(span, "only one variant can be `null`"));
            }
            has_null = true;
        }
        if let (Some(span), Some(_)) = (attrs.null, &attrs.rename) {
            errors.push(DeriveError::new(
                span,
                "a `null` variant has no wire name to rename",
            ));
        }

        let value = format_ident!("__keyed_variant_{}", index);
        let matches = format_ident!("__keyed_is_{}", index);
        let private = quote! { ::fieldmap::__private };
        accessors.push(quote! {
            fn #value() -> #private::Box<dyn #private::Any> {
                #private::Box::new(#name::#variant)
            }
            fn #matches(value: &dyn #private::Any) -> bool {
                ::core::matches!(value.downcast_ref::<#name>(), #private::Some(#name::#variant))
            }
        });

        let flags = gen_flags(&attrs, false);
        let rename = gen_rename(&attrs);
        let doc = gen_doc(&attrs);
        variants.push(quote! {
            ::fieldmap::Field {
                name: #variant_str,
                rename: #rename,
                flags: #flags,
                type_name: ::fieldmap::__private::type_name::<#name>,
                type_id: ::fieldmap::__private::TypeId::of::<#name>,
                access: ::fieldmap::FieldAccess::Constant(::fieldmap::ConstantVTable {
                    value: #value,
                    matches: #matches,
                }),
                doc: #doc,
            }
        });
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    let doc = gen_doc(&container);

    Ok(quote! {
        #[automatically_derived]
        impl ::fieldmap::Keyed for #name {
            const SHAPE: &'static ::fieldmap::Shape = {
                #(#accessors)*

                &::fieldmap::Shape {
                    type_name: #name_str,
                    id: ::fieldmap::__private::TypeId::of::<#name>,
                    ty: ::fieldmap::Type::Enum,
                    parent: ::fieldmap::__private::None,
                    fields: &[#(#variants),*],
                    doc: #doc,
                }
            };
        }
    })
}
