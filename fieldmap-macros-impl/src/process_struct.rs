use proc_macro2::{Delimiter, Span};
use quote::{format_ident, quote};
use unsynn::*;

use crate::AdtDecl;
use crate::parsed::*;

/// Flag expression for a member.
pub(crate) fn gen_flags(attrs: &KeyedAttrs, synthetic: bool) -> TokenStream {
    let mut flags = quote! { ::fieldmap::FieldFlags::empty() };
    let mut add = |flag: &str| {
        let flag = format_ident!("{}", flag);
        flags = quote! { #flags.union(::fieldmap::FieldFlags::#flag) };
    };
    if attrs.skip {
        add("SKIP");
    }
    if synthetic {
        add("SYNTHETIC");
    }
    if attrs.parent.is_some() {
        add("PARENT");
    }
    if attrs.null.is_some() {
        add("NULL_NAME");
    }
    flags
}

pub(crate) fn gen_rename(attrs: &KeyedAttrs) -> TokenStream {
    match &attrs.rename {
        Some(rename) => quote! { ::fieldmap::__private::Some(#rename) },
        None => quote! { ::fieldmap::__private::None },
    }
}

pub(crate) fn gen_doc(attrs: &KeyedAttrs) -> TokenStream {
    let doc = &attrs.doc;
    quote! { &[#(#doc),*] }
}

/// Rejects `#[keyed(...)]` arguments on the type itself; they only mean
/// something on members.
pub(crate) fn check_container(attrs: &KeyedAttrs, name: &Ident, errors: &mut Vec<DeriveError>) {
    if attrs.rename.is_some() || attrs.skip || attrs.parent.is_some() || attrs.null.is_some() {
        errors.push(DeriveError::new(
            name.span(),
            "`#[keyed(...)]` arguments belong on fields and variants, not on the type",
        ));
    }
}

/// Finds the brace-delimited body after the type name, rejecting generics,
/// tuple structs and anything else that cannot be keyed.
///
/// `Ok(None)` is a unit struct.
pub(crate) fn find_body(decl: &AdtDecl, what: &str) -> DeriveResult<Option<TokenStream>> {
    let fail = |span: Span, message: String| Err(vec![DeriveError::new(span, message)]);
    match decl.rest.first() {
        Some(TokenTree::Group(group)) if group.delimiter() == Delimiter::Brace => {
            Ok(Some(group.stream()))
        }
        Some(TokenTree::Punct(punct)) if punct.as_char() == ';' => Ok(None),
        Some(TokenTree::Punct(punct)) if punct.as_char() == '<' => fail(
            punct.span(),
            format!("#[derive(Keyed)] does not support generic {what}s"),
        ),
        Some(TokenTree::Group(group)) if group.delimiter() == Delimiter::Parenthesis => fail(
            group.span(),
            "#[derive(Keyed)] needs named fields; tuple structs have no field names".into(),
        ),
        Some(other) => fail(other.span(), format!("expected the body of the {what}")),
        None => fail(decl.name.span(), format!("expected the body of the {what}")),
    }
}

pub(crate) fn process_struct(decl: &AdtDecl) -> DeriveResult<TokenStream> {
    let mut errors = Vec::new();
    let name = &decl.name;
    let name_str = ident_name(name);

    let container = KeyedAttrs::parse(&decl.attrs, &mut errors);
    check_container(&container, name, &mut errors);

    let body = find_body(decl, "struct")?.unwrap_or_default();

    let mut accessors = Vec::new();
    let mut fields = Vec::new();
    let mut parent: Option<(Span, TokenStream)> = None;

    for (index, tokens) in split_members(body).into_iter().enumerate() {
        let member = match parse_member(tokens) {
            Ok(member) => member,
            Err(err) => {
                errors.push(err);
                continue;
            }
        };
        let field = &member.name;
        let field_str = ident_name(field);
        let ty: TokenStream = match member.rest.split_first() {
            Some((TokenTree::Punct(colon), ty)) if colon.as_char() == ':' && !ty.is_empty() => {
                ty.iter().cloned().collect()
            }
            _ => {
                errors.push(DeriveError::new(
                    field.span(),
                    "expected `name: Type`",
                ));
                continue;
            }
        };
        let ty_tokens: Vec<TokenTree> = ty.clone().into_iter().collect();

        let attrs = KeyedAttrs::parse(&member.attrs, &mut errors);
        if let Some(span) = attrs.null {
            errors.push(DeriveError::new(span, "`null` only applies to enum variants"));
        }
        if let Some(span) = attrs.parent {
            if attrs.rename.is_some() || attrs.skip {
                errors.push(DeriveError::new(
                    span,
                    "the parent field has no wire name; drop `rename` and `skip`",
                ));
            }
            if parent.is_some() {
                errors.push(DeriveError::new(span, "only one field can be the parent"));
            }
        }

        let get = format_ident!("__keyed_get_{}", index);
        let get_mut = format_ident!("__keyed_get_mut_{}", index);
        let replace = format_ident!("__keyed_replace_{}", index);

        let private = quote! { ::fieldmap::__private };
        accessors.push(quote! {
            fn #get(owner: &dyn #private::Any) -> #private::Option<&dyn #private::Any> {
                owner
                    .downcast_ref::<#name>()
                    .map(|owner| &owner.#field as &dyn #private::Any)
            }
            fn #get_mut(owner: &mut dyn #private::Any) -> #private::Option<&mut dyn #private::Any> {
                owner
                    .downcast_mut::<#name>()
                    .map(|owner| &mut owner.#field as &mut dyn #private::Any)
            }
            fn #replace(
                owner: &mut dyn #private::Any,
                value: #private::Box<dyn #private::Any>,
            ) -> #private::Result<#private::Box<dyn #private::Any>, #private::Box<dyn #private::Any>> {
                match owner.downcast_mut::<#name>() {
                    #private::Some(owner) => ::fieldmap::replace_boxed(&mut owner.#field, value),
                    #private::None => #private::Result::Err(value),
                }
            }
        });

        if let (Some(span), None) = (attrs.parent, &parent) {
            parent = Some((
                span,
                quote! {
                    ::fieldmap::__private::Some(::fieldmap::ParentLink {
                        field: #field_str,
                        shape: ::fieldmap::shape_of::<#ty>,
                        project: #get,
                        project_mut: #get_mut,
                    })
                },
            ));
        }

        let flags = gen_flags(&attrs, is_phantom(&ty_tokens));
        let rename = gen_rename(&attrs);
        let doc = gen_doc(&attrs);
        fields.push(quote! {
            ::fieldmap::Field {
                name: #field_str,
                rename: #rename,
                flags: #flags,
                type_name: ::fieldmap::__private::type_name::<#ty>,
                type_id: ::fieldmap::__private::TypeId::of::<#ty>,
                access: ::fieldmap::FieldAccess::Slot(::fieldmap::SlotVTable {
                    get: #get,
                    get_mut: #get_mut,
                    replace: #replace,
                }),
                doc: #doc,
            }
        });
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    let parent = match parent {
        Some((_, link)) => link,
        None => quote! { ::fieldmap::__private::None },
    };
    let doc = gen_doc(&container);

    Ok(quote! {
        #[automatically_derived]
        impl ::fieldmap::Keyed for #name {
            const SHAPE: &'static ::fieldmap::Shape = {
                #(#accessors)*

                &::fieldmap::Shape {
                    type_name: #name_str,
                    id: ::fieldmap::__private::TypeId::of::<#name>,
                    ty: ::fieldmap::Type::Struct,
                    parent: #parent,
                    fields: &[#(#fields),*],
                    doc: #doc,
                }
            };
        }
    })
}
