//! Parsed view of the derive input: members, their `#[keyed]` arguments and
//! doc comments.

use proc_macro2::{Delimiter, Spacing, Span};

use crate::{Attribute, KeyedArg, MemberDecl};
use unsynn::*;

/// A problem with the derive input, reported as a spanned `compile_error!`.
pub(crate) struct DeriveError {
    pub(crate) span: Span,
    pub(crate) message: String,
}

impl DeriveError {
    pub(crate) fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

pub(crate) type DeriveResult<T> = std::result::Result<T, Vec<DeriveError>>;

/// Everything `#[keyed(...)]` and `#[doc]` said about one item.
#[derive(Default)]
pub(crate) struct KeyedAttrs {
    pub(crate) rename: Option<String>,
    pub(crate) skip: bool,
    pub(crate) parent: Option<Span>,
    pub(crate) null: Option<Span>,
    pub(crate) doc: Vec<String>,
}

impl KeyedAttrs {
    /// Collects the arguments of every `#[keyed(...)]` on an item, plus its
    /// doc lines. Other attributes are ignored.
    pub(crate) fn parse(attrs: &[Attribute], errors: &mut Vec<DeriveError>) -> Self {
        let mut parsed = KeyedAttrs::default();
        for attr in attrs {
            let tokens: Vec<TokenTree> = attr.content.0.stream().into_iter().collect();
            let Some(TokenTree::Ident(head)) = tokens.first() else {
                continue;
            };
            if head == "doc" {
                if let Some(line) = doc_line(&tokens) {
                    parsed.doc.push(line);
                }
                continue;
            }
            if head != "keyed" {
                continue;
            }
            let args = match tokens.get(1) {
                Some(TokenTree::Group(group)) if group.delimiter() == Delimiter::Parenthesis => {
                    group.stream()
                }
                _ => {
                    errors.push(DeriveError::new(
                        head.span(),
                        "expected `#[keyed(...)]`",
                    ));
                    continue;
                }
            };
            parsed.parse_args(head.span(), args, errors);
        }
        parsed
    }

    fn parse_args(&mut self, span: Span, args: TokenStream, errors: &mut Vec<DeriveError>) {
        let mut it = args.to_token_iter();
        let list = match it.parse::<Cons<CommaDelimitedVec<KeyedArg>, EndOfStream>>() {
            Ok(list) => list.first,
            Err(_) => {
                errors.push(DeriveError::new(
                    span,
                    "unknown `keyed` argument; expected `rename = \"...\"`, `skip`, `parent` or `null`",
                ));
                return;
            }
        };
        for arg in list.iter() {
            match &arg.value {
                KeyedArg::Rename(rename) => {
                    let literal = &rename.second.second;
                    match unquote(&literal.to_string()) {
                        Some(name) => self.rename = Some(name),
                        None => errors.push(DeriveError::new(
                            literal.span(),
                            "`rename` expects a string literal",
                        )),
                    }
                }
                KeyedArg::Skip(_) => self.skip = true,
                KeyedArg::Parent(_) => self.parent = Some(span),
                KeyedArg::Null(_) => self.null = Some(span),
            }
        }
    }
}

fn doc_line(tokens: &[TokenTree]) -> Option<String> {
    match tokens {
        [_, TokenTree::Punct(eq), TokenTree::Literal(lit)] if eq.as_char() == '=' => {
            unquote(&lit.to_string())
        }
        _ => None,
    }
}

/// The value of a string literal token, raw or not.
///
/// Handles the escapes that doc comments and wire names realistically
/// contain; anything else is kept verbatim.
pub(crate) fn unquote(literal: &str) -> Option<String> {
    if let Some(raw) = literal.strip_prefix('r') {
        let hashes = raw.len() - raw.trim_start_matches('#').len();
        let body = &raw[hashes..];
        let body = body.strip_prefix('"')?;
        let body = body.strip_suffix(&raw[..hashes])?;
        return body.strip_suffix('"').map(str::to_owned);
    }

    let body = literal.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(c @ ('\\' | '"' | '\'')) => out.push(c),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    Some(out)
}

/// Identifier text without the `r#` of raw identifiers.
pub(crate) fn ident_name(ident: &Ident) -> String {
    let name = ident.to_string();
    match name.strip_prefix("r#") {
        Some(stripped) => stripped.to_owned(),
        None => name,
    }
}

/// Splits the content of a struct or enum body into one token stream per
/// member.
///
/// Commas nested in `<...>` belong to the member's type; the `>` of a `->`
/// does not close anything.
pub(crate) fn split_members(body: TokenStream) -> Vec<TokenStream> {
    let mut members = Vec::new();
    let mut current: Vec<TokenTree> = Vec::new();
    let mut depth = 0usize;
    let mut after_joint_dash = false;

    for token in body {
        let mut joint_dash = false;
        if let TokenTree::Punct(punct) = &token {
            match punct.as_char() {
                ',' if depth == 0 => {
                    if !current.is_empty() {
                        members.push(current.drain(..).collect());
                    }
                    after_joint_dash = false;
                    continue;
                }
                '<' => depth += 1,
                '>' if !after_joint_dash => depth = depth.saturating_sub(1),
                '-' => joint_dash = punct.spacing() == Spacing::Joint,
                _ => {}
            }
        }
        after_joint_dash = joint_dash;
        current.push(token);
    }
    if !current.is_empty() {
        members.push(current.into_iter().collect());
    }
    members
}

/// Parses one member produced by [`split_members`].
pub(crate) fn parse_member(tokens: TokenStream) -> std::result::Result<MemberDecl, DeriveError> {
    let span = tokens
        .clone()
        .into_iter()
        .next()
        .map(|t| t.span())
        .unwrap_or_else(Span::call_site);
    let mut it = tokens.to_token_iter();
    it.parse::<MemberDecl>()
        .map_err(|_| DeriveError::new(span, "expected a named field or a variant"))
}

/// Whether a field type is a `PhantomData`, which carries no data.
pub(crate) fn is_phantom(ty: &[TokenTree]) -> bool {
    ty.iter()
        .take_while(|t| !matches!(t, TokenTree::Punct(p) if p.as_char() == '<'))
        .any(|t| matches!(t, TokenTree::Ident(ident) if ident == "PhantomData"))
}
