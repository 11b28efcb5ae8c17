//! `#[derive(Keyed)]`, re-exported by the `fieldmap` crate.

/// Derives `fieldmap::Keyed` for a struct with named fields or an enum of
/// unit variants.
///
/// Member attributes:
///
/// - `#[keyed(rename = "wire")]` sets the wire name (an empty string keeps
///   the declared name);
/// - `#[keyed(skip)]` leaves the member out of the keys;
/// - `#[keyed(parent)]` marks the one struct field holding the embedded
///   ancestor, whose keys are inherited;
/// - `#[keyed(null)]` gives an enum variant the null name.
#[proc_macro_derive(Keyed, attributes(keyed))]
pub fn keyed(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    fieldmap_macros_impl::derive_keyed(input.into()).into()
}
