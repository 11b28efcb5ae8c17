#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![warn(clippy::std_instead_of_alloc)]
//! Runtime field maps for [`Keyed`](fieldmap_core::Keyed) types.
//!
//! [`TypeInfo`] flattens a shape (and its ancestors) into a sorted set of
//! wire names with a name-to-accessor lookup. [`TypeInfoCache`] computes each
//! of them once per type and case mode and hands out the same instance from
//! then on. [`DataRef`], [`DataMap`] and [`GenericData`] wrap a live value so
//! codecs can read and write it by wire name.

extern crate alloc;

mod case;
pub use case::*;

mod error;
pub use error::*;

mod field_info;
pub use field_info::*;

mod type_info;
pub use type_info::*;

mod cache;
pub use cache::*;

mod data;
pub use data::*;

mod generic;
pub use generic::*;

mod enums;
pub use enums::*;

#[cfg(feature = "tracing")]
#[allow(unused_imports)]
pub(crate) use tracing::{debug, trace};

#[cfg(not(feature = "tracing"))]
#[macro_export]
/// Forwards to tracing::trace when the tracing feature is enabled
macro_rules! trace {
    ($($tt:tt)*) => {};
}
#[cfg(not(feature = "tracing"))]
#[macro_export]
/// Forwards to tracing::debug when the tracing feature is enabled
macro_rules! debug {
    ($($tt:tt)*) => {};
}
