#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![warn(clippy::std_instead_of_alloc)]
//! Keyed field maps for Rust types.
//!
//! `#[derive(Keyed)]` records, for a struct or a fieldless enum, which
//! members exist and how to reach them. At runtime a [`TypeInfo`] flattens
//! that into a sorted set of wire names (ancestors included) with a lookup
//! from name to accessor, computed once per type and case mode by the
//! process-wide [`TypeInfoCache`].
//!
//! ```
//! use fieldmap::{DataMap, Keyed, NameCase, TypeInfo};
//!
//! #[derive(Keyed)]
//! struct Point {
//!     x: i32,
//!     #[keyed(rename = "Y")]
//!     y: i32,
//! }
//!
//! let info = TypeInfo::of::<Point>(NameCase::Sensitive).unwrap();
//! assert_eq!(info.keys().collect::<Vec<_>>(), ["Y", "x"]);
//!
//! let mut point = Point { x: 1, y: 2 };
//! let mut data = DataMap::of(&mut point).unwrap();
//! data.insert("x", 10_i32).unwrap();
//! assert_eq!(data.get_as::<i32>("Y"), Some(&2));
//! assert_eq!(point.x, 10);
//! ```
//!
//! Without the default `reflect` feature only the derive and the static
//! [`Shape`] tables are available.

pub use fieldmap_core::*;

pub use fieldmap_macros::*;

#[cfg(feature = "reflect")]
pub use fieldmap_reflect::*;
