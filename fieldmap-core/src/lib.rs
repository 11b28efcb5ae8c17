#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![warn(clippy::std_instead_of_alloc)]
//! Static type descriptions for fieldmap.
//!
//! A [`Shape`] is the accessor table `#[derive(Keyed)]` generates for a type:
//! its declared members, how to read and write each of them through a
//! type-erased `&dyn Any`, and how to reach the embedded ancestor, if any.
//!
//! Nothing in here is cached or computed at runtime. Flattening a shape into
//! a wire-name lookup table is the job of `fieldmap-reflect`.

extern crate alloc;

use alloc::boxed::Box;
use core::any::Any;

mod field;
pub use field::*;

mod shape;
pub use shape::*;

#[doc(hidden)]
pub mod __private {
    pub use alloc::boxed::Box;
    pub use core::any::{Any, TypeId, type_name};
    pub use core::option::Option::{self, None, Some};
    pub use core::result::Result;
}

/// Types whose fields can be enumerated and accessed by name.
///
/// This is normally derived with `#[derive(Keyed)]`. Writing the impl by hand
/// is possible but the accessors in [`Self::SHAPE`] must agree with the type:
/// a getter registered for `Foo` has to downcast to `Foo`, and so on.
pub trait Keyed: Any {
    /// The accessor table for this type.
    const SHAPE: &'static Shape;
}

/// Returns the shape of `T`.
///
/// Generated code stores `shape_of::<T>` as a function pointer so shapes can
/// refer to each other without const-evaluation cycles.
pub const fn shape_of<T: Keyed>() -> &'static Shape {
    T::SHAPE
}

/// Object-safe view of a [`Keyed`] value.
///
/// Encoders usually only have `&dyn DynKeyed` in hand, and need the shape of
/// the runtime type behind it.
pub trait DynKeyed: Any {
    /// The shape of the concrete type behind this reference.
    fn keyed_shape(&self) -> &'static Shape;

    /// Upcasts to `&dyn Any`.
    fn as_any(&self) -> &dyn Any;

    /// Upcasts to `&mut dyn Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Keyed> DynKeyed for T {
    #[inline]
    fn keyed_shape(&self) -> &'static Shape {
        T::SHAPE
    }

    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Moves a boxed value into `slot` if it holds exactly a `T`.
///
/// Returns the previous content of the slot on success. On a type mismatch
/// the box is handed back untouched and the slot is not modified.
#[inline]
pub fn replace_boxed<T: Any>(
    slot: &mut T,
    value: Box<dyn Any>,
) -> Result<Box<dyn Any>, Box<dyn Any>> {
    let value = value.downcast::<T>()?;
    Ok(Box::new(core::mem::replace(slot, *value)))
}
