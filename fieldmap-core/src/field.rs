use alloc::boxed::Box;
use core::any::{Any, TypeId};

bitflags::bitflags! {
    /// Flags describing how a declared member takes part in the key set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FieldFlags: u8 {
        /// `#[keyed(skip)]`: never a key.
        const SKIP = 1 << 0;
        /// Marker member that carries no data (`PhantomData`).
        const SYNTHETIC = 1 << 1;
        /// `#[keyed(parent)]`: the embedded ancestor, reached via [`crate::ParentLink`].
        const PARENT = 1 << 2;
        /// `#[keyed(null)]`: enum variant standing for the absent wire value.
        const NULL_NAME = 1 << 3;
    }
}

/// Reads a member out of its declaring type.
pub type GetFn = fn(owner: &dyn Any) -> Option<&dyn Any>;

/// Borrows a member of its declaring type mutably.
pub type GetMutFn = fn(owner: &mut dyn Any) -> Option<&mut dyn Any>;

/// Swaps a new value into a member, returning the old one.
///
/// The box is handed back if it does not hold the member's exact type, or if
/// `owner` is not the declaring type.
pub type ReplaceFn =
    fn(owner: &mut dyn Any, value: Box<dyn Any>) -> Result<Box<dyn Any>, Box<dyn Any>>;

/// Accessors for a data-carrying member.
#[derive(Clone, Copy, Debug)]
pub struct SlotVTable {
    /// Shared access.
    pub get: GetFn,
    /// Exclusive access.
    pub get_mut: GetMutFn,
    /// Assignment.
    pub replace: ReplaceFn,
}

/// Accessors for an enum variant.
#[derive(Clone, Copy, Debug)]
pub struct ConstantVTable {
    /// Produces the variant.
    pub value: fn() -> Box<dyn Any>,
    /// Tests whether a value is this variant.
    pub matches: fn(value: &dyn Any) -> bool,
}

/// How a member is accessed at runtime.
#[derive(Clone, Copy, Debug)]
pub enum FieldAccess {
    /// A struct field living inside each instance.
    Slot(SlotVTable),
    /// A unit enum variant.
    Constant(ConstantVTable),
}

/// A declared member of a keyed type: a struct field or an enum variant.
#[derive(Clone, Copy, Debug)]
pub struct Field {
    /// Name as declared in the source, without any `r#` prefix.
    pub name: &'static str,

    /// `#[keyed(rename = "...")]`, if present.
    pub rename: Option<&'static str>,

    /// Participation flags.
    pub flags: FieldFlags,

    /// `core::any::type_name` of the member's type.
    pub type_name: fn() -> &'static str,

    /// `TypeId` of the member's type.
    pub type_id: fn() -> TypeId,

    /// Accessors.
    pub access: FieldAccess,

    /// Doc comments, one entry per line.
    pub doc: &'static [&'static str],
}

impl Field {
    /// Whether this member becomes a key of its declaring type.
    ///
    /// Excluded, synthetic and parent members do not.
    #[inline]
    pub fn is_key(&self) -> bool {
        !self
            .flags
            .intersects(FieldFlags::SKIP | FieldFlags::SYNTHETIC | FieldFlags::PARENT)
    }

    /// The name this member has on the wire.
    ///
    /// `None` is the null name of a `#[keyed(null)]` variant. An empty rename
    /// falls back to the declared name.
    #[inline]
    pub fn wire_name(&self) -> Option<&'static str> {
        if self.flags.contains(FieldFlags::NULL_NAME) {
            return None;
        }
        match self.rename {
            Some(rename) if !rename.is_empty() => Some(rename),
            _ => Some(self.name),
        }
    }

    /// Returns the slot accessors, or `None` for enum variants.
    #[inline]
    pub fn slot(&self) -> Option<&SlotVTable> {
        match &self.access {
            FieldAccess::Slot(vtable) => Some(vtable),
            FieldAccess::Constant(_) => None,
        }
    }

    /// Returns the variant accessors, or `None` for struct fields.
    #[inline]
    pub fn constant(&self) -> Option<&ConstantVTable> {
        match &self.access {
            FieldAccess::Constant(vtable) => Some(vtable),
            FieldAccess::Slot(_) => None,
        }
    }
}
