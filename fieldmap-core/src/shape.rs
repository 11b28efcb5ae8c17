use core::any::{Any, TypeId};
use core::fmt;

use crate::Field;

/// What kind of type a [`Shape`] describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Type {
    /// A struct with named fields; its members are [`crate::FieldAccess::Slot`]s.
    Struct,
    /// A fieldless enum; its members are [`crate::FieldAccess::Constant`]s.
    Enum,
}

/// Projects a type onto its embedded ancestor.
pub type ProjectFn = fn(owner: &dyn Any) -> Option<&dyn Any>;

/// Projects a type onto its embedded ancestor, mutably.
pub type ProjectMutFn = fn(owner: &mut dyn Any) -> Option<&mut dyn Any>;

/// Link from a type to the ancestor it embeds with `#[keyed(parent)]`.
#[derive(Clone, Copy, Debug)]
pub struct ParentLink {
    /// Declared name of the embedding field.
    pub field: &'static str,
    /// Shape of the ancestor.
    pub shape: fn() -> &'static Shape,
    /// Borrows the ancestor out of the subtype.
    pub project: ProjectFn,
    /// Borrows the ancestor out of the subtype, mutably.
    pub project_mut: ProjectMutFn,
}

impl ParentLink {
    /// Returns the ancestor's shape.
    #[inline]
    pub fn shape(&self) -> &'static Shape {
        (self.shape)()
    }
}

/// Static description of a keyed type.
#[derive(Clone, Copy)]
pub struct Shape {
    /// Name of the type as written in its declaration.
    pub type_name: &'static str,

    /// Identity of the type.
    pub id: fn() -> TypeId,

    /// Struct or enum.
    pub ty: Type,

    /// Embedded ancestor, if any. `None` means only the universal base.
    pub parent: Option<ParentLink>,

    /// Declared members, in declaration order, keys or not.
    pub fields: &'static [Field],

    /// Doc comments, one entry per line.
    pub doc: &'static [&'static str],
}

impl Shape {
    /// Identity of the described type.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        (self.id)()
    }

    /// Whether this shape describes an enum.
    #[inline]
    pub fn is_enum(&self) -> bool {
        self.ty == Type::Enum
    }

    /// Whether `value` is an instance of the described type.
    #[inline]
    pub fn is_type_of(&self, value: &dyn Any) -> bool {
        value.type_id() == self.type_id()
    }

    /// Shape of the embedded ancestor, if any.
    #[inline]
    pub fn parent_shape(&self) -> Option<&'static Shape> {
        self.parent.as_ref().map(ParentLink::shape)
    }

    /// Looks up a declared member by its source name.
    pub fn declared_field(&self, name: &str) -> Option<&'static Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        self.type_id() == other.type_id()
    }
}

impl Eq for Shape {}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shape")
            .field("type_name", &self.type_name)
            .field("ty", &self.ty)
            .field("parent", &self.parent_shape().map(|s| s.type_name))
            .field("fields", &self.fields.len())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name)
    }
}
