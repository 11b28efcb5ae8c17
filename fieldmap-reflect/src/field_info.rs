use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;

use fieldmap_core::{Field, ParentLink, Shape};

/// A key of a [`TypeInfo`](crate::TypeInfo): a declared member, its wire
/// name, and the route to it from the type the `TypeInfo` describes.
///
/// Members inherited from an ancestor are reached by first projecting the
/// value onto that ancestor, once per level of embedding.
#[derive(Clone, Debug)]
pub struct FieldInfo {
    name: Option<&'static str>,
    field: &'static Field,
    declaring: &'static Shape,
    path: Box<[ParentLink]>,
}

impl FieldInfo {
    /// Describes a member of `declaring`, or `None` if it is not a key.
    pub fn of(declaring: &'static Shape, field: &'static Field) -> Option<Self> {
        if !field.is_key() {
            return None;
        }
        Some(Self {
            name: field.wire_name(),
            field,
            declaring,
            path: Box::new([]),
        })
    }

    /// The same member, reached from a type that embeds the current owner
    /// through `link`.
    pub(crate) fn inherited(&self, link: ParentLink) -> Self {
        let mut path = Vec::with_capacity(self.path.len() + 1);
        path.push(link);
        path.extend_from_slice(&self.path);
        Self {
            name: self.name,
            field: self.field,
            declaring: self.declaring,
            path: path.into_boxed_slice(),
        }
    }

    /// Wire name as declared, before any case normalization.
    ///
    /// `None` is the null name of a `#[keyed(null)]` variant.
    #[inline]
    pub fn name(&self) -> Option<&'static str> {
        self.name
    }

    /// The declared member.
    #[inline]
    pub fn field(&self) -> &'static Field {
        self.field
    }

    /// The type that declares the member, which may be an ancestor.
    #[inline]
    pub fn declaring_shape(&self) -> &'static Shape {
        self.declaring
    }

    /// Whether the member is inherited from an ancestor.
    #[inline]
    pub fn is_inherited(&self) -> bool {
        !self.path.is_empty()
    }

    /// Type name of the member's value.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        (self.field.type_name)()
    }

    /// Reads the member out of `owner`.
    ///
    /// Returns `None` for enum variants, or when `owner` is not the type
    /// this `FieldInfo` was resolved for.
    pub fn get<'mem>(&self, owner: &'mem dyn Any) -> Option<&'mem dyn Any> {
        let slot = self.field.slot()?;
        let mut current = owner;
        for link in self.path.iter() {
            current = (link.project)(current)?;
        }
        (slot.get)(current)
    }

    /// Borrows the member out of `owner` mutably.
    pub fn get_mut<'mem>(&self, owner: &'mem mut dyn Any) -> Option<&'mem mut dyn Any> {
        let slot = self.field.slot()?;
        let mut current = owner;
        for link in self.path.iter() {
            current = (link.project_mut)(current)?;
        }
        (slot.get_mut)(current)
    }

    /// Moves `value` into the member, returning the previous value.
    ///
    /// The box comes back as the error if it does not hold the member's
    /// exact type, and `owner` is left as it was.
    pub fn replace(
        &self,
        owner: &mut dyn Any,
        value: Box<dyn Any>,
    ) -> Result<Box<dyn Any>, Box<dyn Any>> {
        let Some(slot) = self.field.slot() else {
            return Err(value);
        };
        let mut current = owner;
        for link in self.path.iter() {
            current = match (link.project_mut)(current) {
                Some(next) => next,
                None => return Err(value),
            };
        }
        (slot.replace)(current, value)
    }

    /// The enum variant this key stands for.
    pub fn enum_value(&self) -> Option<Box<dyn Any>> {
        self.field.constant().map(|constant| (constant.value)())
    }

    /// Whether `value` is the enum variant this key stands for.
    pub fn is_variant(&self, value: &dyn Any) -> bool {
        self.field
            .constant()
            .is_some_and(|constant| (constant.matches)(value))
    }
}
