use alloc::boxed::Box;
use alloc::collections::BTreeSet;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, TypeId};

use fieldmap_core::{Field, Keyed, Shape};
use hashbrown::HashMap;
use smol_str::SmolStr;

use crate::{FieldInfo, NameCase, TypeInfoCache, TypeInfoError, debug, trace};

/// The flattened field map of a keyed type in one [`NameCase`].
///
/// Holds the sorted, de-duplicated wire names (the null name first, if any)
/// and a lookup from normalized name to [`FieldInfo`], ancestors included.
/// Immutable once built; obtain shared instances from a [`TypeInfoCache`].
#[derive(Debug)]
pub struct TypeInfo {
    shape: &'static Shape,
    case: NameCase,
    fields: HashMap<Option<SmolStr>, FieldInfo>,
    names: Box<[Option<SmolStr>]>,
}

impl TypeInfo {
    /// Returns the shared `TypeInfo` of `T` from the global cache.
    pub fn of<T: Keyed>(case: NameCase) -> Result<Arc<TypeInfo>, TypeInfoError> {
        TypeInfoCache::global().resolve(T::SHAPE, case)
    }

    /// Builds the field map of `shape`.
    ///
    /// `resolve_parent` supplies the field map of the embedded ancestor in
    /// the same case mode; the cache passes itself here so ancestors are
    /// shared too.
    pub fn build<F>(
        shape: &'static Shape,
        case: NameCase,
        resolve_parent: F,
    ) -> Result<TypeInfo, TypeInfoError>
    where
        F: FnOnce(&'static Shape, NameCase) -> Result<Arc<TypeInfo>, TypeInfoError>,
    {
        if case.ignores_case() && shape.is_enum() {
            return Err(TypeInfoError::CaseInsensitiveEnum {
                type_name: shape.type_name,
            });
        }

        let mut fields: HashMap<Option<SmolStr>, FieldInfo> = HashMap::new();
        let mut names: BTreeSet<Option<SmolStr>> = BTreeSet::new();

        if let Some(link) = shape.parent {
            let parent_shape = link.shape();
            if parent_shape.is_enum() {
                return Err(TypeInfoError::EnumParent {
                    type_name: shape.type_name,
                    field: link.field,
                    parent: parent_shape.type_name,
                });
            }
            let parent = resolve_parent(parent_shape, case)?;
            trace!(
                "seeding {} with {} keys of {}",
                shape.type_name,
                parent.len(),
                parent.shape.type_name
            );
            fields.reserve(parent.fields.len());
            for (key, info) in parent.fields.iter() {
                fields.insert(key.clone(), info.inherited(link));
            }
            names.extend(parent.names.iter().cloned());
        }

        for field in shape.fields {
            let Some(info) = FieldInfo::of(shape, field) else {
                continue;
            };
            let key = case.key(info.name());
            if let Some(existing) = fields.get(&key) {
                return Err(TypeInfoError::DuplicateName {
                    type_name: shape.type_name,
                    name: key,
                    first: (existing.declaring_shape().type_name, existing.field().name),
                    second: (shape.type_name, field.name),
                    case,
                });
            }
            names.insert(key.clone());
            fields.insert(key, info);
        }

        debug!(
            "built field map of {} ({case}): {} keys",
            shape.type_name,
            names.len()
        );

        Ok(TypeInfo {
            shape,
            case,
            fields,
            names: names.into_iter().collect::<Vec<_>>().into_boxed_slice(),
        })
    }

    /// The described type.
    #[inline]
    pub fn shape(&self) -> &'static Shape {
        self.shape
    }

    /// Identity of the described type.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.shape.type_id()
    }

    /// Case mode the names were normalized in.
    #[inline]
    pub fn name_case(&self) -> NameCase {
        self.case
    }

    /// Whether names are matched ignoring case.
    #[inline]
    pub fn ignore_case(&self) -> bool {
        self.case.ignores_case()
    }

    /// Whether the described type is an enum.
    #[inline]
    pub fn is_enum(&self) -> bool {
        self.shape.is_enum()
    }

    /// Normalized wire names, sorted, with the null name first if present.
    #[inline]
    pub fn names(&self) -> &[Option<SmolStr>] {
        &self.names
    }

    /// Non-null wire names in [`Self::names`] order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().filter_map(|name| name.as_deref())
    }

    /// Number of keys, the null name included.
    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the type has no keys at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Keys in [`Self::names`] order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldInfo> + '_ {
        self.names.iter().filter_map(|name| self.fields.get(name))
    }

    /// Looks up a key by wire name, normalizing it first.
    ///
    /// A miss is not an error; callers decide what an unknown name means.
    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.field_by_key(Some(name))
    }

    /// Looks up the key with the null name.
    pub fn null_field(&self) -> Option<&FieldInfo> {
        self.field_by_key(None)
    }

    /// Looks up a key, `None` being the null name.
    pub fn field_by_key(&self, name: Option<&str>) -> Option<&FieldInfo> {
        self.fields.get(&self.case.key(name))
    }

    /// The declared member behind a wire name.
    pub fn declared_field(&self, name: &str) -> Option<&'static Field> {
        self.field(name).map(FieldInfo::field)
    }

    /// Wire name of an enum variant.
    ///
    /// The outer `None` means `value` is not a keyed variant of this type;
    /// `Some(None)` is the null name.
    pub fn variant_name(&self, value: &dyn Any) -> Option<Option<&'static str>> {
        if !self.shape.is_type_of(value) {
            return None;
        }
        self.fields
            .values()
            .find(|info| info.is_variant(value))
            .map(FieldInfo::name)
    }
}
