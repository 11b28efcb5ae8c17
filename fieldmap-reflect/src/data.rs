//! Key/value views over a live keyed value.
//!
//! [`DataRef`] reads, [`DataMap`] reads and writes. Both are thin: a borrow of
//! the value plus the shared [`TypeInfo`] of its type. They perform no
//! conversion; a value goes in and comes out with the field's exact Rust type.
//!
//! Writing a key the type does not have is an error
//! ([`DataError::UnknownKey`]) and leaves the value untouched. Codecs that
//! would rather keep unknown keys use [`GenericData`](crate::GenericData).

use alloc::borrow::ToOwned;
use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::Any;

use fieldmap_core::DynKeyed;

use crate::{DataError, NameCase, TypeInfo, TypeInfoCache};

fn check_target(value: &dyn DynKeyed, info: &TypeInfo) -> Result<(), DataError> {
    let actual = value.keyed_shape();
    if info.shape() != actual {
        return Err(DataError::ShapeMismatch {
            expected: info.shape().type_name,
            actual: actual.type_name,
        });
    }
    if info.is_enum() {
        return Err(DataError::NotAStruct {
            type_name: actual.type_name,
        });
    }
    Ok(())
}

/// Read-only key/value view of a keyed struct.
pub struct DataRef<'mem> {
    pub(crate) value: &'mem dyn Any,
    pub(crate) info: Arc<TypeInfo>,
}

impl<'mem> DataRef<'mem> {
    /// Wraps `value` using an already resolved `TypeInfo` of its type.
    pub fn new(value: &'mem dyn DynKeyed, info: Arc<TypeInfo>) -> Result<Self, DataError> {
        check_target(value, &info)?;
        Ok(Self {
            value: value.as_any(),
            info,
        })
    }

    /// Wraps `value` with case-sensitive names from the global cache.
    pub fn of(value: &'mem dyn DynKeyed) -> Result<Self, DataError> {
        Self::with_case(value, NameCase::Sensitive)
    }

    /// Wraps `value` with names in `case` from the global cache.
    pub fn with_case(value: &'mem dyn DynKeyed, case: NameCase) -> Result<Self, DataError> {
        let info = TypeInfoCache::global().resolve_dyn(value, case)?;
        Self::new(value, info)
    }

    /// The field map in use.
    #[inline]
    pub fn type_info(&self) -> &Arc<TypeInfo> {
        &self.info
    }

    /// Wire names, in [`TypeInfo::names`] order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.info.keys()
    }

    /// Number of keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.info.len()
    }

    /// Whether the type has no keys.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.info.is_empty()
    }

    /// Whether `key` names a field.
    pub fn contains_key(&self, key: &str) -> bool {
        self.info.field(key).is_some()
    }

    /// Current value of the field named `key`; `None` if there is none.
    pub fn get(&self, key: &str) -> Option<&'mem dyn Any> {
        self.info.field(key)?.get(self.value)
    }

    /// [`Self::get`], downcast to `T`.
    pub fn get_as<T: Any>(&self, key: &str) -> Option<&'mem T> {
        self.get(key)?.downcast_ref::<T>()
    }

    /// `(wire name, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &'mem dyn Any)> + '_ {
        let value = self.value;
        self.info
            .fields()
            .filter_map(move |field| Some((field.name()?, field.get(value)?)))
    }
}

impl core::fmt::Debug for DataRef<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DataRef")
            .field("type", &self.info.shape().type_name)
            .field("case", &self.info.name_case())
            .finish_non_exhaustive()
    }
}

/// Read-write key/value view of a keyed struct.
pub struct DataMap<'mem> {
    value: &'mem mut dyn Any,
    info: Arc<TypeInfo>,
}

impl<'mem> DataMap<'mem> {
    /// Wraps `value` using an already resolved `TypeInfo` of its type.
    pub fn new(value: &'mem mut dyn DynKeyed, info: Arc<TypeInfo>) -> Result<Self, DataError> {
        check_target(value, &info)?;
        Ok(Self {
            value: value.as_any_mut(),
            info,
        })
    }

    /// Wraps `value` with case-sensitive names from the global cache.
    pub fn of(value: &'mem mut dyn DynKeyed) -> Result<Self, DataError> {
        Self::with_case(value, NameCase::Sensitive)
    }

    /// Wraps `value` with names in `case` from the global cache.
    pub fn with_case(value: &'mem mut dyn DynKeyed, case: NameCase) -> Result<Self, DataError> {
        let info = TypeInfoCache::global().resolve_dyn(value, case)?;
        Self::new(value, info)
    }

    /// The field map in use.
    #[inline]
    pub fn type_info(&self) -> &Arc<TypeInfo> {
        &self.info
    }

    /// Reborrows as a read-only view.
    pub fn as_data_ref(&self) -> DataRef<'_> {
        DataRef {
            value: &*self.value,
            info: Arc::clone(&self.info),
        }
    }

    /// Wire names, in [`TypeInfo::names`] order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.info.keys()
    }

    /// Number of keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.info.len()
    }

    /// Whether the type has no keys.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.info.is_empty()
    }

    /// Whether `key` names a field.
    pub fn contains_key(&self, key: &str) -> bool {
        self.info.field(key).is_some()
    }

    /// Current value of the field named `key`; `None` if there is none.
    pub fn get(&self, key: &str) -> Option<&dyn Any> {
        self.info.field(key)?.get(&*self.value)
    }

    /// [`Self::get`], downcast to `T`.
    pub fn get_as<T: Any>(&self, key: &str) -> Option<&T> {
        self.get(key)?.downcast_ref::<T>()
    }

    /// Mutable access to the field named `key`.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut dyn Any> {
        self.info.field(key)?.get_mut(&mut *self.value)
    }

    /// [`Self::get_mut`], downcast to `T`.
    pub fn get_mut_as<T: Any>(&mut self, key: &str) -> Option<&mut T> {
        self.get_mut(key)?.downcast_mut::<T>()
    }

    /// Moves `value` into the field named `key` and returns the old value.
    ///
    /// Fails with [`DataError::UnknownKey`] if there is no such field and
    /// with [`DataError::WrongType`] if `value` is not exactly the field's
    /// type. Either way the wrapped value is not modified.
    pub fn set(&mut self, key: &str, value: Box<dyn Any>) -> Result<Box<dyn Any>, DataError> {
        let Some(field) = self.info.field(key) else {
            return Err(DataError::UnknownKey {
                type_name: self.info.shape().type_name,
                key: key.to_owned(),
            });
        };
        field
            .replace(&mut *self.value, value)
            .map_err(|_| DataError::WrongType {
                key: key.to_owned(),
                expected: field.type_name(),
            })
    }

    /// Typed [`Self::set`].
    pub fn insert<V: Any>(&mut self, key: &str, value: V) -> Result<V, DataError> {
        let old = self.set(key, Box::new(value))?;
        old.downcast::<V>().map(|old| *old).map_err(|_| DataError::WrongType {
            key: key.to_owned(),
            expected: core::any::type_name::<V>(),
        })
    }
}

impl core::fmt::Debug for DataMap<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DataMap")
            .field("type", &self.info.shape().type_name)
            .field("case", &self.info.name_case())
            .finish_non_exhaustive()
    }
}
