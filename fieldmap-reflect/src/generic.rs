use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use core::any::Any;

use fieldmap_core::Keyed;
use indexmap::IndexMap;

use crate::{DataError, DataRef, NameCase, TypeInfo, TypeInfoCache};

/// Value stored under a key its type does not declare.
pub type UnknownValue = Box<dyn Any + Send + Sync>;

/// A keyed struct that also keeps the keys it does not declare.
///
/// Declared keys read and write the struct's fields. Any other key lands in
/// an ordered overflow map instead of being rejected, so a decode followed by
/// an encode preserves everything the peer sent.
pub struct GenericData<T> {
    value: T,
    info: Arc<TypeInfo>,
    unknown: IndexMap<String, UnknownValue>,
}

impl<T: Keyed> GenericData<T> {
    /// Wraps `value` with case-sensitive names.
    pub fn new(value: T) -> Result<Self, DataError> {
        Self::with_case(value, NameCase::Sensitive)
    }

    /// Wraps `value` with names in `case`; unknown keys are normalized the
    /// same way.
    pub fn with_case(value: T, case: NameCase) -> Result<Self, DataError> {
        let info = TypeInfoCache::global().resolve_of::<T>(case)?;
        if info.is_enum() {
            return Err(DataError::NotAStruct {
                type_name: T::SHAPE.type_name,
            });
        }
        Ok(Self {
            value,
            info,
            unknown: IndexMap::new(),
        })
    }

    /// The wrapped struct.
    #[inline]
    pub fn value(&self) -> &T {
        &self.value
    }

    /// The wrapped struct, mutably.
    #[inline]
    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    /// Unwraps the struct, dropping unknown keys.
    pub fn into_inner(self) -> T {
        self.value
    }

    /// The field map in use.
    #[inline]
    pub fn type_info(&self) -> &Arc<TypeInfo> {
        &self.info
    }

    /// Keys the struct does not declare, in insertion order.
    #[inline]
    pub fn unknown(&self) -> &IndexMap<String, UnknownValue> {
        &self.unknown
    }

    /// Read-only view over the declared fields only.
    pub fn as_data_ref(&self) -> DataRef<'_> {
        DataRef {
            value: &self.value,
            info: Arc::clone(&self.info),
        }
    }

    /// Declared keys in name order, then unknown keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.info
            .keys()
            .chain(self.unknown.keys().map(String::as_str))
    }

    /// Number of keys, declared and unknown.
    pub fn len(&self) -> usize {
        self.info.len() + self.unknown.len()
    }

    /// Whether there are no keys at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value under `key`, declared or not.
    pub fn get(&self, key: &str) -> Option<&dyn Any> {
        match self.info.field(key) {
            Some(field) => field.get(&self.value),
            None => self
                .unknown
                .get(&*self.info.name_case().normalize(key))
                .map(|value| &**value as &dyn Any),
        }
    }

    /// [`Self::get`], downcast to `V`.
    pub fn get_as<V: Any>(&self, key: &str) -> Option<&V> {
        self.get(key)?.downcast_ref::<V>()
    }

    /// Stores `value` under `key` and returns what was there before.
    ///
    /// Declared keys must receive a value of the field's exact type
    /// ([`DataError::WrongType`] otherwise); unknown keys accept anything.
    pub fn set(&mut self, key: &str, value: UnknownValue) -> Result<Option<Box<dyn Any>>, DataError> {
        if let Some(field) = self.info.field(key) {
            return field
                .replace(&mut self.value, value)
                .map(Some)
                .map_err(|_| DataError::WrongType {
                    key: key.into(),
                    expected: field.type_name(),
                });
        }
        let key = self.info.name_case().normalize(key).into_owned();
        Ok(self
            .unknown
            .insert(key, value)
            .map(|old| old as Box<dyn Any>))
    }

    /// Typed [`Self::set`].
    pub fn insert<V: Any + Send + Sync>(
        &mut self,
        key: &str,
        value: V,
    ) -> Result<Option<Box<dyn Any>>, DataError> {
        self.set(key, Box::new(value))
    }

    /// Removes an unknown key. Declared fields cannot be removed.
    pub fn remove_unknown(&mut self, key: &str) -> Option<UnknownValue> {
        self.unknown
            .shift_remove(&*self.info.name_case().normalize(key))
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for GenericData<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GenericData")
            .field("value", &self.value)
            .field("unknown", &self.unknown.keys().collect::<alloc::vec::Vec<_>>())
            .finish()
    }
}
