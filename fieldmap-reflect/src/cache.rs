//! Process-wide store of [`TypeInfo`]s.
//!
//! One partition per [`NameCase`], each a `TypeId`-keyed map behind a
//! `parking_lot::RwLock`. Lookups take the read lock only; a miss builds the
//! `TypeInfo` with no lock held (ancestors are resolved through the cache
//! recursively, which is bounded by the depth of the embedding chain) and
//! then inserts under the write lock if nobody beat us to it. Whoever
//! inserted first wins, and everyone returns that instance.
//!
//! Entries are never evicted. A Rust type cannot be unloaded, so a shape's
//! field map stays valid for as long as the process runs.

use alloc::sync::Arc;
use core::any::TypeId;
use std::sync::OnceLock;

use fieldmap_core::{DynKeyed, Keyed, Shape};
use hashbrown::HashMap;
use parking_lot::RwLock;

use crate::{NameCase, TypeInfo, TypeInfoError, trace};

type Partition = RwLock<HashMap<TypeId, Arc<TypeInfo>>>;

static GLOBAL: OnceLock<TypeInfoCache> = OnceLock::new();

/// Shared [`TypeInfo`] instances, keyed by type and case mode.
///
/// Use [`TypeInfoCache::global`] from codecs, or an instance of your own
/// where isolation matters (tests, plugins with their own registries).
#[derive(Default)]
pub struct TypeInfoCache {
    sensitive: Partition,
    insensitive: Partition,
}

impl TypeInfoCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache, created on first use.
    pub fn global() -> &'static TypeInfoCache {
        GLOBAL.get_or_init(TypeInfoCache::new)
    }

    fn partition(&self, case: NameCase) -> &Partition {
        match case {
            NameCase::Sensitive => &self.sensitive,
            NameCase::Insensitive => &self.insensitive,
        }
    }

    /// Returns the field map of `shape` in `case`, building it on first use.
    ///
    /// Every successful call for the same type and case returns the same
    /// `Arc`. Errors are not cached: a type that fails, fails every time.
    pub fn resolve(
        &self,
        shape: &'static Shape,
        case: NameCase,
    ) -> Result<Arc<TypeInfo>, TypeInfoError> {
        let key = shape.type_id();
        let partition = self.partition(case);

        if let Some(info) = partition.read().get(&key) {
            trace!("type info cache hit: {} ({case})", shape.type_name);
            return Ok(Arc::clone(info));
        }

        let built = Arc::new(TypeInfo::build(shape, case, |parent, case| {
            self.resolve(parent, case)
        })?);

        let mut map = partition.write();
        let stored = map.entry(key).or_insert_with(|| Arc::clone(&built));
        if !Arc::ptr_eq(stored, &built) {
            trace!("lost the race to cache {} ({case})", shape.type_name);
        }
        Ok(Arc::clone(stored))
    }

    /// [`Self::resolve`] for a statically known type.
    pub fn resolve_of<T: Keyed>(&self, case: NameCase) -> Result<Arc<TypeInfo>, TypeInfoError> {
        self.resolve(T::SHAPE, case)
    }

    /// [`Self::resolve`] for the runtime type of `value`.
    pub fn resolve_dyn(
        &self,
        value: &dyn DynKeyed,
        case: NameCase,
    ) -> Result<Arc<TypeInfo>, TypeInfoError> {
        self.resolve(value.keyed_shape(), case)
    }

    /// [`Self::resolve`] for callers that accept an absent type: `None` in,
    /// `None` out.
    pub fn resolve_optional(
        &self,
        shape: Option<&'static Shape>,
        case: NameCase,
    ) -> Result<Option<Arc<TypeInfo>>, TypeInfoError> {
        shape.map(|shape| self.resolve(shape, case)).transpose()
    }

    /// Whether `shape` has already been resolved in `case`.
    pub fn contains(&self, shape: &'static Shape, case: NameCase) -> bool {
        self.partition(case).read().contains_key(&shape.type_id())
    }

    /// Number of types resolved in `case`.
    pub fn len(&self, case: NameCase) -> usize {
        self.partition(case).read().len()
    }

    /// Whether nothing has been resolved in either mode.
    pub fn is_empty(&self) -> bool {
        self.len(NameCase::Sensitive) == 0 && self.len(NameCase::Insensitive) == 0
    }
}

impl core::fmt::Debug for TypeInfoCache {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TypeInfoCache")
            .field("sensitive", &self.len(NameCase::Sensitive))
            .field("insensitive", &self.len(NameCase::Insensitive))
            .finish()
    }
}
