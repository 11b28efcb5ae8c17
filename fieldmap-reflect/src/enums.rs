//! Wire names of unit enum variants.
//!
//! Each keyed variant of an enum is a constant key of its [`TypeInfo`]: the
//! key's name is what goes on the wire, and the key hands back the variant
//! when the name comes back in.

use alloc::sync::Arc;

use fieldmap_core::Keyed;

use crate::{DataError, NameCase, TypeInfo, TypeInfoCache};

fn enum_info<T: Keyed>() -> Result<Arc<TypeInfo>, DataError> {
    if !T::SHAPE.is_enum() {
        return Err(DataError::NotAnEnum {
            type_name: T::SHAPE.type_name,
        });
    }
    Ok(TypeInfoCache::global().resolve_of::<T>(NameCase::Sensitive)?)
}

/// Wire name of `value`; `Ok(None)` is the null name.
///
/// Fails with [`DataError::UnknownVariant`] for variants marked
/// `#[keyed(skip)]`.
pub fn enum_name<T: Keyed>(value: &T) -> Result<Option<&'static str>, DataError> {
    enum_info::<T>()?
        .variant_name(value)
        .ok_or(DataError::UnknownVariant {
            type_name: T::SHAPE.type_name,
        })
}

/// The variant whose wire name is `name`, `None` being the null name.
///
/// `Ok(None)` means no variant carries that name.
pub fn parse_enum<T: Keyed>(name: Option<&str>) -> Result<Option<T>, DataError> {
    let info = enum_info::<T>()?;
    let Some(value) = info.field_by_key(name).and_then(|field| field.enum_value()) else {
        return Ok(None);
    };
    Ok(value.downcast::<T>().ok().map(|value| *value))
}
