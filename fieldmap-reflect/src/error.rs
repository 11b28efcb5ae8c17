use alloc::string::String;

use smol_str::SmolStr;

use crate::NameCase;

/// A keyed type whose field map cannot be built.
///
/// These are mistakes in the data model, not runtime conditions: the same
/// type fails the same way every time it is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeInfoError {
    /// Two keys of one type, or of a type and its ancestor, share a wire name.
    DuplicateName {
        /// The type being resolved.
        type_name: &'static str,
        /// The colliding name after normalization (`None` is the null name).
        name: Option<SmolStr>,
        /// Declaring type and member of the key registered first.
        first: (&'static str, &'static str),
        /// Declaring type and member of the key that collided with it.
        second: (&'static str, &'static str),
        /// Mode the names were compared in.
        case: NameCase,
    },

    /// Enums can only be resolved case-sensitively.
    CaseInsensitiveEnum {
        /// The enum.
        type_name: &'static str,
    },

    /// The `#[keyed(parent)]` field holds an enum, which has no fields to
    /// inherit.
    EnumParent {
        /// The type embedding the enum.
        type_name: &'static str,
        /// Declared name of the embedding field.
        field: &'static str,
        /// The enum.
        parent: &'static str,
    },
}

impl core::fmt::Display for TypeInfoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TypeInfoError::DuplicateName {
                type_name,
                name,
                first,
                second,
                case,
            } => {
                let qualifier = if case.ignores_case() {
                    "case-insensitive "
                } else {
                    ""
                };
                write!(f, "{type_name}: two fields have the same {qualifier}name ")?;
                match name {
                    Some(name) => write!(f, "`{name}`")?,
                    None => f.write_str("<null>")?,
                }
                write!(f, ": {}::{} and {}::{}", first.0, first.1, second.0, second.1)
            }
            TypeInfoError::CaseInsensitiveEnum { type_name } => {
                write!(f, "cannot ignore case on an enum: {type_name}")
            }
            TypeInfoError::EnumParent {
                type_name,
                field,
                parent,
            } => write!(
                f,
                "{type_name}::{field} cannot be the parent: {parent} is an enum"
            ),
        }
    }
}

impl core::error::Error for TypeInfoError {}

/// Errors reported by the data views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    /// The key is not representable on this type.
    UnknownKey {
        /// The type behind the view.
        type_name: &'static str,
        /// The key as it was passed in.
        key: String,
    },

    /// The value does not have the exact Rust type of the field.
    WrongType {
        /// The key as it was passed in.
        key: String,
        /// Type name of the field.
        expected: &'static str,
    },

    /// A view was built from a `TypeInfo` that describes another type.
    ShapeMismatch {
        /// Type described by the `TypeInfo`.
        expected: &'static str,
        /// Type of the value.
        actual: &'static str,
    },

    /// Data views wrap structs only.
    NotAStruct {
        /// The offending type.
        type_name: &'static str,
    },

    /// Enum helpers were called on a struct.
    NotAnEnum {
        /// The offending type.
        type_name: &'static str,
    },

    /// The variant is excluded from the enum's keys.
    UnknownVariant {
        /// The enum.
        type_name: &'static str,
    },

    /// The type's field map could not be built.
    TypeInfo(TypeInfoError),
}

impl From<TypeInfoError> for DataError {
    fn from(error: TypeInfoError) -> Self {
        DataError::TypeInfo(error)
    }
}

impl core::fmt::Display for DataError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DataError::UnknownKey { type_name, key } => {
                write!(f, "no field of key `{key}` on {type_name}")
            }
            DataError::WrongType { key, expected } => {
                write!(f, "value for `{key}` is not a {expected}")
            }
            DataError::ShapeMismatch { expected, actual } => {
                write!(f, "type info describes {expected}, but the value is a {actual}")
            }
            DataError::NotAStruct { type_name } => write!(f, "{type_name} is not a struct"),
            DataError::NotAnEnum { type_name } => write!(f, "{type_name} is not an enum"),
            DataError::UnknownVariant { type_name } => {
                write!(f, "variant of {type_name} has no wire name")
            }
            DataError::TypeInfo(error) => core::fmt::Display::fmt(error, f),
        }
    }
}

impl core::error::Error for DataError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            DataError::TypeInfo(error) => Some(error),
            _ => None,
        }
    }
}
