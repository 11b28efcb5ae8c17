use alloc::borrow::Cow;

use smol_str::SmolStr;

/// How wire names are compared.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NameCase {
    /// Names match byte for byte.
    #[default]
    Sensitive,
    /// Names are lowercased before they are stored or looked up.
    Insensitive,
}

impl NameCase {
    /// Maps an `ignore_case` flag onto a case mode.
    #[inline]
    pub const fn from_ignore_case(ignore_case: bool) -> Self {
        if ignore_case {
            NameCase::Insensitive
        } else {
            NameCase::Sensitive
        }
    }

    /// Whether letter case is ignored.
    #[inline]
    pub const fn ignores_case(self) -> bool {
        matches!(self, NameCase::Insensitive)
    }

    /// Brings a name into the canonical form for this mode.
    ///
    /// Borrows when nothing needs to change.
    pub fn normalize(self, name: &str) -> Cow<'_, str> {
        match self {
            NameCase::Insensitive if name.chars().any(char::is_uppercase) => {
                Cow::Owned(name.to_lowercase())
            }
            _ => Cow::Borrowed(name),
        }
    }

    /// Lookup key for a wire name, `None` being the null name.
    #[inline]
    pub(crate) fn key(self, name: Option<&str>) -> Option<SmolStr> {
        name.map(|name| SmolStr::new(self.normalize(name)))
    }
}

impl core::fmt::Display for NameCase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            NameCase::Sensitive => f.write_str("case-sensitive"),
            NameCase::Insensitive => f.write_str("case-insensitive"),
        }
    }
}
