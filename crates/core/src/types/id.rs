//! Newtype IDs for type-safe document references.
//!
//! The store API identifies every document by an opaque string id (the `_id`
//! field). Use the `define_id!` macro to create wrappers that prevent mixing
//! ids of different document types.

use thiserror::Error;

/// Error returned when an id string cannot be used as a document id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    /// The id is empty or only whitespace.
    #[error("document id cannot be empty")]
    Empty,
    /// The id contains a path separator or other URL-unsafe character.
    #[error("document id contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// Validate an id string, returning it trimmed.
///
/// Ids are interpolated into request paths (`/api/admins/{id}`), so anything
/// that would change the path structure is rejected.
///
/// # Errors
///
/// Returns [`IdError`] if the id is empty or contains a reserved character.
pub fn validate_id(raw: &str) -> Result<&str, IdError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(IdError::Empty);
    }
    if let Some(c) = trimmed
        .chars()
        .find(|c| matches!(c, '/' | '?' | '#' | '%') || c.is_whitespace())
    {
        return Err(IdError::InvalidCharacter(c));
    }
    Ok(trimmed)
}

/// Macro to define a type-safe document id wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - `parse()` (validated) and `as_str()`
/// - `Display` and `FromStr`
///
/// # Example
///
/// ```rust
/// # use backoffice_core::define_id;
/// define_id!(WidgetId);
/// define_id!(GadgetId);
///
/// let widget = WidgetId::parse("665f1c").unwrap();
/// assert_eq!(widget.as_str(), "665f1c");
///
/// // These are different types, so this won't compile:
/// // let _: GadgetId = widget;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Parse an id, rejecting empty or path-unsafe values.
            ///
            /// # Errors
            ///
            /// Returns an error if the id is empty or contains a reserved character.
            pub fn parse(raw: &str) -> ::core::result::Result<Self, $crate::IdError> {
                $crate::validate_id(raw).map(|id| Self(id.to_owned()))
            }

            /// Get the underlying id string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::IdError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Self::parse(s)
            }
        }
    };
}

define_id!(ProductId);
define_id!(CategoryId);
define_id!(OrderId);
define_id!(AdminId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_whitespace() {
        let id = ProductId::parse("  665f1c2ab  ").unwrap();
        assert_eq!(id.as_str(), "665f1c2ab");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!(AdminId::parse("   "), Err(IdError::Empty));
    }

    #[test]
    fn test_parse_rejects_path_characters() {
        assert_eq!(
            AdminId::parse("abc/../x"),
            Err(IdError::InvalidCharacter('/'))
        );
        assert_eq!(
            AdminId::parse("abc?x=1"),
            Err(IdError::InvalidCharacter('?'))
        );
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = CategoryId::parse("c1").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"c1\"");
        let back: CategoryId = serde_json::from_str("\"c1\"").unwrap();
        assert_eq!(back, id);
    }
}
