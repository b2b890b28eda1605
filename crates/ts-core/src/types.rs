//! Validated identifier types shared by issues and worklogs.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },
}

/// Generates a validated string ID newtype with common trait implementations.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new ID after validation.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                Ok(Self(id))
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id!(
    /// A validated issue key, e.g. `PROJ-123`.
    IssueKey, "issue key"
);

define_string_id!(
    /// A validated worklog author username.
    ///
    /// An empty author would match every author filter by containment, so it
    /// is rejected when the input is read.
    AuthorName, "author name"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_key_rejects_empty() {
        assert!(IssueKey::new("").is_err());
        assert!(IssueKey::new("   ").is_err());
        assert!(IssueKey::new("PROJ-1").is_ok());
    }

    #[test]
    fn author_name_rejects_empty() {
        let err = AuthorName::new("").unwrap_err();
        assert_eq!(err.to_string(), "author name cannot be empty");
    }

    #[test]
    fn issue_key_serde_rejects_empty() {
        let result: Result<IssueKey, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn author_name_deserializes_from_plain_string() {
        let author: AuthorName = serde_json::from_str("\"alice\"").unwrap();
        assert_eq!(author.as_str(), "alice");
        assert_eq!(serde_json::to_string(&author).unwrap(), "\"alice\"");
    }
}
