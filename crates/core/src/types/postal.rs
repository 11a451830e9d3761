//! Postal code type.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::tax::pg_text_impls;

/// Errors that can occur when parsing a [`PostalCode`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PostalCodeError {
    /// The input is not exactly the required number of characters.
    #[error("postal code must be exactly {expected} characters (got {got})")]
    WrongLength {
        /// Required length.
        expected: usize,
        /// Actual input length.
        got: usize,
    },
}

/// A postal code, exactly 5 characters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PostalCode(String);

impl PostalCode {
    /// Required length of a postal code.
    pub const LENGTH: usize = 5;

    /// Parse a `PostalCode` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not exactly 5 characters.
    pub fn parse(s: &str) -> Result<Self, PostalCodeError> {
        if s.chars().count() != Self::LENGTH {
            return Err(PostalCodeError::WrongLength {
                expected: Self::LENGTH,
                got: s.chars().count(),
            });
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the postal code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PostalCode {
    type Err = PostalCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

pg_text_impls!(PostalCode);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert!(PostalCode::parse("34000").is_ok());
    }

    #[test]
    fn test_parse_wrong_length() {
        assert!(matches!(
            PostalCode::parse("3400"),
            Err(PostalCodeError::WrongLength {
                expected: 5,
                got: 4
            })
        ));
        assert!(PostalCode::parse("340000").is_err());
    }

    #[test]
    fn test_display() {
        let code = PostalCode::parse("06100").unwrap();
        assert_eq!(format!("{code}"), "06100");
    }
}
