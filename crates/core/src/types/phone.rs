//! Phone number type and category enum.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::tax::pg_text_impls;

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PhoneNumberError {
    /// The input is not exactly the required number of digits.
    #[error("phone number must be exactly {expected} digits (got {got})")]
    WrongLength {
        /// Required length.
        expected: usize,
        /// Actual input length.
        got: usize,
    },
    /// The input contains a non-digit character.
    #[error("phone number must contain only digits")]
    NotDigits,
}

/// A phone number, stored as exactly 10 digits without the leading zero
/// or country prefix (e.g., `5321234567`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Required number of digits.
    pub const LENGTH: usize = 10;

    /// Parse a `PhoneNumber` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not exactly 10 digits.
    pub fn parse(s: &str) -> Result<Self, PhoneNumberError> {
        if s.len() != Self::LENGTH {
            return Err(PhoneNumberError::WrongLength {
                expected: Self::LENGTH,
                got: s.len(),
            });
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PhoneNumberError::NotDigits);
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the raw digits as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Format for display with a leading zero and spaced groups
    /// (e.g., `0 532 123 45 67`).
    #[must_use]
    pub fn display_grouped(&self) -> String {
        let digits = &self.0;
        let (area, rest) = digits.split_at(3);
        let (mid, rest) = rest.split_at(3);
        let (p1, p2) = rest.split_at(2);
        format!("0 {area} {mid} {p1} {p2}")
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = PhoneNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

pg_text_impls!(PhoneNumber);

/// Error returned when parsing a [`PhoneKind`] from a string fails.
#[derive(thiserror::Error, Debug, Clone)]
#[error("invalid phone kind: {0}")]
pub struct PhoneKindError(pub String);

/// Category of a customer phone record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "phone_kind", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum PhoneKind {
    Mobile,
    Work,
    Fax,
    Home,
}

impl fmt::Display for PhoneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mobile => write!(f, "mobile"),
            Self::Work => write!(f, "work"),
            Self::Fax => write!(f, "fax"),
            Self::Home => write!(f, "home"),
        }
    }
}

impl std::str::FromStr for PhoneKind {
    type Err = PhoneKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mobile" => Ok(Self::Mobile),
            "work" => Ok(Self::Work),
            "fax" => Ok(Self::Fax),
            "home" => Ok(Self::Home),
            other => Err(PhoneKindError(other.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert!(PhoneNumber::parse("5321234567").is_ok());
    }

    #[test]
    fn test_parse_wrong_length() {
        assert!(matches!(
            PhoneNumber::parse("532123456"),
            Err(PhoneNumberError::WrongLength {
                expected: 10,
                got: 9
            })
        ));
        assert!(PhoneNumber::parse("53212345678").is_err());
    }

    #[test]
    fn test_parse_non_digit() {
        assert!(matches!(
            PhoneNumber::parse("53212345ab"),
            Err(PhoneNumberError::NotDigits)
        ));
    }

    #[test]
    fn test_display_grouped() {
        let phone = PhoneNumber::parse("5321234567").unwrap();
        assert_eq!(phone.display_grouped(), "0 532 123 45 67");
    }

    #[test]
    fn test_phone_kind_roundtrip() {
        for kind in [
            PhoneKind::Mobile,
            PhoneKind::Work,
            PhoneKind::Fax,
            PhoneKind::Home,
        ] {
            let parsed: PhoneKind = kind.to_string().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn test_phone_kind_serde() {
        assert_eq!(
            serde_json::to_string(&PhoneKind::Mobile).unwrap(),
            "\"mobile\""
        );
        let parsed: PhoneKind = serde_json::from_str("\"fax\"").unwrap();
        assert_eq!(parsed, PhoneKind::Fax);
    }

    #[test]
    fn test_phone_kind_invalid() {
        assert!("pager".parse::<PhoneKind>().is_err());
    }
}
