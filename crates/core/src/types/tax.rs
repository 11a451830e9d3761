//! Tax identification types.
//!
//! A customer is identified to the tax authority either by a 10-digit tax
//! number (companies) or an 11-digit citizen id (individuals). Both are
//! fixed-length digit strings, so each gets its own parse-validated newtype.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`TaxNumber`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum TaxNumberError {
    /// The input is not exactly the required number of characters.
    #[error("tax number must be exactly {expected} digits (got {got})")]
    WrongLength {
        /// Required length.
        expected: usize,
        /// Actual input length.
        got: usize,
    },
    /// The input contains a non-digit character.
    #[error("tax number must contain only digits")]
    NotDigits,
}

/// A company tax number.
///
/// Exactly 10 digits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TaxNumber(String);

impl TaxNumber {
    /// Required length of a tax number.
    pub const LENGTH: usize = 10;

    /// Parse a `TaxNumber` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not exactly 10 digits.
    pub fn parse(s: &str) -> Result<Self, TaxNumberError> {
        if s.len() != Self::LENGTH {
            return Err(TaxNumberError::WrongLength {
                expected: Self::LENGTH,
                got: s.len(),
            });
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TaxNumberError::NotDigits);
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the tax number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaxNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TaxNumber {
    type Err = TaxNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Errors that can occur when parsing a [`CitizenId`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum CitizenIdError {
    /// The input is not exactly the required number of characters.
    #[error("citizen id must be exactly {expected} digits (got {got})")]
    WrongLength {
        /// Required length.
        expected: usize,
        /// Actual input length.
        got: usize,
    },
    /// The input contains a non-digit character.
    #[error("citizen id must contain only digits")]
    NotDigits,
}

/// A national citizen identification number.
///
/// Exactly 11 digits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct CitizenId(String);

impl CitizenId {
    /// Required length of a citizen id.
    pub const LENGTH: usize = 11;

    /// Parse a `CitizenId` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not exactly 11 digits.
    pub fn parse(s: &str) -> Result<Self, CitizenIdError> {
        if s.len() != Self::LENGTH {
            return Err(CitizenIdError::WrongLength {
                expected: Self::LENGTH,
                got: s.len(),
            });
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CitizenIdError::NotDigits);
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the citizen id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CitizenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CitizenId {
    type Err = CitizenIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// SQLx support (with postgres feature)
macro_rules! pg_text_impls {
    ($name:ident) => {
        #[cfg(feature = "postgres")]
        impl sqlx::Type<sqlx::Postgres> for $name {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> sqlx::Decode<'r, sqlx::Postgres> for $name {
            fn decode(
                value: sqlx::postgres::PgValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
                // Database values are assumed valid
                Ok(Self(s))
            }
        }

        #[cfg(feature = "postgres")]
        impl sqlx::Encode<'_, sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut sqlx::postgres::PgArgumentBuffer,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

pg_text_impls!(TaxNumber);
pg_text_impls!(CitizenId);

pub(crate) use pg_text_impls;
