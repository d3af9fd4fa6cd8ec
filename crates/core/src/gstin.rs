//! GSTIN value object.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::states;
use crate::value_object::ValueObject;

/// 2-digit state code, 10-character PAN, entity number, literal `Z`, checksum.
pub(crate) static GSTIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z][1-9A-Z]Z[0-9A-Z]$").expect("valid GSTIN regex")
});

/// A syntactically valid, upper-cased GSTIN.
///
/// The checksum character is not verified; the backend remains the
/// authority on registration validity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Gstin(String);

impl ValueObject for Gstin {}

impl Gstin {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let normalized = raw.trim().to_uppercase();
        if !GSTIN_RE.is_match(&normalized) {
            return Err(DomainError::validation("gstin", "GSTIN format is invalid"));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Two-digit GST state code (e.g. `"27"`).
    pub fn state_code(&self) -> &str {
        &self.0[..2]
    }

    pub fn state_name(&self) -> Option<&'static str> {
        states::state_name(self.state_code())
    }

    /// The PAN embedded in characters 3..=12.
    pub fn pan(&self) -> &str {
        &self.0[2..12]
    }
}

impl core::fmt::Display for Gstin {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl core::str::FromStr for Gstin {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Gstin {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Gstin> for String {
    fn from(value: Gstin) -> Self {
        value.0
    }
}

/// Whether `gstin` is a well-formed GSTIN (case-insensitive).
pub fn is_valid_gstin(gstin: &str) -> bool {
    !gstin.is_empty() && GSTIN_RE.is_match(&gstin.to_uppercase())
}
