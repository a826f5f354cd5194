//! # Region Identity
//!
//! A [`RegionCode`] names a regulatory region (normally an ISO country code
//! such as `US` or `GB`). [`RegulatoryAuthority`] names the body whose rules
//! apply there and selects the regional value-provider variant.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Uppercase region code. Constructed through [`RegionCode::new`], which
/// normalizes case and rejects empty or non-alphanumeric input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RegionCode(String);

impl RegionCode {
    pub fn new(code: impl AsRef<str>) -> Result<Self, CoreError> {
        let trimmed = code.as_ref().trim();
        let valid = !trimmed.is_empty()
            && trimmed.len() <= 16
            && trimmed.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid {
            return Err(CoreError::InvalidRegionCode(code.as_ref().to_string()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// The United States region, the service default.
    pub fn us() -> Self {
        Self("US".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RegionCode {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RegionCode> for String {
    fn from(code: RegionCode) -> Self {
        code.0
    }
}

impl std::fmt::Display for RegionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The regulatory body governing a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegulatoryAuthority {
    /// United States Federal Communications Commission.
    Fcc,
    /// United Kingdom Office of Communications (ETSI device model).
    Ofcom,
    /// Any other authority; PAWS defaults apply.
    Generic,
}

impl RegulatoryAuthority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fcc => "fcc",
            Self::Ofcom => "ofcom",
            Self::Generic => "generic",
        }
    }
}

impl std::str::FromStr for RegulatoryAuthority {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fcc" => Ok(Self::Fcc),
            "ofcom" => Ok(Self::Ofcom),
            "generic" | "default" => Ok(Self::Generic),
            _ => Err(CoreError::UnknownAuthority(s.to_string())),
        }
    }
}

impl std::fmt::Display for RegulatoryAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
