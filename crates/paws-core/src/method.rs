//! # PAWS Method Table
//!
//! The fixed set of recognized RPC methods. Each method knows its wire
//! string, the `type` tag placed on its response, and the audit tag its
//! outcome is recorded under. The wire strings are an external contract and
//! are compared byte-for-byte (case-sensitive).

use serde::{Deserialize, Serialize};

/// One of the seven recognized PAWS methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PawsMethod {
    Init,
    Register,
    AvailableSpectrum,
    AvailableSpectrumBatch,
    Notify,
    ValidateDevice,
    InterferenceQuery,
}

impl PawsMethod {
    /// Every recognized method, in table order.
    pub const ALL: [PawsMethod; 7] = [
        Self::Init,
        Self::Register,
        Self::AvailableSpectrum,
        Self::AvailableSpectrumBatch,
        Self::Notify,
        Self::ValidateDevice,
        Self::InterferenceQuery,
    ];

    /// Byte-exact wire name.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Init => "spectrum.paws.init",
            Self::Register => "spectrum.paws.register",
            Self::AvailableSpectrum => "spectrum.paws.getSpectrum",
            Self::AvailableSpectrumBatch => "spectrum.paws.getSpectrumBatch",
            Self::Notify => "spectrum.paws.notifySpectrumUse",
            Self::ValidateDevice => "spectrum.paws.verifyDevice",
            Self::InterferenceQuery => "spectrum.paws.interferenceQuery",
        }
    }

    /// Resolve a wire name. Case-sensitive; returns `None` for anything
    /// outside the table.
    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.wire_name() == name)
    }

    /// The `type` field of this method's response.
    pub fn response_type(&self) -> &'static str {
        match self {
            Self::Init => "INIT_RESP",
            Self::Register => "REGISTRATION_RESP",
            Self::AvailableSpectrum => "AVAIL_SPECTRUM_RESP",
            Self::AvailableSpectrumBatch => "AVAIL_SPECTRUM_BATCH_RESP",
            Self::Notify => "SPECTRUM_USE_RESP",
            Self::ValidateDevice => "DEV_VALID_RESP",
            Self::InterferenceQuery => "INTERFERENCE_QUERY_RESP",
        }
    }

    /// Audit tag and human label for this method.
    pub fn audit(&self) -> (AuditId, &'static str) {
        match self {
            Self::Init => (AuditId::PawsInitReq, "PAWS init request"),
            Self::Register => (AuditId::PawsRegistrationReq, "PAWS registration request"),
            Self::AvailableSpectrum => (
                AuditId::PawsAvailableSpectrumReq,
                "PAWS available spectrum request",
            ),
            Self::AvailableSpectrumBatch => (
                AuditId::PawsAvailableSpectrumBatchReq,
                "PAWS batch available spectrum request",
            ),
            Self::Notify => (AuditId::PawsSpectrumUseNotify, "PAWS spectrum use notification"),
            Self::ValidateDevice => (AuditId::PawsValidReq, "PAWS device validation request"),
            Self::InterferenceQuery => (
                AuditId::PawsInterferenceQueryReq,
                "PAWS interference query request",
            ),
        }
    }
}

impl std::fmt::Display for PawsMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Tag identifying which operation an audit record pertains to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditId {
    #[serde(rename = "PAWSInvalidMethod")]
    PawsInvalidMethod,
    #[serde(rename = "PAWSInitReq")]
    PawsInitReq,
    #[serde(rename = "PAWSRegistrationReq")]
    PawsRegistrationReq,
    #[serde(rename = "PAWSAvailableSpectrumReq")]
    PawsAvailableSpectrumReq,
    #[serde(rename = "PAWSAvailableSpectrumBatchReq")]
    PawsAvailableSpectrumBatchReq,
    #[serde(rename = "PAWSSpectrumUseNotify")]
    PawsSpectrumUseNotify,
    #[serde(rename = "PAWSInterferenceQueryReq")]
    PawsInterferenceQueryReq,
    #[serde(rename = "PAWSValidReq")]
    PawsValidReq,
}

impl AuditId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PawsInvalidMethod => "PAWSInvalidMethod",
            Self::PawsInitReq => "PAWSInitReq",
            Self::PawsRegistrationReq => "PAWSRegistrationReq",
            Self::PawsAvailableSpectrumReq => "PAWSAvailableSpectrumReq",
            Self::PawsAvailableSpectrumBatchReq => "PAWSAvailableSpectrumBatchReq",
            Self::PawsSpectrumUseNotify => "PAWSSpectrumUseNotify",
            Self::PawsInterferenceQueryReq => "PAWSInterferenceQueryReq",
            Self::PawsValidReq => "PAWSValidReq",
        }
    }
}

impl std::fmt::Display for AuditId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
