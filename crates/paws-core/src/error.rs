//! # Error Types — Wire Codes and Crate Errors
//!
//! Two families live here:
//!
//! - [`ErrorCode`]: the protocol-level codes carried as strings inside a
//!   JSON-RPC error object. These are data, not Rust errors; business and
//!   validation failures become an [`ErrorObject`](crate::ErrorObject) and
//!   travel back to the device as a normal response.
//! - [`CoreError`] / [`StoreError`]: `thiserror` enums for faults inside the
//!   process (parse failures, store unavailability).
//!
//! ## Classification
//!
//! [`ErrorCode::classify`] maps a human-readable failure message to its wire
//! code. Required-field messages are the dotted field path that was missing
//! (`"deviceDescriptor.fccId"`), which classify as `MISSING`. Unknown
//! messages fall through to `INVALID_VALUE`.

use thiserror::Error;

/// Protocol error codes, rendered on the wire as strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Request version not supported by the database.
    Version,
    /// Requested device mode is not implemented.
    Unimplemented,
    /// Location outside the database's coverage area.
    OutsideCoverage,
    /// A required parameter is missing.
    Missing,
    /// A parameter has an invalid value. Also the default for unclassified messages.
    InvalidValue,
    /// Device is not authorized.
    Unauthorized,
    /// Device is not registered.
    NotRegistered,
    /// Unparseable body or internal fault caught at the router boundary.
    Exception,
    /// JSON-RPC invalid request (null or absent method).
    InvalidRequest,
    /// JSON-RPC method missing or not found.
    MethodNotFound,
    /// Downstream validation service unavailable.
    ServiceDown,
    /// Interference query found no used spectrum.
    IncumbentNotFound,
}

impl ErrorCode {
    /// The wire string for this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Version => "-101",
            Self::Unimplemented => "-103",
            Self::OutsideCoverage => "-104",
            Self::Missing | Self::Exception => "-201",
            Self::InvalidValue => "-202",
            Self::Unauthorized => "-301",
            Self::NotRegistered => "-302",
            Self::InvalidRequest => "-32600",
            Self::MethodNotFound => "-32601",
            Self::ServiceDown => "-32000",
            Self::IncumbentNotFound => "200",
        }
    }

    /// The PAWS symbolic label placed in the `message` field, where one exists.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Self::Version => Some("VERSION"),
            Self::Unimplemented => Some("UNIMPLEMENTED"),
            Self::OutsideCoverage => Some("OUTSIDE_COVERAGE"),
            Self::Missing => Some("MISSING"),
            Self::InvalidValue => Some("INVALID_VALUE"),
            Self::Unauthorized => Some("UNAUTHORIZED"),
            Self::NotRegistered => Some("NOT_REGISTERED"),
            Self::Exception
            | Self::InvalidRequest
            | Self::MethodNotFound
            | Self::ServiceDown
            | Self::IncumbentNotFound => None,
        }
    }

    /// Classify a failure message into its wire code.
    pub fn classify(message: &str) -> Self {
        use messages::*;

        match message {
            NOT_REGISTERED => Self::NotRegistered,
            MODE_NOT_IMPLEMENTED => Self::Unimplemented,
            OUTSIDE_COVERAGE => Self::OutsideCoverage,
            DATABASE_UNSUPPORTED => Self::Version,
            UNAUTHORIZED | DEVICE_NOT_AUTHORIZED => Self::Unauthorized,
            m if REQUIRED_FIELDS.contains(&m) => Self::Missing,
            _ => Self::InvalidValue,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Human-readable failure messages shared across the workspace.
pub mod messages {
    pub const OUTSIDE_COVERAGE: &str =
        "The specified geo-location is outside the coverage area of the Database";
    pub const DATABASE_UNSUPPORTED: &str =
        "The Database does not support the specified version of the message.";
    pub const NOT_REGISTERED: &str = "Device not Registered";
    pub const MODE_NOT_IMPLEMENTED: &str = "Device Mode not Implemented";
    pub const SERVER_ERROR: &str = "Server Error";
    pub const UNAUTHORIZED: &str = "301";
    pub const DEVICE_NOT_AUTHORIZED: &str = "Device is not authorized";
    pub const INVALID_DEVICE_REASON: &str = "The Device is not authorized to use the Database";
    pub const SERVICE_DOWN: &str = "The web service is down";
    pub const INCUMBENT_NOT_FOUND: &str = "Used Spectrum not found for this location";
    pub const INVALID_FCC_ID: &str = "FCC Id cannot contain zero or one";

    pub const INVALID_REQUEST: &str = "invalid request";
    pub const METHOD_NAME_MISSING: &str = "method name missing";
    pub const METHOD_NOT_FOUND: &str = "method not found";
    pub const REQUEST_TIMED_OUT: &str = "request deadline exceeded";
    pub const INTERNAL_ERROR: &str = "internal error";

    // Required-field messages are the path of the missing field.
    pub const PARAMETERS_REQUIRED: &str = "Parameters Required";
    pub const DEVICE_DESCRIPTOR_REQUIRED: &str = "deviceDesc";
    pub const LOCATION_REQUIRED: &str = "location";
    pub const LOCATIONS_REQUIRED: &str = "Locations is Required";
    pub const POINT_REQUIRED: &str = "geoLocation.point";
    pub const OWNER_REQUIRED: &str = "deviceOwner.owner";
    pub const SPECTRA_REQUIRED: &str = "notifySpectrumUse.spectra";
    pub const DEVICE_DESCRIPTORS_REQUIRED: &str = "deviceDescs";
    pub const REQUESTOR_REQUIRED: &str = "requestor";
    pub const START_TIME_REQUIRED: &str = "starttime";
    pub const END_TIME_REQUIRED: &str = "endtime";
    pub const SERIAL_NUMBER_REQUIRED: &str = "deviceDescriptor.serialNumber";
    pub const FCC_ID_REQUIRED: &str = "deviceDescriptor.fccId";
    pub const ETSI_MANUFACTURER_ID_REQUIRED: &str = "deviceDescriptor.EtsiManufacturerId";
    pub const ETSI_MODEL_ID_REQUIRED: &str = "deviceDescriptor.EtsiModelId";

    pub(crate) const REQUIRED_FIELDS: &[&str] = &[
        PARAMETERS_REQUIRED,
        DEVICE_DESCRIPTOR_REQUIRED,
        LOCATION_REQUIRED,
        LOCATIONS_REQUIRED,
        POINT_REQUIRED,
        OWNER_REQUIRED,
        SPECTRA_REQUIRED,
        DEVICE_DESCRIPTORS_REQUIRED,
        REQUESTOR_REQUIRED,
        START_TIME_REQUIRED,
        END_TIME_REQUIRED,
        SERIAL_NUMBER_REQUIRED,
        FCC_ID_REQUIRED,
        ETSI_MANUFACTURER_ID_REQUIRED,
        ETSI_MODEL_ID_REQUIRED,
    ];
}

/// Error raised while parsing protocol or stored data.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A timestamp string could not be parsed.
    #[error("invalid timestamp {value:?}: {reason}")]
    InvalidTimestamp {
        /// The offending input.
        value: String,
        /// Parser detail.
        reason: String,
    },

    /// A region code was empty or malformed.
    #[error("invalid region code {0:?}")]
    InvalidRegionCode(String),

    /// An unknown regulatory authority name was configured.
    #[error("unknown regulatory authority {0:?}")]
    UnknownAuthority(String),

    /// JSON (de)serialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error returned by an [`EntityStore`](crate::EntityStore).
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    /// The backing store could not be reached.
    #[error("entity store unavailable: {0}")]
    Unavailable(String),

    /// A stored row could not be interpreted.
    #[error("corrupt record in {table}: {reason}")]
    CorruptRecord {
        /// Table or collection name.
        table: String,
        /// What was wrong with the row.
        reason: String,
    },
}
