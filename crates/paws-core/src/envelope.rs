//! # JSON-RPC Envelopes
//!
//! The request envelope is decoded loosely (`method` and `id` may be absent)
//! so the router can distinguish a null method from an unknown one. The
//! response envelope carries its outcome as a single enum, so a response
//! holds a result or an error and never both.

use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;
use crate::params::{DeviceDescriptor, Parameters};
use crate::ruleset::{DeviceValidity, RulesetInfo, SpectrumSpec};

/// Inbound request envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jsonrpc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Parameters>,
}

/// Successful result payload. Which fields are present depends on the method.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PawsResult {
    #[serde(rename = "type")]
    pub kind: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, rename = "deviceDesc", skip_serializing_if = "Option::is_none")]
    pub device_descriptor: Option<DeviceDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ruleset_infos: Option<Vec<RulesetInfo>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spectrum_specs: Option<Vec<SpectrumSpec>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo_spectrum_specs: Option<Vec<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_validities: Option<Vec<DeviceValidity>>,
}

impl PawsResult {
    pub fn new(kind: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            version: version.into(),
            ..Default::default()
        }
    }
}

/// JSON-RPC error object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Wire name of the method that produced this error, for correlation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

impl ErrorObject {
    /// An error with a code and a plain message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.as_str().to_string(),
            message: Some(message.into()),
            data: None,
            kind: None,
            version: None,
            method: None,
        }
    }

    /// A classified PAWS error: the first message picks the code, the code's
    /// label becomes `message`, and the first message goes into `data`.
    pub fn from_messages<S: AsRef<str>>(response_type: &str, messages: &[S]) -> Self {
        let first = messages.first().map(|m| m.as_ref().to_string());
        let code = first
            .as_deref()
            .map(ErrorCode::classify)
            .unwrap_or(ErrorCode::InvalidValue);
        Self {
            code: code.as_str().to_string(),
            message: code.label().map(str::to_string),
            data: first,
            kind: Some(response_type.to_string()),
            version: Some("2.0".to_string()),
            method: None,
        }
    }

    /// A fault caught at the router boundary.
    pub fn exception(response_type: Option<&str>, detail: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Exception.as_str().to_string(),
            message: None,
            data: Some(detail.into()),
            kind: response_type.map(str::to_string),
            version: None,
            method: None,
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Outcome {
    #[serde(rename = "result")]
    Result(PawsResult),
    #[serde(rename = "error")]
    Error(ErrorObject),
}

/// Outbound response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: serde_json::Value,
    #[serde(flatten)]
    outcome: Outcome,
}

impl ResponseEnvelope {
    pub fn success(jsonrpc: impl Into<String>, result: PawsResult) -> Self {
        Self {
            jsonrpc: jsonrpc.into(),
            id: serde_json::Value::Null,
            outcome: Outcome::Result(result),
        }
    }

    pub fn failure(jsonrpc: impl Into<String>, error: ErrorObject) -> Self {
        Self {
            jsonrpc: jsonrpc.into(),
            id: serde_json::Value::Null,
            outcome: Outcome::Error(error),
        }
    }

    /// Echo the request id onto this response.
    pub fn with_id(mut self, id: Option<serde_json::Value>) -> Self {
        self.id = id.unwrap_or(serde_json::Value::Null);
        self
    }

    pub fn result(&self) -> Option<&PawsResult> {
        match &self.outcome {
            Outcome::Result(r) => Some(r),
            Outcome::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorObject> {
        match &self.outcome {
            Outcome::Error(e) => Some(e),
            Outcome::Result(_) => None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error().is_some()
    }

    /// Mutable access to the error object, if this is an error response.
    pub fn error_mut(&mut self) -> Option<&mut ErrorObject> {
        match &mut self.outcome {
            Outcome::Error(e) => Some(e),
            Outcome::Result(_) => None,
        }
    }
}
