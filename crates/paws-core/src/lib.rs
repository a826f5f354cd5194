//! # paws-core — Foundational Types for the PAWS Router
//!
//! This crate defines the protocol vocabulary shared by every other crate in
//! the workspace: the JSON-RPC request/response envelopes, the fixed PAWS
//! method table, wire error codes, request parameters, geolocation shapes,
//! UTC timestamps, and the narrow entity-store boundary through which polygon
//! and rule-set rows are fetched. It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Closed method set.** [`PawsMethod`] has exactly seven variants, each
//!    carrying its byte-exact wire string, response type, and audit tag.
//!    Adding a method forces every `match` in the workspace to handle it.
//!
//! 2. **Result XOR error by construction.** [`ResponseEnvelope`] can only be
//!    built through `success` or `failure`; there is no way to produce an
//!    envelope with both or neither populated.
//!
//! 3. **Wire codes are strings.** [`ErrorCode`] renders the exact strings the
//!    PAWS/JSON-RPC convention uses (`"-201"`, `"-32601"`, ...). They are never
//!    renumbered.
//!
//! 4. **UTC-only timestamps.** [`Timestamp`] truncates to seconds and renders
//!    both ISO 8601 and the PAWS response format.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `paws-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod culture;
pub mod envelope;
pub mod error;
pub mod geo;
pub mod incumbent;
pub mod method;
pub mod params;
pub mod region;
pub mod ruleset;
pub mod store;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use culture::NumberCulture;
pub use envelope::{ErrorObject, PawsResult, RequestEnvelope, ResponseEnvelope};
pub use error::{messages, CoreError, ErrorCode, StoreError};
pub use geo::{Ellipse, GeoLocation, LatLon, LocationShape, Point, PolygonShape};
pub use incumbent::{Incumbent, IncumbentType};
pub use method::{AuditId, PawsMethod};
pub use params::{
    AntennaCharacteristics, DeviceCapabilities, DeviceDescriptor, DeviceOwner, FrequencyRange,
    Parameters, Spectrum,
};
pub use region::{RegionCode, RegulatoryAuthority};
pub use ruleset::{DeviceValidity, RulesetInfo, SpectrumSpec};
pub use store::{EntityStore, InMemoryEntityStore, RegionPolygonRecord, RulesetRecord, StoreSeed};
pub use temporal::Timestamp;
