//! Projection steps shared by every regional provider.

use std::sync::Arc;

use paws_core::{
    DeviceDescriptor, EntityStore, GeoLocation, Incumbent, Parameters, RegionCode, RulesetInfo,
    RulesetRecord,
};

use crate::error::ProviderError;

/// The region a provider serves and the store it reads rule sets from.
#[derive(Clone)]
pub struct ProviderContext {
    pub region: RegionCode,
    pub store: Arc<dyn EntityStore>,
}

impl ProviderContext {
    pub fn new(region: RegionCode, store: Arc<dyn EntityStore>) -> Self {
        Self { region, store }
    }

    /// Rule-set rows for the region, with store keys and timestamps dropped.
    pub fn rulesets(&self) -> Result<Vec<RulesetInfo>, ProviderError> {
        let records = self.store.fetch_ruleset_info(&self.region)?;
        if records.is_empty() {
            tracing::warn!(region = %self.region, "no rule sets configured for region");
        }
        Ok(records.iter().map(redact).collect())
    }
}

impl std::fmt::Debug for ProviderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderContext")
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}

pub(crate) fn redact(record: &RulesetRecord) -> RulesetInfo {
    RulesetInfo {
        authority: record.authority.clone(),
        ruleset_id: record.ruleset_id.clone(),
        max_location_change: record.max_location_change,
        max_polling_secs: record.max_polling_secs,
        max_eirp_dbm: record.max_eirp_dbm,
        max_total_bw_mhz: record.max_total_bw_mhz,
        max_nominal_channel_bw_mhz: record.max_nominal_channel_bw_mhz,
    }
}

/// Optional channel-list fields, copied from the request when present.
pub(crate) fn apply_channel_list_fields(incumbent: &mut Incumbent, params: &Parameters) {
    incumbent.prefsens = params.prefsens;
    incumbent.max_master_eirp = params.max_master_eirp;
    incumbent.testing_stage = params.testing_stage;
    incumbent.is_testing_stage = params.testing_stage.is_some();
    incumbent.pmse_assignment_table = params.pmse_assignment_table_name.clone();
}

/// Region-independent part of an incumbent: position, descriptors, owner,
/// capabilities and antenna. Antenna fields are copied only when the
/// request carries an antenna object.
pub(crate) fn base_incumbent(
    location: &GeoLocation,
    params: &Parameters,
    region: &RegionCode,
) -> Option<Incumbent> {
    let mut incumbent = Incumbent::at(location)?;
    if let Some(antenna) = &params.antenna {
        incumbent.height = antenna.height;
        incumbent.height_type = antenna.height_type.clone();
    }
    incumbent.device_descriptor = params.device_descriptor.clone();
    incumbent.master_device_descriptor = params.master_device_descriptor.clone();
    incumbent.device_owner = params.device_owner.clone();
    incumbent.capabilities = params.capabilities.clone();
    incumbent.request_type = params.request_type.clone();
    incumbent.unique_id = params.unique_id.clone();
    incumbent.country_id = Some(region.to_string());
    if let Some(range) = params
        .capabilities
        .as_ref()
        .and_then(|c| c.frequency_ranges.first())
    {
        incumbent.start_hz = Some(range.start_hz);
        incumbent.stop_hz = Some(range.stop_hz);
    }
    Some(incumbent)
}

/// Every location the request asks about: `locations` for a batch request,
/// otherwise `location`; then the master device location if present.
pub(crate) fn request_locations(params: &Parameters) -> Vec<&GeoLocation> {
    let mut locations: Vec<&GeoLocation> = match &params.locations {
        Some(batch) => batch.iter().collect(),
        None => params.location.iter().collect(),
    };
    if params.locations.is_some() {
        locations.extend(params.master_device_location.iter());
    }
    locations
}

pub(crate) fn non_empty(parts: &[Option<&str>]) -> Option<String> {
    let joined: String = parts.iter().flatten().copied().collect();
    (!joined.is_empty()).then_some(joined)
}

pub(crate) fn descriptor_of(params: &Parameters) -> Option<&DeviceDescriptor> {
    params.device_descriptor.as_ref()
}
