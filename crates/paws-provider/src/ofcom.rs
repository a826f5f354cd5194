//! Ofcom rules: devices are identified by serial number, manufacturer and
//! model together. Type A devices are not given EIRP, location-change or
//! polling limits in their rule sets.

use paws_core::{DeviceDescriptor, GeoLocation, Incumbent, IncumbentType, Parameters, RulesetInfo};

use crate::common::{
    apply_channel_list_fields, base_incumbent, descriptor_of, non_empty, request_locations,
    ProviderContext,
};
use crate::error::ProviderError;
use crate::ValueProvider;

const DEVICE_TYPE_A: &str = "A";

#[derive(Debug, Clone)]
pub struct OfcomValueProvider {
    ctx: ProviderContext,
}

impl OfcomValueProvider {
    pub fn new(ctx: ProviderContext) -> Self {
        Self { ctx }
    }

    fn project(&self, params: &Parameters, location: &GeoLocation) -> Option<Incumbent> {
        let mut incumbent = base_incumbent(location, params, &self.ctx.region)?;
        let descriptor = descriptor_of(params);
        incumbent.device_id = self.device_id(descriptor);
        incumbent.master_device_id = self.device_id(params.master_device_descriptor.as_ref());
        incumbent.incumbent_type = descriptor
            .and_then(|d| d.etsi_en_device_type.as_deref())
            .and_then(IncumbentType::from_wire);
        incumbent.device_category = descriptor.and_then(|d| d.etsi_en_device_category.clone());
        incumbent.emission_class =
            descriptor.and_then(|d| d.etsi_en_device_emissions_class.clone());
        Some(incumbent)
    }
}

impl ValueProvider for OfcomValueProvider {
    fn context(&self) -> &ProviderContext {
        &self.ctx
    }

    fn device_id(&self, descriptor: Option<&DeviceDescriptor>) -> Option<String> {
        let d = descriptor?;
        non_empty(&[
            d.serial_number.as_deref(),
            d.manufacturer_id.as_deref(),
            d.model_id.as_deref(),
        ])
    }

    fn ruleset_info(&self, device: &DeviceDescriptor) -> Result<Vec<RulesetInfo>, ProviderError> {
        let mut rulesets = self.ctx.rulesets()?;
        let type_a = device
            .etsi_en_device_type
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case(DEVICE_TYPE_A));
        if type_a {
            for info in &mut rulesets {
                info.max_eirp_dbm = None;
                info.max_location_change = None;
                info.max_polling_secs = None;
            }
        }
        Ok(rulesets)
    }

    fn wsd_info(&self, params: &Parameters) -> Vec<Incumbent> {
        request_locations(params)
            .into_iter()
            .filter_map(|loc| self.project(params, loc))
            .collect()
    }

    fn incumbent_for_channel_list(&self, params: &Parameters) -> Result<Incumbent, ProviderError> {
        let location = params.location.as_ref().ok_or(ProviderError::MissingLocation)?;
        let mut incumbent = self
            .project(params, location)
            .ok_or(ProviderError::MissingLocation)?;
        apply_channel_list_fields(&mut incumbent, params);
        Ok(incumbent)
    }
}
