//! FCC rules: devices are identified by their FCC Id.

use paws_core::{DeviceDescriptor, GeoLocation, Incumbent, IncumbentType, Parameters, RulesetInfo};

use crate::common::{
    apply_channel_list_fields, base_incumbent, descriptor_of, request_locations, ProviderContext,
};
use crate::error::ProviderError;
use crate::ValueProvider;

#[derive(Debug, Clone)]
pub struct FccValueProvider {
    ctx: ProviderContext,
}

impl FccValueProvider {
    pub fn new(ctx: ProviderContext) -> Self {
        Self { ctx }
    }

    fn project(&self, params: &Parameters, location: &GeoLocation) -> Option<Incumbent> {
        let mut incumbent = base_incumbent(location, params, &self.ctx.region)?;
        let descriptor = descriptor_of(params);
        incumbent.device_id = self.device_id(descriptor);
        incumbent.master_device_id = self.device_id(params.master_device_descriptor.as_ref());
        incumbent.incumbent_type = descriptor
            .and_then(|d| d.fcc_tvbd_device_type.as_deref())
            .and_then(IncumbentType::from_wire);
        Some(incumbent)
    }
}

impl ValueProvider for FccValueProvider {
    fn context(&self) -> &ProviderContext {
        &self.ctx
    }

    fn device_id(&self, descriptor: Option<&DeviceDescriptor>) -> Option<String> {
        descriptor?.fcc_id.clone()
    }

    fn ruleset_info(&self, _device: &DeviceDescriptor) -> Result<Vec<RulesetInfo>, ProviderError> {
        self.ctx.rulesets()
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
