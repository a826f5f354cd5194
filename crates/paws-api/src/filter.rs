//! Location gate applied before dispatch: requests whose location lies
//! outside every subregion of the active region are answered with `-104`
//! and never reach the business manager.

use std::sync::Arc;

use paws_core::{
    messages, ErrorObject, GeoLocation, Parameters, PawsMethod, RegionCode, ResponseEnvelope,
};
use paws_geo::{GeoValidator, RegionPolygonCache};

#[derive(Clone)]
pub struct LocationFilter {
    cache: Arc<RegionPolygonCache>,
    region: RegionCode,
}

impl LocationFilter {
    pub fn new(cache: Arc<RegionPolygonCache>, region: RegionCode) -> Self {
        Self { cache, region }
    }

    pub fn is_active(&self) -> bool {
        self.cache.is_enabled(&self.region)
    }

    /// `Some(rejection)` if the request's location is outside the region.
    ///
    /// Batch requests pass when any location is inside. Requests without a
    /// shaped location pass through; field validation reports them.
    pub fn check(
        &self,
        method: PawsMethod,
        params: Option<&Parameters>,
        jsonrpc: &str,
    ) -> Option<ResponseEnvelope> {
        if !self.is_active() {
            return None;
        }
        let locations = request_locations(method, params?);
        if locations.is_empty() {
            return None;
        }

        let subregions = self.cache.get_polygons(&self.region);
        if GeoValidator::validate_batch_locations(&locations, &subregions) {
            return None;
        }

        tracing::error!(
            method = method.wire_name(),
            region = %self.region,
            locations = locations.len(),
            "request location outside regulatory domain"
        );
        Some(ResponseEnvelope::failure(
            jsonrpc,
            ErrorObject::from_messages(method.response_type(), &[messages::OUTSIDE_COVERAGE])
                .with_method(method.wire_name()),
        ))
    }
}

impl std::fmt::Debug for LocationFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationFilter")
            .field("region", &self.region)
            .field("active", &self.is_active())
            .finish()
    }
}

fn request_locations(method: PawsMethod, params: &Parameters) -> Vec<GeoLocation> {
    let candidates: Vec<&GeoLocation> = match method {
        PawsMethod::AvailableSpectrumBatch => params.locations.iter().flatten().collect(),
        _ => params.location.iter().collect(),
    };
    candidates
        .into_iter()
        .filter(|loc| loc.shape().is_some())
        .cloned()
        .collect()
}
