//! # Business Manager
//!
//! One operation per PAWS method. Each validates the request, checks the
//! protocol version, calls the spectrum driver, and assembles the typed
//! response. Rejections are returned as error envelopes; only backend
//! failures surface as [`ManagerError`], which the router converts into a
//! `-201` exception response.
//!
//! Check order follows the protocol's historic behavior: `init` and
//! `verifyDevice` validate fields before the version, every other method
//! checks the version first.

use std::sync::Arc;

use paws_core::{
    messages, DeviceValidity, ErrorCode, ErrorObject, Parameters, PawsMethod, PawsResult,
    ResponseEnvelope, SpectrumSpec, Timestamp,
};
use paws_provider::{ProviderError, RegionalValueProvider, ValueProvider};

use crate::driver::{
    DriverError, SpectrumDriver, STATUS_INCUMBENT_NOT_FOUND, STATUS_INVALID_VALUE,
    STATUS_NOT_REGISTERED, STATUS_OK, STATUS_SERVICE_DOWN, STATUS_VALID,
};
use crate::validation::RequestValidator;

#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// The seven PAWS business operations.
pub trait BusinessManager: Send + Sync {
    fn initialize(&self, params: &Parameters) -> Result<ResponseEnvelope, ManagerError>;
    fn register(&self, params: &Parameters) -> Result<ResponseEnvelope, ManagerError>;
    fn available_spectrum(&self, params: &Parameters) -> Result<ResponseEnvelope, ManagerError>;
    fn available_spectrum_batch(&self, params: &Parameters)
        -> Result<ResponseEnvelope, ManagerError>;
    fn notify_spectrum_usage(&self, params: &Parameters) -> Result<ResponseEnvelope, ManagerError>;
    fn validate_device(&self, params: &Parameters) -> Result<ResponseEnvelope, ManagerError>;
    fn interference_query(&self, params: &Parameters) -> Result<ResponseEnvelope, ManagerError>;

    /// Route `params` to the operation for `method`.
    fn dispatch(
        &self,
        method: PawsMethod,
        params: &Parameters,
    ) -> Result<ResponseEnvelope, ManagerError> {
        match method {
            PawsMethod::Init => self.initialize(params),
            PawsMethod::Register => self.register(params),
            PawsMethod::AvailableSpectrum => self.available_spectrum(params),
            PawsMethod::AvailableSpectrumBatch => self.available_spectrum_batch(params),
            PawsMethod::Notify => self.notify_spectrum_usage(params),
            PawsMethod::ValidateDevice => self.validate_device(params),
            PawsMethod::InterferenceQuery => self.interference_query(params),
        }
    }
}

pub struct PawsManager {
    provider: Arc<RegionalValueProvider>,
    driver: Arc<dyn SpectrumDriver>,
    validator: RequestValidator,
    paws_version: String,
    jsonrpc: String,
}

impl PawsManager {
    pub fn new(
        provider: Arc<RegionalValueProvider>,
        driver: Arc<dyn SpectrumDriver>,
        paws_version: impl Into<String>,
        jsonrpc: impl Into<String>,
    ) -> Self {
        let validator = RequestValidator::new(provider.authority());
        Self {
            provider,
            driver,
            validator,
            paws_version: paws_version.into(),
            jsonrpc: jsonrpc.into(),
        }
    }

    fn success(&self, result: PawsResult) -> ResponseEnvelope {
        ResponseEnvelope::success(self.jsonrpc.clone(), result)
    }

    fn reject(&self, method: PawsMethod, messages: &[&str]) -> ResponseEnvelope {
        ResponseEnvelope::failure(
            self.jsonrpc.clone(),
            ErrorObject::from_messages(method.response_type(), messages),
        )
    }

    fn result(&self, method: PawsMethod) -> PawsResult {
        PawsResult::new(method.response_type(), self.paws_version.clone())
    }

    fn version_ok(&self, params: &Parameters) -> bool {
        params.version.as_deref() == Some(self.paws_version.as_str())
    }

    /// Run the field and version checks in `method`'s order.
    fn precheck(&self, method: PawsMethod, params: &Parameters) -> Option<ResponseEnvelope> {
        let validate_first = matches!(method, PawsMethod::Init | PawsMethod::ValidateDevice);
        if !validate_first && !self.version_ok(params) {
            return Some(self.reject(method, &[messages::DATABASE_UNSUPPORTED]));
        }
        let errors = self.validator.validate(method, params);
        if !errors.is_empty() {
            tracing::debug!(method = method.wire_name(), ?errors, "request rejected");
            return Some(self.reject(method, &errors));
        }
        if validate_first && !self.version_ok(params) {
            return Some(self.reject(method, &[messages::DATABASE_UNSUPPORTED]));
        }
        None
    }

    fn rulesets_for(&self, params: &Parameters) -> Result<Vec<paws_core::RulesetInfo>, ManagerError> {
        match &params.device_descriptor {
            Some(device) => Ok(self.provider.ruleset_info(device)?),
            None => Ok(Vec::new()),
        }
    }
}

impl std::fmt::Debug for PawsManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PawsManager")
            .field("authority", &self.provider.authority())
            .field("region", self.provider.region())
            .field("paws_version", &self.paws_version)
            .finish_non_exhaustive()
    }
}

impl BusinessManager for PawsManager {
    fn initialize(&self, params: &Parameters) -> Result<ResponseEnvelope, ManagerError> {
        let method = PawsMethod::Init;
        if let Some(rejection) = self.precheck(method, params) {
            return Ok(rejection);
        }
        let device_id = self.provider.request_device_id(params);
        match self.driver.initialize(device_id.as_deref(), params)? {
            STATUS_OK => {
                let mut result = self.result(method);
                result.ruleset_infos = Some(self.rulesets_for(params)?);
                Ok(self.success(result))
            }
            STATUS_NOT_REGISTERED => Ok(self.reject(method, &[messages::NOT_REGISTERED])),
            _ => Ok(self.reject(method, &[messages::SERVER_ERROR])),
        }
    }

    fn register(&self, params: &Parameters) -> Result<ResponseEnvelope, ManagerError> {
        let method = PawsMethod::Register;
        if let Some(rejection) = self.precheck(method, params) {
            return Ok(rejection);
        }
        let device_id = self.provider.request_device_id(params);
        if self.driver.register(device_id.as_deref(), params)? != STATUS_OK {
            return Ok(self.reject(method, &[messages::SERVER_ERROR]));
        }
        let mut result = self.result(method);
        result.ruleset_infos = Some(self.rulesets_for(params)?);
        Ok(self.success(result))
    }

    fn available_spectrum(&self, params: &Parameters) -> Result<ResponseEnvelope, ManagerError> {
        let method = PawsMethod::AvailableSpectrum;
        if let Some(rejection) = self.precheck(method, params) {
            return Ok(rejection);
        }
        let incumbent = self.provider.incumbent_for_channel_list(params)?;
        let schedules = self.driver.spectrum_schedules(&incumbent)?;
        let specs = self
            .rulesets_for(params)?
            .into_iter()
            .map(|info| SpectrumSpec::for_ruleset(info, schedules.clone()))
            .collect();

        let mut result = self.result(method);
        result.timestamp = Some(Timestamp::now().to_paws());
        result.device_descriptor = params.device_descriptor.clone();
        result.spectrum_specs = Some(specs);
        Ok(self.success(result))
    }

    fn available_spectrum_batch(
        &self,
        params: &Parameters,
    ) -> Result<ResponseEnvelope, ManagerError> {
        let method = PawsMethod::AvailableSpectrumBatch;
        if let Some(rejection) = self.precheck(method, params) {
            return Ok(rejection);
        }
        let incumbents = self.provider.wsd_info(params);
        let geo_specs = self.driver.batch_spectrum(&incumbents)?;

        let mut result = self.result(method);
        result.timestamp = Some(Timestamp::now().to_paws());
        result.device_descriptor = params.device_descriptor.clone();
        result.geo_spectrum_specs = Some(geo_specs);
        Ok(self.success(result))
    }

    fn notify_spectrum_usage(&self, params: &Parameters) -> Result<ResponseEnvelope, ManagerError> {
        let method = PawsMethod::Notify;
        if let Some(rejection) = self.precheck(method, params) {
            return Ok(rejection);
        }
        let device_id = self.provider.request_device_id(params);
        let reply = self.driver.notify(device_id.as_deref(), params)?;
        match reply.code {
            STATUS_OK => Ok(self.success(self.result(method))),
            STATUS_INVALID_VALUE => {
                let mut response = self.reject(method, &[messages::SERVER_ERROR]);
                if let (Some(error), Some(detail)) = (response.error_mut(), reply.message) {
                    error.data = Some(detail);
                }
                Ok(response)
            }
            _ => Ok(self.reject(method, &[messages::SERVER_ERROR])),
        }
    }

    fn validate_device(&self, params: &Parameters) -> Result<ResponseEnvelope, ManagerError> {
        let method = PawsMethod::ValidateDevice;
        if let Some(rejection) = self.precheck(method, params) {
            return Ok(rejection);
        }
        let mut validities = Vec::new();
        for device in params.devices_to_validate() {
            let device_id = self.provider.device_id(Some(&device));
            match self.driver.validate_device(device_id.as_deref(), &device)? {
                STATUS_SERVICE_DOWN => {
                    tracing::warn!("device validation service is down");
                    return Ok(ResponseEnvelope::failure(
                        self.jsonrpc.clone(),
                        ErrorObject::new(ErrorCode::ServiceDown, messages::SERVICE_DOWN),
                    ));
                }
                STATUS_VALID => validities.push(DeviceValidity {
                    device_descriptor: device,
                    is_valid: true,
                    reason: None,
                }),
                _ => validities.push(DeviceValidity {
                    device_descriptor: device,
                    is_valid: false,
                    reason: Some(messages::INVALID_DEVICE_REASON.to_string()),
                }),
            }
        }
        let mut result = self.result(method);
        result.device_validities = Some(validities);
        Ok(self.success(result))
    }

    fn interference_query(&self, params: &Parameters) -> Result<ResponseEnvelope, ManagerError> {
        let method = PawsMethod::InterferenceQuery;
        if let Some(rejection) = self.precheck(method, params) {
            return Ok(rejection);
        }
        match self.driver.interference_query(params)? {
            STATUS_OK => Ok(self.success(self.result(method))),
            STATUS_INCUMBENT_NOT_FOUND => Ok(ResponseEnvelope::failure(
                self.jsonrpc.clone(),
                ErrorObject::new(ErrorCode::IncumbentNotFound, messages::INCUMBENT_NOT_FOUND),
            )),
            _ => Ok(self.reject(method, &[messages::SERVER_ERROR])),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StaticDriverConfig;
    use crate::driver::StaticSpectrumDriver;
    use paws_core::{
        DeviceDescriptor, DeviceOwner, GeoLocation, InMemoryEntityStore, RegionCode,
        RegulatoryAuthority, RulesetRecord, Spectrum,
    };
    use serde_json::json;

    fn store() -> InMemoryEntityStore {
        let store = InMemoryEntityStore::new();
        store.insert_ruleset(RulesetRecord {
            partition_key: "US".into(),
            row_key: "1".into(),
            region: RegionCode::us(),
            authority: "US".into(),
            ruleset_id: "FccTvBandWhiteSpace-2010".into(),
            max_location_change: Some(100.0),
            max_polling_secs: Some(86_400),
            max_eirp_dbm: Some(36.0),
            max_total_bw_mhz: Some(24.0),
            max_nominal_channel_bw_mhz: Some(6.0),
            timestamp: Timestamp::now(),
        });
        store
    }

    fn manager_with(driver: StaticDriverConfig) -> PawsManager {
        let provider = RegionalValueProvider::for_authority(
            RegulatoryAuthority::Fcc,
            RegionCode::us(),
            Arc::new(store()),
        );
        PawsManager::new(
            Arc::new(provider),
            Arc::new(StaticSpectrumDriver::new(driver)),
            "1.0",
            "2.0",
        )
    }

    fn manager() -> PawsManager {
        manager_with(StaticDriverConfig::default())
    }

    fn device() -> DeviceDescriptor {
        DeviceDescriptor {
            serial_number: Some("SN-1".into()),
            fcc_id: Some("TEST-FCC-ABC".into()),
            ..Default::default()
        }
    }

    fn params() -> Parameters {
        Parameters {
            version: Some("1.0".into()),
            device_descriptor: Some(device()),
            location: Some(GeoLocation::point(38.0, -97.0)),
            device_owner: Some(DeviceOwner {
                owner: Some(json!(["vcard", []])),
                operator: None,
            }),
            ..Default::default()
        }
    }

    fn code(resp: &ResponseEnvelope) -> &str {
        &resp.error().unwrap().code
    }

    #[test]
    fn init_before_register_is_not_registered() {
        let resp = manager().initialize(&params()).unwrap();
        assert_eq!(code(&resp), "-302");
        assert_eq!(resp.error().unwrap().kind.as_deref(), Some("INIT_RESP"));
    }

    #[test]
    fn register_then_init_returns_rulesets() {
        let m = manager();
        let reg = m.register(&params()).unwrap();
        let result = reg.result().unwrap();
        assert_eq!(result.kind, "REGISTRATION_RESP");
        assert_eq!(result.ruleset_infos.as_ref().unwrap().len(), 1);

        let init = m.initialize(&params()).unwrap();
        let result = init.result().unwrap();
        assert_eq!(result.kind, "INIT_RESP");
        assert_eq!(result.version, "1.0");
        assert_eq!(
            result.ruleset_infos.as_ref().unwrap()[0].ruleset_id,
            "FccTvBandWhiteSpace-2010"
        );
    }

    #[test]
    fn version_mismatch_is_version_error() {
        let mut p = params();
        p.version = Some("0.9".into());
        let resp = manager().available_spectrum(&p).unwrap();
        assert_eq!(code(&resp), "-101");
    }

    #[test]
    fn init_validates_before_version() {
        let p = Parameters {
            version: Some("0.9".into()),
            ..Default::default()
        };
        assert_eq!(code(&manager().initialize(&p).unwrap()), "-201");
        assert_eq!(code(&manager().register(&p).unwrap()), "-101");
    }

    #[test]
    fn available_spectrum_builds_one_spec_per_ruleset() {
        let resp = manager().available_spectrum(&params()).unwrap();
        let result = resp.result().unwrap();
        assert_eq!(result.kind, "AVAIL_SPECTRUM_RESP");
        assert!(result.timestamp.as_deref().unwrap().ends_with('Z'));
        assert_eq!(result.device_descriptor, Some(device()));
        let specs = result.spectrum_specs.as_ref().unwrap();
        assert_eq!(specs.len(), 1);
        assert!(specs[0].needs_spectrum_report);
        assert_eq!(specs[0].max_total_bw_hz, Some(24.0));
        assert_eq!(specs[0].max_contiguous_bw_hz, Some(6.0));
        assert_eq!(specs[0].spectrum_schedules.len(), 1);
    }

    #[test]
    fn batch_returns_geo_specs() {
        let mut p = params();
        p.location = None;
        p.locations = Some(vec![
            GeoLocation::point(38.0, -97.0),
            GeoLocation::point(39.0, -98.0),
        ]);
        let resp = manager().available_spectrum_batch(&p).unwrap();
        let result = resp.result().unwrap();
        assert_eq!(result.kind, "AVAIL_SPECTRUM_BATCH_RESP");
        assert_eq!(result.geo_spectrum_specs.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn notify_driver_rejection_carries_detail() {
        let mut p = params();
        p.spectra = Some(vec![Spectrum {
            resolution_bw_hz: Some(6e6),
            profiles: vec![],
        }]);
        let resp = manager().notify_spectrum_usage(&p).unwrap();
        let err = resp.error().unwrap();
        assert_eq!(err.code, "-202");
        assert_eq!(err.data.as_deref(), Some("no spectrum profiles reported"));
    }

    #[test]
    fn notify_success() {
        let mut p = params();
        p.spectra = Some(vec![Spectrum {
            resolution_bw_hz: Some(6e6),
            profiles: vec![vec![json!({"hz": 470e6, "dbm": 30.0})]],
        }]);
        let resp = manager().notify_spectrum_usage(&p).unwrap();
        assert_eq!(resp.result().unwrap().kind, "SPECTRUM_USE_RESP");
    }

    #[test]
    fn validate_device_reports_each_device() {
        let m = manager_with(StaticDriverConfig {
            authorized_devices: vec!["TEST-FCC-ABC".into()],
            ..Default::default()
        });
        let p = Parameters {
            version: Some("1.0".into()),
            device_descriptors: Some(vec![
                device(),
                DeviceDescriptor {
                    fcc_id: Some("OTHER-FCC".into()),
                    ..device()
                },
            ]),
            ..Default::default()
        };
        let resp = m.validate_device(&p).unwrap();
        let validities = resp.result().unwrap().device_validities.clone().unwrap();
        assert!(validities[0].is_valid);
        assert!(!validities[1].is_valid);
        assert_eq!(
            validities[1].reason.as_deref(),
            Some(messages::INVALID_DEVICE_REASON)
        );
    }

    #[test]
    fn validate_device_service_down() {
        let m = manager_with(StaticDriverConfig {
            validation_service_down: true,
            ..Default::default()
        });
        let p = Parameters {
            version: Some("1.0".into()),
            master_device_descriptor: Some(device()),
            ..Default::default()
        };
        let resp = m.validate_device(&p).unwrap();
        let err = resp.error().unwrap();
        assert_eq!(err.code, "-32000");
        assert_eq!(err.message.as_deref(), Some(messages::SERVICE_DOWN));
    }

    #[test]
    fn interference_query_outcomes() {
        let m = manager();
        let p = Parameters {
            version: Some("1.0".into()),
            requestor: Some(DeviceOwner::default()),
            start_time: Some("2026-01-01T00:00:00Z".into()),
            end_time: Some("2026-01-02T00:00:00Z".into()),
            ..Default::default()
        };
        let resp = m.interference_query(&p).unwrap();
        let err = resp.error().unwrap();
        assert_eq!(err.code, "200");
        assert!(err.kind.is_none());

        m.register(&params()).unwrap();
        let resp = m.interference_query(&p).unwrap();
        assert_eq!(resp.result().unwrap().kind, "INTERFERENCE_QUERY_RESP");
    }

    #[test]
    fn dispatch_routes_by_method() {
        let resp = manager()
            .dispatch(PawsMethod::Register, &params())
            .unwrap();
        assert_eq!(resp.result().unwrap().kind, "REGISTRATION_RESP");
    }
}
