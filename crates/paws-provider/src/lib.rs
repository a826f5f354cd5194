//! # paws-provider — Regional Value Providers
//!
//! A value provider projects a PAWS request into the region-specific
//! values the business layer needs: the device's identifier, the rule sets
//! it operates under, and the incumbent descriptors the availability
//! computation consumes.
//!
//! The set of regulatory regimes is closed. [`RegionalValueProvider`] is an
//! enum over the three variants and is chosen once, from the region's
//! configured [`RegulatoryAuthority`], when the service is assembled.
//!
//! | Authority | Device id |
//! |-----------|-----------|
//! | FCC | `fccId` |
//! | Ofcom | `serialNumber` + `manufacturerId` + `modelId` |
//! | Generic | `serialNumber` |

pub mod common;
pub mod error;
pub mod fcc;
pub mod generic;
pub mod ofcom;

use std::sync::Arc;

use paws_core::{
    DeviceDescriptor, EntityStore, Incumbent, Parameters, RegionCode, RegulatoryAuthority,
    RulesetInfo,
};

pub use common::ProviderContext;
pub use error::ProviderError;
pub use fcc::FccValueProvider;
pub use generic::GenericValueProvider;
pub use ofcom::OfcomValueProvider;

/// Region-specific projection of PAWS requests.
pub trait ValueProvider: Send + Sync {
    fn context(&self) -> &ProviderContext;

    /// The device identifier under this region's rules. `None` when the
    /// descriptor is absent or carries none of the identifying fields.
    fn device_id(&self, descriptor: Option<&DeviceDescriptor>) -> Option<String>;

    /// Rule sets that apply to `device` in this region.
    fn ruleset_info(&self, device: &DeviceDescriptor) -> Result<Vec<RulesetInfo>, ProviderError>;

    /// One incumbent per requested location. Locations without a shape are
    /// skipped.
    fn wsd_info(&self, params: &Parameters) -> Vec<Incumbent>;

    /// The single projection used for channel-list computation.
    fn incumbent_for_channel_list(&self, params: &Parameters) -> Result<Incumbent, ProviderError>;
}

/// The provider for one region.
#[derive(Debug, Clone)]
pub enum RegionalValueProvider {
    Fcc(FccValueProvider),
    Ofcom(OfcomValueProvider),
    Generic(GenericValueProvider),
}

impl RegionalValueProvider {
    pub fn for_authority(
        authority: RegulatoryAuthority,
        region: RegionCode,
        store: Arc<dyn EntityStore>,
    ) -> Self {
        let ctx = ProviderContext::new(region, store);
        match authority {
            RegulatoryAuthority::Fcc => Self::Fcc(FccValueProvider::new(ctx)),
            RegulatoryAuthority::Ofcom => Self::Ofcom(OfcomValueProvider::new(ctx)),
            RegulatoryAuthority::Generic => Self::Generic(GenericValueProvider::new(ctx)),
        }
    }

    pub fn authority(&self) -> RegulatoryAuthority {
        match self {
            Self::Fcc(_) => RegulatoryAuthority::Fcc,
            Self::Ofcom(_) => RegulatoryAuthority::Ofcom,
            Self::Generic(_) => RegulatoryAuthority::Generic,
        }
    }

    pub fn region(&self) -> &RegionCode {
        &self.context().region
    }

    /// Device id of the request's own device descriptor.
    pub fn request_device_id(&self, params: &Parameters) -> Option<String> {
        self.device_id(params.device_descriptor.as_ref())
    }

    fn inner(&self) -> &dyn ValueProvider {
        match self {
            Self::Fcc(p) => p as &dyn ValueProvider,
            Self::Ofcom(p) => p as &dyn ValueProvider,
            Self::Generic(p) => p as &dyn ValueProvider,
        }
    }
}

impl ValueProvider for RegionalValueProvider {
    fn context(&self) -> &ProviderContext {
        self.inner().context()
    }

    fn device_id(&self, descriptor: Option<&DeviceDescriptor>) -> Option<String> {
        self.inner().device_id(descriptor)
    }

    fn ruleset_info(&self, device: &DeviceDescriptor) -> Result<Vec<RulesetInfo>, ProviderError> {
        self.inner().ruleset_info(device)
    }

    fn wsd_info(&self, params: &Parameters) -> Vec<Incumbent> {
        self.inner().wsd_info(params)
    }

    fn incumbent_for_channel_list(&self, params: &Parameters) -> Result<Incumbent, ProviderError> {
        self.inner().incumbent_for_channel_list(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paws_core::{
        AntennaCharacteristics, GeoLocation, InMemoryEntityStore, IncumbentType, RulesetRecord,
        StoreError, Timestamp,
    };

    fn region(code: &str) -> RegionCode {
        RegionCode::new(code).unwrap()
    }

    fn store_with_ruleset(code: &str) -> Arc<InMemoryEntityStore> {
        let store = InMemoryEntityStore::new();
        store.insert_ruleset(RulesetRecord {
            partition_key: "RS".into(),
            row_key: "1".into(),
            region: region(code),
            authority: code.into(),
            ruleset_id: "Rules-1".into(),
            max_location_change: Some(50.0),
            max_polling_secs: Some(86_400),
            max_eirp_dbm: Some(36.0),
            max_total_bw_mhz: Some(8.0),
            max_nominal_channel_bw_mhz: Some(8.0),
            timestamp: Timestamp::now(),
        });
        Arc::new(store)
    }

    fn provider(authority: RegulatoryAuthority, code: &str) -> RegionalValueProvider {
        RegionalValueProvider::for_authority(authority, region(code), store_with_ruleset(code))
    }

    fn descriptor() -> DeviceDescriptor {
        DeviceDescriptor {
            serial_number: Some("SN1".into()),
            manufacturer_id: Some("ACME".into()),
            model_id: Some("M7".into()),
            fcc_id: Some("FCC-XYZ".into()),
            fcc_tvbd_device_type: Some("MODE_2".into()),
            etsi_en_device_type: Some("A".into()),
            ..Default::default()
        }
    }

    #[test]
    fn variant_follows_authority() {
        assert!(matches!(
            provider(RegulatoryAuthority::Fcc, "US"),
            RegionalValueProvider::Fcc(_)
        ));
        assert!(matches!(
            provider(RegulatoryAuthority::Ofcom, "GB"),
            RegionalValueProvider::Ofcom(_)
        ));
        assert_eq!(
            provider(RegulatoryAuthority::Generic, "ZA").authority(),
            RegulatoryAuthority::Generic
        );
    }

    #[test]
    fn device_ids_per_region() {
        let d = descriptor();
        assert_eq!(
            provider(RegulatoryAuthority::Fcc, "US").device_id(Some(&d)).as_deref(),
            Some("FCC-XYZ")
        );
        assert_eq!(
            provider(RegulatoryAuthority::Ofcom, "GB").device_id(Some(&d)).as_deref(),
            Some("SN1ACMEM7")
        );
        assert_eq!(
            provider(RegulatoryAuthority::Generic, "ZA").device_id(Some(&d)).as_deref(),
            Some("SN1")
        );
    }

    #[test]
    fn device_id_absent_descriptor_is_none() {
        for p in [
            provider(RegulatoryAuthority::Fcc, "US"),
            provider(RegulatoryAuthority::Ofcom, "GB"),
            provider(RegulatoryAuthority::Generic, "ZA"),
        ] {
            assert!(p.device_id(None).is_none());
            assert!(p.device_id(Some(&DeviceDescriptor::default())).is_none());
        }
    }

    #[test]
    fn fcc_ruleset_keeps_limits() {
        let infos = provider(RegulatoryAuthority::Fcc, "US")
            .ruleset_info(&descriptor())
            .unwrap();
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].ruleset_id, "Rules-1");
        assert_eq!(infos[0].max_eirp_dbm, Some(36.0));
    }

    #[test]
    fn ofcom_type_a_nulls_limits() {
        let p = provider(RegulatoryAuthority::Ofcom, "GB");
        let infos = p.ruleset_info(&descriptor()).unwrap();
        assert!(infos[0].max_eirp_dbm.is_none());
        assert!(infos[0].max_location_change.is_none());
        assert!(infos[0].max_polling_secs.is_none());
        assert_eq!(infos[0].max_total_bw_mhz, Some(8.0));

        let type_b = DeviceDescriptor {
            etsi_en_device_type: Some("B".into()),
            ..descriptor()
        };
        assert_eq!(p.ruleset_info(&type_b).unwrap()[0].max_eirp_dbm, Some(36.0));
    }

    #[test]
    fn ruleset_store_failure_propagates() {
        struct DownStore;
        impl EntityStore for DownStore {
            fn fetch_region_polygons(
                &self,
                _: &RegionCode,
            ) -> Result<Vec<paws_core::RegionPolygonRecord>, StoreError> {
                Err(StoreError::Unavailable("down".into()))
            }
            fn fetch_ruleset_info(&self, _: &RegionCode) -> Result<Vec<RulesetRecord>, StoreError> {
                Err(StoreError::Unavailable("down".into()))
            }
        }
        let p = RegionalValueProvider::for_authority(
            RegulatoryAuthority::Fcc,
            region("US"),
            Arc::new(DownStore),
        );
        assert!(matches!(
            p.ruleset_info(&descriptor()),
            Err(ProviderError::Store(_))
        ));
    }

    #[test]
    fn wsd_info_single_request() {
        let params = Parameters {
            device_descriptor: Some(descriptor()),
            location: Some(GeoLocation::point(38.9, -77.0)),
            ..Default::default()
        };
        let incumbents = provider(RegulatoryAuthority::Fcc, "US").wsd_info(&params);
        assert_eq!(incumbents.len(), 1);
        assert_eq!(incumbents[0].latitude, 38.9);
        assert_eq!(incumbents[0].incumbent_type, Some(IncumbentType::Mode2));
        assert_eq!(incumbents[0].device_id.as_deref(), Some("FCC-XYZ"));
        assert!(incumbents[0].height.is_none());
    }

    #[test]
    fn wsd_info_batch_includes_master_location() {
        let params = Parameters {
            device_descriptor: Some(descriptor()),
            locations: Some(vec![
                GeoLocation::point(51.0, -1.0),
                GeoLocation::point(52.0, -1.0),
            ]),
            master_device_location: Some(GeoLocation::point(53.0, -1.0)),
            antenna: Some(AntennaCharacteristics {
                height: Some(12.0),
                height_type: Some("AGL".into()),
                height_uncertainty: None,
            }),
            ..Default::default()
        };
        let incumbents = provider(RegulatoryAuthority::Ofcom, "GB").wsd_info(&params);
        assert_eq!(incumbents.len(), 3);
        assert_eq!(incumbents[2].latitude, 53.0);
        assert!(incumbents.iter().all(|i| i.height == Some(12.0)));
        assert_eq!(incumbents[0].incumbent_type, Some(IncumbentType::TypeA));
    }

    #[test]
    fn ofcom_channel_list_sets_testing_fields() {
        let params = Parameters {
            device_descriptor: Some(descriptor()),
            location: Some(GeoLocation::point(51.5, -0.1)),
            testing_stage: Some(2),
            pmse_assignment_table_name: Some("PMSE_X".into()),
            prefsens: Some(-114.0),
            ..Default::default()
        };
        let inc = provider(RegulatoryAuthority::Ofcom, "GB")
            .incumbent_for_channel_list(&params)
            .unwrap();
        assert_eq!(inc.testing_stage, Some(2));
        assert!(inc.is_testing_stage);
        assert_eq!(inc.pmse_assignment_table.as_deref(), Some("PMSE_X"));
        assert_eq!(inc.prefsens, Some(-114.0));
    }

    #[test]
    fn fcc_channel_list_sets_sensitivity_fields() {
        let params = Parameters {
            device_descriptor: Some(descriptor()),
            location: Some(GeoLocation::point(38.9, -77.0)),
            prefsens: Some(-114.0),
            max_master_eirp: Some(36.0),
            testing_stage: Some(1),
            ..Default::default()
        };
        let inc = provider(RegulatoryAuthority::Fcc, "US")
            .incumbent_for_channel_list(&params)
            .unwrap();
        assert_eq!(inc.prefsens, Some(-114.0));
        assert_eq!(inc.max_master_eirp, Some(36.0));
        assert_eq!(inc.testing_stage, Some(1));
        assert!(inc.is_testing_stage);
    }

    #[test]
    fn every_variant_copies_channel_list_fields() {
        let params = Parameters {
            device_descriptor: Some(descriptor()),
            location: Some(GeoLocation::point(40.0, -1.0)),
            prefsens: Some(-110.0),
            max_master_eirp: Some(30.0),
            testing_stage: Some(3),
            pmse_assignment_table_name: Some("PMSE_11".into()),
            ..Default::default()
        };
        for (authority, code) in [
            (RegulatoryAuthority::Fcc, "US"),
            (RegulatoryAuthority::Ofcom, "GB"),
            (RegulatoryAuthority::Generic, "ZA"),
        ] {
            let inc = provider(authority, code)
                .incumbent_for_channel_list(&params)
                .unwrap();
            assert_eq!(inc.prefsens, Some(-110.0), "{authority:?}");
            assert_eq!(inc.max_master_eirp, Some(30.0), "{authority:?}");
            assert_eq!(inc.testing_stage, Some(3), "{authority:?}");
            assert!(inc.is_testing_stage, "{authority:?}");
            assert_eq!(
                inc.pmse_assignment_table.as_deref(),
                Some("PMSE_11"),
                "{authority:?}"
            );
        }
    }

    #[test]
    fn channel_list_leaves_absent_fields_empty() {
        let params = Parameters {
            device_descriptor: Some(descriptor()),
            location: Some(GeoLocation::point(51.5, -0.1)),
            ..Default::default()
        };
        let inc = provider(RegulatoryAuthority::Ofcom, "GB")
            .incumbent_for_channel_list(&params)
            .unwrap();
        assert!(inc.prefsens.is_none());
        assert!(inc.max_master_eirp.is_none());
        assert!(inc.testing_stage.is_none());
        assert!(!inc.is_testing_stage);
    }

    #[test]
    fn channel_list_without_location_errors() {
        let result = provider(RegulatoryAuthority::Generic, "ZA")
            .incumbent_for_channel_list(&Parameters::default());
        assert!(matches!(result, Err(ProviderError::MissingLocation)));
    }
}
