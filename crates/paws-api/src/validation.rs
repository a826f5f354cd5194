//! # Request Field Validation
//!
//! Checks each method's required fields, then the device descriptor rules
//! of the region's authority. Failures are returned as message strings;
//! [`ErrorObject::from_messages`](paws_core::ErrorObject::from_messages)
//! turns the first one into a wire code.

use paws_core::{
    messages, DeviceDescriptor, GeoLocation, Parameters, PawsMethod, RegulatoryAuthority,
};

const INVALID_DEVICE_CATEGORY: &str = "deviceDescriptor.etsiEnDeviceCategory must be Master or Slave";
const EMPTY_SPECTRA: &str = "notifySpectrumUse.spectra cannot be empty";

#[derive(Debug, Clone, Copy)]
pub struct RequestValidator {
    authority: RegulatoryAuthority,
}

impl RequestValidator {
    pub fn new(authority: RegulatoryAuthority) -> Self {
        Self { authority }
    }

    /// All problems with `params` for `method`, in check order. Empty when
    /// the request is acceptable.
    pub fn validate(&self, method: PawsMethod, params: &Parameters) -> Vec<&'static str> {
        let mut errors = Vec::new();
        match method {
            PawsMethod::Init | PawsMethod::AvailableSpectrum => {
                self.require_device(params.device_descriptor.as_ref(), &mut errors);
                require_location(params.location.as_ref(), &mut errors);
            }
            PawsMethod::Register => {
                self.require_device(params.device_descriptor.as_ref(), &mut errors);
                require_location(params.location.as_ref(), &mut errors);
                if params.device_owner.as_ref().and_then(|o| o.owner.as_ref()).is_none() {
                    errors.push(messages::OWNER_REQUIRED);
                }
            }
            PawsMethod::AvailableSpectrumBatch => {
                self.require_device(params.device_descriptor.as_ref(), &mut errors);
                match params.locations.as_deref() {
                    None | Some([]) => errors.push(messages::LOCATIONS_REQUIRED),
                    Some(locations) => {
                        for location in locations {
                            require_location(Some(location), &mut errors);
                        }
                    }
                }
            }
            PawsMethod::Notify => {
                self.require_device(params.device_descriptor.as_ref(), &mut errors);
                require_location(params.location.as_ref(), &mut errors);
                match params.spectra.as_deref() {
                    None => errors.push(messages::SPECTRA_REQUIRED),
                    Some([]) => errors.push(EMPTY_SPECTRA),
                    Some(_) => {}
                }
            }
            PawsMethod::ValidateDevice => {
                let devices = params.devices_to_validate();
                if devices.is_empty() {
                    errors.push(messages::DEVICE_DESCRIPTORS_REQUIRED);
                }
                for device in &devices {
                    self.check_device(device, &mut errors);
                }
            }
            PawsMethod::InterferenceQuery => {
                if params.requestor.is_none() {
                    errors.push(messages::REQUESTOR_REQUIRED);
                }
                if params.start_time.is_none() {
                    errors.push(messages::START_TIME_REQUIRED);
                }
                if params.end_time.is_none() {
                    errors.push(messages::END_TIME_REQUIRED);
                }
            }
        }
        errors
    }

    fn require_device(&self, device: Option<&DeviceDescriptor>, errors: &mut Vec<&'static str>) {
        match device {
            Some(device) => self.check_device(device, errors),
            None => errors.push(messages::DEVICE_DESCRIPTOR_REQUIRED),
        }
    }

    fn check_device(&self, device: &DeviceDescriptor, errors: &mut Vec<&'static str>) {
        if is_blank(device.serial_number.as_deref()) {
            errors.push(messages::SERIAL_NUMBER_REQUIRED);
        }
        match self.authority {
            RegulatoryAuthority::Fcc => match device.fcc_id.as_deref() {
                None | Some("") => errors.push(messages::FCC_ID_REQUIRED),
                Some(id) if id.contains(['0', '1']) => errors.push(messages::INVALID_FCC_ID),
                Some(_) => {}
            },
            RegulatoryAuthority::Ofcom => {
                if is_blank(device.manufacturer_id.as_deref()) {
                    errors.push(messages::ETSI_MANUFACTURER_ID_REQUIRED);
                }
                if is_blank(device.model_id.as_deref()) {
                    errors.push(messages::ETSI_MODEL_ID_REQUIRED);
                }
                let category_ok = device
                    .etsi_en_device_category
                    .as_deref()
                    .is_some_and(|c| c.eq_ignore_ascii_case("master") || c.eq_ignore_ascii_case("slave"));
                if !category_ok {
                    errors.push(INVALID_DEVICE_CATEGORY);
                }
            }
            RegulatoryAuthority::Generic => {}
        }
    }
}

fn require_location(location: Option<&GeoLocation>, errors: &mut Vec<&'static str>) {
    match location {
        None => errors.push(messages::LOCATION_REQUIRED),
        Some(location) if location.shape().is_none() => errors.push(messages::POINT_REQUIRED),
        Some(_) => {}
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use paws_core::{DeviceOwner, ErrorCode, Spectrum};

    fn fcc_device() -> DeviceDescriptor {
        DeviceDescriptor {
            serial_number: Some("SN-9".into()),
            fcc_id: Some("TEST-FCC-ABC".into()),
            ..Default::default()
        }
    }

    fn ofcom_device() -> DeviceDescriptor {
        DeviceDescriptor {
            serial_number: Some("SN-9".into()),
            manufacturer_id: Some("ACME".into()),
            model_id: Some("M7".into()),
            etsi_en_device_category: Some("master".into()),
            ..Default::default()
        }
    }

    fn fcc() -> RequestValidator {
        RequestValidator::new(RegulatoryAuthority::Fcc)
    }

    #[test]
    fn init_requires_device_and_location() {
        let errors = fcc().validate(PawsMethod::Init, &Parameters::default());
        assert_eq!(
            errors,
            vec![messages::DEVICE_DESCRIPTOR_REQUIRED, messages::LOCATION_REQUIRED]
        );
        assert_eq!(ErrorCode::classify(errors[0]), ErrorCode::Missing);
    }

    #[test]
    fn valid_init_passes() {
        let params = Parameters {
            device_descriptor: Some(fcc_device()),
            location: Some(GeoLocation::point(38.0, -97.0)),
            ..Default::default()
        };
        assert!(fcc().validate(PawsMethod::Init, &params).is_empty());
    }

    #[test]
    fn shapeless_location_needs_point() {
        let params = Parameters {
            device_descriptor: Some(fcc_device()),
            location: Some(GeoLocation {
                point: None,
                region: None,
                confidence: None,
            }),
            ..Default::default()
        };
        assert_eq!(
            fcc().validate(PawsMethod::AvailableSpectrum, &params),
            vec![messages::POINT_REQUIRED]
        );
    }

    #[test]
    fn fcc_id_rules() {
        let mut device = fcc_device();
        device.fcc_id = Some("ABC-101".into());
        let params = Parameters {
            device_descriptor: Some(device),
            location: Some(GeoLocation::point(38.0, -97.0)),
            ..Default::default()
        };
        let errors = fcc().validate(PawsMethod::Init, &params);
        assert_eq!(errors, vec![messages::INVALID_FCC_ID]);
        assert_eq!(ErrorCode::classify(errors[0]), ErrorCode::InvalidValue);

        let params = Parameters {
            device_descriptor: Some(DeviceDescriptor {
                fcc_id: None,
                ..fcc_device()
            }),
            location: Some(GeoLocation::point(38.0, -97.0)),
            ..Default::default()
        };
        assert_eq!(
            fcc().validate(PawsMethod::Init, &params),
            vec![messages::FCC_ID_REQUIRED]
        );
    }

    #[test]
    fn ofcom_device_rules() {
        let v = RequestValidator::new(RegulatoryAuthority::Ofcom);
        let ok = Parameters {
            device_descriptor: Some(ofcom_device()),
            location: Some(GeoLocation::point(51.5, -0.1)),
            ..Default::default()
        };
        assert!(v.validate(PawsMethod::Init, &ok).is_empty());

        let bad = Parameters {
            device_descriptor: Some(DeviceDescriptor {
                manufacturer_id: None,
                etsi_en_device_category: Some("relay".into()),
                ..ofcom_device()
            }),
            ..ok
        };
        assert_eq!(
            v.validate(PawsMethod::Init, &bad),
            vec![messages::ETSI_MANUFACTURER_ID_REQUIRED, INVALID_DEVICE_CATEGORY]
        );
    }

    #[test]
    fn register_requires_owner() {
        let params = Parameters {
            device_descriptor: Some(fcc_device()),
            location: Some(GeoLocation::point(38.0, -97.0)),
            device_owner: Some(DeviceOwner::default()),
            ..Default::default()
        };
        assert_eq!(
            fcc().validate(PawsMethod::Register, &params),
            vec![messages::OWNER_REQUIRED]
        );
    }

    #[test]
    fn batch_requires_locations() {
        let params = Parameters {
            device_descriptor: Some(fcc_device()),
            locations: Some(vec![]),
            ..Default::default()
        };
        assert_eq!(
            fcc().validate(PawsMethod::AvailableSpectrumBatch, &params),
            vec![messages::LOCATIONS_REQUIRED]
        );
    }

    #[test]
    fn notify_requires_spectra() {
        let mut params = Parameters {
            device_descriptor: Some(fcc_device()),
            location: Some(GeoLocation::point(38.0, -97.0)),
            ..Default::default()
        };
        assert_eq!(
            fcc().validate(PawsMethod::Notify, &params),
            vec![messages::SPECTRA_REQUIRED]
        );
        params.spectra = Some(vec![Spectrum {
            resolution_bw_hz: Some(6e6),
            profiles: vec![],
        }]);
        assert!(fcc().validate(PawsMethod::Notify, &params).is_empty());
    }

    #[test]
    fn validate_device_needs_some_device() {
        assert_eq!(
            fcc().validate(PawsMethod::ValidateDevice, &Parameters::default()),
            vec![messages::DEVICE_DESCRIPTORS_REQUIRED]
        );
        let params = Parameters {
            master_device_descriptor: Some(fcc_device()),
            ..Default::default()
        };
        assert!(fcc().validate(PawsMethod::ValidateDevice, &params).is_empty());
    }

    #[test]
    fn interference_query_fields() {
        let errors = fcc().validate(PawsMethod::InterferenceQuery, &Parameters::default());
        assert_eq!(
            errors,
            vec![
                messages::REQUESTOR_REQUIRED,
                messages::START_TIME_REQUIRED,
                messages::END_TIME_REQUIRED
            ]
        );
    }
}
