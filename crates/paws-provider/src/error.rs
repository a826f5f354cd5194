use paws_core::StoreError;
use thiserror::Error;

/// Errors raised while projecting a request through a value provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Rule-set rows could not be read.
    #[error("rule set lookup failed: {0}")]
    Store(#[from] StoreError),

    /// The request carries no usable location.
    #[error("request has no location to project")]
    MissingLocation,
}
