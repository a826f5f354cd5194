//! # Request Router
//!
//! Entry point for every PAWS call. A request moves through
//! decode, method resolution, location filter, dispatch and audit, and
//! always comes out as a [`ResponseEnvelope`] with the request id echoed.
//!
//! ## Key Design Principles
//!
//! 1. **Faults stop here.** Manager errors, panics in the blocking
//!    dispatch, and deadline overruns are converted into `-201` responses.
//!    Nothing propagates to the HTTP layer as an error.
//!
//! 2. **One audit record per call.** Every path, including malformed bodies
//!    and unknown methods, finishes exactly one [`AuditedOperation`].
//!
//! 3. **Blocking work off the async workers.** Store reads and dispatch run
//!    under `spawn_blocking`; the deadline is enforced on the async side.
//!    Work that outlives its deadline finishes in the background and its
//!    result is discarded.

use std::sync::Arc;
use std::time::Duration;

use paws_audit::{AuditedOperation, Auditor};
use paws_core::{
    messages, ErrorCode, ErrorObject, PawsMethod, RequestEnvelope, ResponseEnvelope,
};

use crate::error::{decode, RouterError};
use crate::filter::LocationFilter;
use crate::manager::BusinessManager;
use crate::middleware::tracing_layer::RPC_METHOD_FIELD;

/// Router settings taken from the service configuration.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    pub jsonrpc_version: String,
    pub request_timeout: Duration,
    pub expose_fault_details: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            jsonrpc_version: "2.0".to_string(),
            request_timeout: Duration::from_secs(30),
            expose_fault_details: true,
        }
    }
}

pub struct RequestRouter {
    manager: Arc<dyn BusinessManager>,
    filter: Option<LocationFilter>,
    auditor: Arc<dyn Auditor>,
    config: RouterConfig,
}

impl RequestRouter {
    pub fn new(
        manager: Arc<dyn BusinessManager>,
        auditor: Arc<dyn Auditor>,
        config: RouterConfig,
    ) -> Self {
        Self {
            manager,
            filter: None,
            auditor,
            config,
        }
    }

    /// Gate dispatch on the filter's region polygons.
    pub fn with_location_filter(mut self, filter: LocationFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Handle one raw request body.
    pub async fn handle_request(&self, raw: &[u8]) -> ResponseEnvelope {
        let decoded = decode(raw);
        let request = match decoded.request {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(error = %e, "undecodable PAWS request");
                AuditedOperation::for_method(Arc::clone(&self.auditor), None).fail(e.to_string());
                return self
                    .failure(ErrorObject::new(ErrorCode::Exception, messages::INVALID_REQUEST))
                    .with_id(decoded.id);
            }
        };

        let method = match self.resolve(&request) {
            Ok(method) => method,
            Err(rejection) => return rejection.with_id(request.id),
        };
        tracing::Span::current().record(RPC_METHOD_FIELD, method.wire_name());

        let operation = AuditedOperation::for_method(Arc::clone(&self.auditor), Some(method.wire_name()));
        let outcome = self.dispatch(method, request.params).await;
        let response = match outcome {
            Ok(mut response) => {
                match response.error_mut() {
                    Some(error) => {
                        error.method.get_or_insert_with(|| method.wire_name().to_string());
                        operation.fail(describe(error));
                    }
                    None => operation.succeed(""),
                }
                response
            }
            Err(fault) => {
                tracing::error!(method = method.wire_name(), error = %fault, "PAWS request failed");
                operation.fail(fault.to_string());
                let detail = if self.config.expose_fault_details {
                    fault.to_string()
                } else {
                    messages::INTERNAL_ERROR.to_string()
                };
                self.failure(
                    ErrorObject::exception(Some(method.response_type()), detail)
                        .with_method(method.wire_name()),
                )
            }
        };
        response.with_id(request.id)
    }

    /// Map the envelope's method name onto a PAWS method, or produce the
    /// audited rejection for a null, empty or unknown name.
    fn resolve(&self, request: &RequestEnvelope) -> Result<PawsMethod, ResponseEnvelope> {
        let name = request.method.as_deref();
        let rejection = match name {
            None => ErrorObject::new(ErrorCode::InvalidRequest, messages::INVALID_REQUEST),
            Some("") => ErrorObject::new(ErrorCode::MethodNotFound, messages::METHOD_NAME_MISSING),
            Some(wire) => match PawsMethod::from_wire(wire) {
                Some(method) => return Ok(method),
                None => {
                    tracing::warn!(method = wire, "unknown PAWS method");
                    ErrorObject::new(ErrorCode::MethodNotFound, messages::METHOD_NOT_FOUND)
                }
            },
        };
        AuditedOperation::for_method(Arc::clone(&self.auditor), name).fail(describe(&rejection));
        Err(self.failure(rejection))
    }

    async fn dispatch(
        &self,
        method: PawsMethod,
        params: Option<paws_core::Parameters>,
    ) -> Result<ResponseEnvelope, RouterError> {
        let manager = Arc::clone(&self.manager);
        let filter = self.filter.clone();
        let jsonrpc = self.config.jsonrpc_version.clone();

        let task = tokio::task::spawn_blocking(move || {
            if let Some(rejection) = filter
                .as_ref()
                .and_then(|f| f.check(method, params.as_ref(), &jsonrpc))
            {
                return Ok(rejection);
            }
            let Some(params) = params else {
                return Ok(ResponseEnvelope::failure(
                    jsonrpc,
                    ErrorObject::from_messages(
                        method.response_type(),
                        &[messages::PARAMETERS_REQUIRED],
                    ),
                ));
            };
            manager.dispatch(method, &params).map_err(RouterError::from)
        });

        match tokio::time::timeout(self.config.request_timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join)) if join.is_panic() => Err(RouterError::Panicked),
            Ok(Err(_)) => Err(RouterError::Cancelled),
            Err(_) => Err(RouterError::Timeout(self.config.request_timeout.as_millis())),
        }
    }

    fn failure(&self, error: ErrorObject) -> ResponseEnvelope {
        ResponseEnvelope::failure(self.config.jsonrpc_version.clone(), error)
    }
}

impl std::fmt::Debug for RequestRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestRouter")
            .field("filter", &self.filter)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn describe(error: &ErrorObject) -> String {
    match error.data.as_deref().or(error.message.as_deref()) {
        Some(detail) => format!("{} {detail}", error.code),
        None => error.code.clone(),
    }
}
