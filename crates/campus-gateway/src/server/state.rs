//! Gateway state
//!
//! Shared dependencies of the lobby endpoint.

use crate::connection::{MessageRecorder, ServiceRecorder};
use crate::hub::HubHandle;
use crate::server::OriginPolicy;
use campus_common::{ChatConfig, JwtService};
use campus_service::ServiceContext;
use std::sync::Arc;

/// Gateway application state
///
/// Embedded in the outer router state; the lobby route reaches it through
/// `FromRef`.
#[derive(Clone)]
pub struct GatewayState {
    /// Service context with repositories and settings
    service_context: Arc<ServiceContext>,
    /// Handle to the room hub
    hub: HubHandle,
    /// Where inbound messages are stored
    recorder: Arc<dyn MessageRecorder>,
    /// Browser origins allowed to open a socket
    origins: Arc<OriginPolicy>,
}

impl GatewayState {
    /// Create state that records messages through `ChatService`
    pub fn new(service_context: Arc<ServiceContext>, hub: HubHandle) -> Self {
        let recorder = Arc::new(ServiceRecorder::new(Arc::clone(&service_context)));
        Self::with_recorder(service_context, hub, recorder)
    }

    pub fn with_recorder(
        service_context: Arc<ServiceContext>,
        hub: HubHandle,
        recorder: Arc<dyn MessageRecorder>,
    ) -> Self {
        Self {
            service_context,
            hub,
            recorder,
            origins: Arc::new(OriginPolicy::default()),
        }
    }

    /// Restrict handshakes to the origins `policy` allows
    pub fn with_origin_policy(mut self, policy: OriginPolicy) -> Self {
        self.origins = Arc::new(policy);
        self
    }

    pub fn origin_policy(&self) -> &OriginPolicy {
        &self.origins
    }

    /// Get the service context
    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    /// Get the hub handle
    pub fn hub(&self) -> &HubHandle {
        &self.hub
    }

    pub fn recorder(&self) -> Arc<dyn MessageRecorder> {
        Arc::clone(&self.recorder)
    }

    pub fn jwt_service(&self) -> &JwtService {
        self.service_context.jwt_service()
    }

    pub fn chat_config(&self) -> &ChatConfig {
        self.service_context.chat_config()
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("service_context", &self.service_context)
            .field("hub", &self.hub)
            .field("origins", &self.origins)
            .finish()
    }
}
