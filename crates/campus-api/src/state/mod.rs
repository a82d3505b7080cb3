//! Application state
//!
//! Holds the shared state for the Axum application: the service context,
//! the gateway state (which owns the hub handle) and the configuration.

use std::sync::Arc;

use axum::extract::FromRef;
use campus_common::{AppConfig, JwtService};
use campus_gateway::{GatewayState, HubHandle, OriginPolicy};
use campus_service::ServiceContext;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Service context containing all dependencies
    service_context: Arc<ServiceContext>,
    /// Lobby state; shares the service context and carries the hub
    gateway: GatewayState,
    /// Application configuration
    config: Arc<AppConfig>,
}

impl AppState {
    /// Create a new AppState around a running hub
    pub fn new(service_context: ServiceContext, hub: HubHandle, config: AppConfig) -> Self {
        let service_context = Arc::new(service_context);
        let origins = OriginPolicy::from_config(&config.cors, config.app.env.is_production());
        let gateway =
            GatewayState::new(Arc::clone(&service_context), hub).with_origin_policy(origins);
        Self::with_gateway(service_context, gateway, config)
    }

    /// Create state with a prepared gateway state
    pub fn with_gateway(
        service_context: Arc<ServiceContext>,
        gateway: GatewayState,
        config: AppConfig,
    ) -> Self {
        Self {
            service_context,
            gateway,
            config: Arc::new(config),
        }
    }

    /// Get the service context
    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    /// Get the hub handle
    pub fn hub(&self) -> &HubHandle {
        self.gateway.hub()
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get the JWT service from the service context
    pub fn jwt_service(&self) -> &JwtService {
        self.service_context.jwt_service()
    }
}

impl FromRef<AppState> for GatewayState {
    fn from_ref(state: &AppState) -> Self {
        state.gateway.clone()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &self.service_context)
            .field("hub", self.gateway.hub())
            .field("config", &"AppConfig")
            .finish()
    }
}
