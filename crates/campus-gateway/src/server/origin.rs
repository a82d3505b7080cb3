//! Handshake origin check
//!
//! CORS does not cover WebSocket handshakes, so the lobby checks the
//! `Origin` header itself against the configured CORS origins.

use campus_common::CorsConfig;

/// Which browser origins may open a lobby socket
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OriginPolicy {
    /// Development with no origins configured
    #[default]
    Any,
    /// Exactly these origins; an empty list rejects every browser origin
    List(Vec<String>),
}

impl OriginPolicy {
    /// Same rule as the HTTP CORS layer: any origin only in development
    /// with nothing configured
    pub fn from_config(config: &CorsConfig, is_production: bool) -> Self {
        if is_production || !config.allowed_origins.is_empty() {
            Self::List(
                config
                    .allowed_origins
                    .iter()
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect(),
            )
        } else {
            Self::Any
        }
    }

    /// Check a handshake's `Origin`; clients that send none are not browsers
    /// and pass
    pub fn allows(&self, origin: Option<&str>) -> bool {
        match (self, origin) {
            (Self::Any, _) | (_, None) => true,
            (Self::List(allowed), Some(origin)) => allowed.iter().any(|a| a == origin.trim()),
        }
    }
}
