use std::net::{Ipv4Addr, SocketAddr};

use ai_llm_service::error_handler::{env_opt_string, parse_opt_u16};
use wellness_relay::Relay;

use crate::error_handler::AppResult;

/// Name reported by `GET /`.
pub const SERVICE_NAME: &str = "AroMi AI Agent Backend";

/// Port used when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 8000;

/// Shared state for all HTTP handlers. Immutable after startup.
pub struct AppState {
    /// The normalizing relay (possibly unconfigured).
    pub relay: Relay,
    /// Reported by the root status endpoint.
    pub service_name: &'static str,
}

impl AppState {
    pub fn new(relay: Relay) -> Self {
        Self {
            relay,
            service_name: SERVICE_NAME,
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiConfig {
    pub port: u16,
}

impl ApiConfig {
    /// Reads `PORT` from the environment.
    pub fn from_env() -> AppResult<Self> {
        Self::from_env_with(env_opt_string)
    }

    /// Reads `PORT` through `lookup` (default [`DEFAULT_PORT`]).
    pub fn from_env_with<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = parse_opt_u16("PORT", lookup("PORT"))?.unwrap_or(DEFAULT_PORT);
        Ok(Self { port })
    }

    /// `0.0.0.0:{port}`.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}
