use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Path every resource is mounted under.
    pub base_path: String,
    /// Answer cross-origin requests from any origin.
    pub permissive_cors: bool,
}

impl ServerConfig {
    pub const DEFAULT_PORT: u16 = 3000;
    pub const DEFAULT_BASE_PATH: &'static str = "/api";

    /// Keep the bind host, listen on `port`.
    pub fn with_port(mut self, port: u16) -> Self {
        self.bind_addr.set_port(port);
        self
    }

    /// Mount resources under `base_path` instead of `/api`.
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], Self::DEFAULT_PORT)),
            base_path: Self::DEFAULT_BASE_PATH.to_string(),
            permissive_cors: true,
        }
    }
}
