//! Server configuration.

use mockcrm_core::CrmConfig;
use std::net::SocketAddr;

/// Configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to.
    pub bind_addr: SocketAddr,
    /// Configuration of the underlying mock CRM.
    pub crm: CrmConfig,
}

impl ServerConfig {
    /// Creates a new server configuration.
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            crm: CrmConfig::default(),
        }
    }

    /// Replaces the mock CRM configuration.
    pub fn with_crm(mut self, crm: CrmConfig) -> Self {
        self.crm = crm;
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(SocketAddr::from(([0, 0, 0, 0], 3000)))
    }
}
