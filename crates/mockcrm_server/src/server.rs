//! Router assembly and the listening server.

use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::handler::{self, SharedService};
use axum::routing::{get, post};
use axum::Router;
use mockcrm_core::CrmService;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Builds the contact API router around a service.
pub fn router(service: SharedService) -> Router {
    Router::new()
        .route("/health", get(handler::health))
        .route(
            "/api/contacts",
            get(handler::list_contacts).post(handler::create_contact),
        )
        .route("/api/contacts/simulate", post(handler::simulate_contacts))
        .route("/api/contacts/:id", get(handler::get_contact))
        .route("/webhook/test", post(handler::webhook_test))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// The mock CRM HTTP server.
///
/// Seeds a fresh [`CrmService`] on construction; nothing survives a
/// restart.
///
/// # Example
///
/// ```
/// use mockcrm_server::{CrmServer, ServerConfig};
///
/// let server = CrmServer::new(ServerConfig::default());
/// assert_eq!(server.service().len(), 50);
///
/// // In a real application, call `server.serve().await`
/// ```
pub struct CrmServer {
    config: ServerConfig,
    service: SharedService,
}

impl CrmServer {
    /// Creates a server and seeds its contact store.
    pub fn new(config: ServerConfig) -> Self {
        let service = Arc::new(CrmService::new(config.crm.clone()));
        Self { config, service }
    }

    /// Creates a server around an existing service.
    pub fn with_service(config: ServerConfig, service: SharedService) -> Self {
        Self { config, service }
    }

    /// Returns the shared service.
    pub fn service(&self) -> &SharedService {
        &self.service
    }

    /// Returns the router for this server's service.
    pub fn router(&self) -> Router {
        router(Arc::clone(&self.service))
    }

    /// Binds the configured address and serves until the process exits.
    pub async fn serve(self) -> ServerResult<()> {
        self.serve_with_shutdown(std::future::pending::<()>()).await
    }

    /// Binds the configured address and serves until `shutdown` resolves.
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        info!(
            address = %listener.local_addr()?,
            contacts = self.service.len(),
            "Mock CRM API listening"
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Mock CRM API stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockcrm_core::CrmConfig;

    #[test]
    fn server_lifecycle() {
        let config =
            ServerConfig::default().with_crm(CrmConfig::default().with_seed_count(7));
        let server = CrmServer::new(config);
        assert_eq!(server.service().len(), 7);
    }

    #[test]
    fn shared_service() {
        let service = Arc::new(CrmService::new(CrmConfig::default().with_seed_count(2)));
        let server = CrmServer::with_service(ServerConfig::default(), Arc::clone(&service));

        server.service().simulate(Some(3));
        assert_eq!(service.len(), 5);
    }

    #[tokio::test]
    async fn serves_until_shutdown() {
        let config = ServerConfig::new("127.0.0.1:0".parse().unwrap())
            .with_crm(CrmConfig::default().with_seed_count(1));
        let server = CrmServer::new(config);

        let result = server.serve_with_shutdown(async {}).await;
        assert!(result.is_ok());
    }
}
