//! # MockCRM Server
//!
//! HTTP front end for the mock CRM.
//!
//! | Method & path | Purpose |
//! |---|---|
//! | `GET /health` | liveness |
//! | `GET /api/contacts?limit&offset&since` | list / incremental sync |
//! | `GET /api/contacts/:id` | fetch one contact |
//! | `POST /api/contacts` | create (JSON body optional) |
//! | `POST /api/contacts/simulate?count=N` | bulk create |
//! | `POST /webhook/test` | echo a webhook delivery |
//!
//! Errors are returned as `{"error": "<message>"}` with status 400 or 404.
//!
//! # Usage
//!
//! ```rust,ignore
//! use mockcrm_server::{CrmServer, ServerConfig};
//!
//! let server = CrmServer::new(ServerConfig::default());
//! server.serve().await?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
// Production code MUST NOT use panic!/unwrap()/expect()
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

mod config;
mod error;
mod handler;
mod server;

pub use config::ServerConfig;
pub use error::{ApiError, ServerError, ServerResult};
pub use handler::SharedService;
pub use server::{router, CrmServer};
