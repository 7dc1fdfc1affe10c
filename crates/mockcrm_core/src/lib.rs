//! # MockCRM Core
//!
//! In-memory stand-in for a third-party CRM's contact API, used to exercise
//! integrations without a real CRM.
//!
//! This crate provides:
//! - A synthetic contact generator with pluggable, seedable data providers
//! - An ordered in-memory contact repository
//! - A query engine for incremental sync (`since`) and offset pagination
//! - Create, bulk-simulate and webhook-echo operations
//!
//! # Architecture
//!
//! [`CrmService`] is the single owner of all mutable state: the
//! [`ContactRepository`] and the [`ContactGenerator`] whose counter hands out
//! contact ids. Both sit behind one lock, so concurrent creates never share
//! an id and readers never see a half-written batch.
//!
//! ```
//! use mockcrm_core::{ContactPatch, CrmConfig, CrmService};
//!
//! let service = CrmService::new(CrmConfig::default());
//!
//! let patch: ContactPatch =
//!     serde_json::from_str(r#"{"firstName":"Alice","id":"ignored"}"#).unwrap();
//! let contact = service.create(patch).unwrap();
//! assert_eq!(contact.first_name, "Alice");
//! assert_ne!(contact.id, "ignored");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
// Production code MUST NOT use panic!/unwrap()/expect()
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

mod config;
mod contact;
mod echo;
mod error;
mod generator;
mod providers;
mod query;
mod repository;
mod service;

pub use config::CrmConfig;
pub use contact::{
    validate_tags, Contact, ContactPatch, Tag, MAX_LEAD_SCORE, MAX_TAGS, MIN_LEAD_SCORE,
};
pub use echo::{echo, WebhookEcho};
pub use error::{CrmError, CrmResult};
pub use generator::{ContactGenerator, COMPANIES, JOB_TITLES};
pub use providers::{FrenchLocale, NameProvider, PhoneFormat, PhoneFormatProvider};
pub use query::{parse_int_param, parse_since, ContactPage, ListQuery, Pagination, QueryEngine};
pub use repository::ContactRepository;
pub use service::{CrmService, Health, SimulateResult};
