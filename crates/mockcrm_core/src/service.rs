//! The mock CRM service object.

use crate::config::CrmConfig;
use crate::contact::{Contact, ContactPatch};
use crate::echo::{self, WebhookEcho};
use crate::error::{CrmError, CrmResult};
use crate::generator::ContactGenerator;
use crate::query::{ContactPage, ListQuery, QueryEngine};
use crate::repository::ContactRepository;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// Liveness report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    /// Always `"healthy"` while the process serves requests.
    pub status: String,
    /// When the report was produced.
    pub timestamp: DateTime<Utc>,
}

/// Outcome of a simulate call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulateResult {
    /// Human-readable summary, `"Created N new contacts"`.
    pub message: String,
    /// The new contacts in generation order.
    pub contacts: Vec<Contact>,
}

/// Mutable state guarded by the service lock.
#[derive(Debug)]
struct CrmState {
    repository: ContactRepository,
    generator: ContactGenerator,
}

impl CrmState {
    fn insert_generated(&mut self, now: DateTime<Utc>) -> Arc<Contact> {
        let contact = self.generator.generate(now);
        self.repository.append(contact)
    }
}

/// The mock CRM.
///
/// Owns the contact repository and the generator (and with it the id
/// counter) behind a single reader-writer lock:
/// - create, simulate and seeding hold the write lock for the whole call,
///   so a batch gets consecutive ids and lands contiguously
/// - get and list hold the read lock only long enough to take a snapshot
///
/// Share it between request handlers as `Arc<CrmService>`.
///
/// # Example
///
/// ```
/// use mockcrm_core::{CrmConfig, CrmService, ListQuery};
///
/// let service = CrmService::new(CrmConfig::default().with_rng_seed(1));
/// assert_eq!(service.len(), 50);
///
/// let page = service.list(&ListQuery::new().with_limit(10)).unwrap();
/// assert_eq!(page.contacts.len(), 10);
/// assert!(page.pagination.has_more);
/// ```
pub struct CrmService {
    config: CrmConfig,
    engine: QueryEngine,
    state: RwLock<CrmState>,
}

impl CrmService {
    /// Creates a service and seeds it with `config.seed_count` contacts.
    pub fn new(config: CrmConfig) -> Self {
        let generator = ContactGenerator::new(&config);
        Self::with_generator(config, generator)
    }

    /// Creates a service around an existing generator and seeds it.
    pub fn with_generator(config: CrmConfig, generator: ContactGenerator) -> Self {
        let service = Self {
            engine: QueryEngine::new(&config),
            state: RwLock::new(CrmState {
                repository: ContactRepository::new(),
                generator,
            }),
            config,
        };
        service.seed();
        service
    }

    fn seed(&self) {
        let count = self.config.seed_count;
        let mut state = self.state.write();
        let now = Utc::now();
        for _ in 0..count {
            state.insert_generated(now);
        }
        info!(
            contacts = state.repository.len(),
            last_id_counter = state.generator.counter(),
            "Seeded contact repository"
        );
    }

    /// Returns the configuration.
    pub fn config(&self) -> &CrmConfig {
        &self.config
    }

    /// Reports liveness.
    pub fn health(&self) -> Health {
        Health {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }

    /// Lists contacts, optionally only those modified after `since`.
    pub fn list(&self, query: &ListQuery) -> CrmResult<ContactPage> {
        let snapshot = self.snapshot();
        let page = self.engine.list(&snapshot, query, Utc::now())?;
        debug!(
            returned = page.contacts.len(),
            total = page.pagination.total,
            offset = page.pagination.offset,
            limit = page.pagination.limit,
            since = query.since.as_deref().unwrap_or(""),
            "Listed contacts"
        );
        Ok(page)
    }

    /// Fetches one contact.
    pub fn get(&self, id: &str) -> CrmResult<Contact> {
        let found = self.state.read().repository.get(id);
        found
            .map(|contact| Contact::clone(&contact))
            .ok_or_else(|| CrmError::ContactNotFound { id: id.to_string() })
    }

    /// Creates one contact, overlaying `patch` on generated values.
    ///
    /// The patch is validated first; on failure nothing is stored and the id
    /// counter does not move.
    pub fn create(&self, patch: ContactPatch) -> CrmResult<Contact> {
        let mut state = self.state.write();
        let now = Utc::now();
        patch.validate(now)?;

        let mut contact = state.generator.generate(now);
        let overridden = !patch.is_empty();
        patch.apply(&mut contact);
        let stored = state.repository.append(contact);
        drop(state);

        debug!(id = %stored.id, overridden, "Created contact");
        Ok(Contact::clone(&stored))
    }

    /// Generates and stores a batch of contacts.
    ///
    /// `count` defaults to `default_simulate` and is clamped to
    /// `[0, max_simulate]`.
    pub fn simulate(&self, count: Option<i64>) -> SimulateResult {
        let count = self.resolve_simulate_count(count);

        let mut state = self.state.write();
        let now = Utc::now();
        let contacts: Vec<Contact> = (0..count)
            .map(|_| Contact::clone(&state.insert_generated(now)))
            .collect();
        drop(state);

        debug!(count = contacts.len(), "Simulated new contacts");
        SimulateResult {
            message: format!("Created {} new contacts", contacts.len()),
            contacts,
        }
    }

    /// Echoes a webhook delivery.
    pub fn echo(&self, payload: Option<Value>) -> WebhookEcho {
        let reply = echo::echo(payload, Utc::now());
        let pretty = serde_json::to_string_pretty(&reply.payload)
            .unwrap_or_else(|_| reply.payload.to_string());
        info!(payload = %pretty, "Webhook received");
        reply
    }

    /// Returns a point-in-time copy of the stored contacts.
    pub fn snapshot(&self) -> Vec<Arc<Contact>> {
        self.state.read().repository.snapshot()
    }

    /// Returns the number of stored contacts.
    pub fn len(&self) -> usize {
        self.state.read().repository.len()
    }

    /// Returns true if no contacts are stored.
    pub fn is_empty(&self) -> bool {
        self.state.read().repository.is_empty()
    }

    /// Returns the counter value behind the most recent id.
    pub fn last_id_counter(&self) -> u64 {
        self.state.read().generator.counter()
    }

    fn resolve_simulate_count(&self, count: Option<i64>) -> usize {
        let max = self.config.max_simulate;
        match count {
            None => self.config.default_simulate,
            Some(n) if n <= 0 => 0,
            Some(n) => usize::try_from(n).map_or(max, |n| n.min(max)),
        }
    }
}

impl std::fmt::Debug for CrmService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrmService")
            .field("config", &self.config)
            .field("contacts", &self.len())
            .finish_non_exhaustive()
    }
}
