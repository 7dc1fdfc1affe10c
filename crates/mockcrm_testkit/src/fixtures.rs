//! Service fixtures.
//!
//! Every fixture seeds its RNG so failures reproduce.

use chrono::{DateTime, Utc};
use mockcrm_core::{CrmConfig, CrmService};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Seed used when a test does not pick one.
pub const DEFAULT_TEST_SEED: u64 = 0x5eed;

/// Creates a service seeded with the default 50 contacts.
pub fn seeded_service(seed: u64) -> CrmService {
    CrmService::new(CrmConfig::default().with_rng_seed(seed))
}

/// Creates a service seeded with `count` contacts.
pub fn service_with(count: usize, seed: u64) -> CrmService {
    CrmService::new(
        CrmConfig::default()
            .with_seed_count(count)
            .with_rng_seed(seed),
    )
}

/// Creates a shareable service seeded with the default 50 contacts.
pub fn shared_service(seed: u64) -> Arc<CrmService> {
    Arc::new(seeded_service(seed))
}

/// Runs a test against a freshly seeded service.
///
/// # Example
///
/// ```rust,ignore
/// use mockcrm_testkit::with_service;
///
/// #[test]
/// fn my_test() {
///     with_service(|service| {
///         let page = service.list(&Default::default()).unwrap();
///         assert_eq!(page.pagination.total, 50);
///     });
/// }
/// ```
pub fn with_service<F, R>(f: F) -> R
where
    F: FnOnce(&CrmService) -> R,
{
    let service = seeded_service(DEFAULT_TEST_SEED);
    f(&service)
}

/// Extracts the counter from a generated id, e.g. `mock_crm_1007` -> 1007.
pub fn id_counter(id: &str, prefix: &str) -> Option<u64> {
    id.strip_prefix(prefix)?.parse().ok()
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;
    use mockcrm_core::Contact;

    /// A seeded service plus a batch simulated strictly after `marker`.
    pub struct RecentBatch {
        /// The service.
        pub service: CrmService,
        /// An instant after the seed and before the batch.
        pub marker: DateTime<Utc>,
        /// The contacts simulated after `marker`.
        pub batch: Vec<Contact>,
    }

    /// Seeds a service, waits, records a marker, waits, then simulates
    /// `batch_size` contacts.
    ///
    /// The pauses keep the marker strictly between the seed's and the
    /// batch's `lastModified` regardless of clock resolution.
    pub fn recent_batch(batch_size: i64) -> RecentBatch {
        let service = seeded_service(DEFAULT_TEST_SEED);
        thread::sleep(Duration::from_millis(5));
        let marker = Utc::now();
        thread::sleep(Duration::from_millis(5));
        let batch = service.simulate(Some(batch_size)).contacts;

        RecentBatch {
            service,
            marker,
            batch,
        }
    }
}
