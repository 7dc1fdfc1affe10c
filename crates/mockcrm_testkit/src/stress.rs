//! Stress tests for the mock CRM.
//!
//! These helpers hammer a shared service from several threads and then
//! check that ids stayed unique and readers never saw a half-applied batch.

use crate::fixtures::id_counter;
use mockcrm_core::{ContactPatch, CrmService, ListQuery};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Result of a stress test run.
#[derive(Debug, Clone)]
pub struct StressTestResult {
    /// Total operations performed.
    pub total_ops: usize,
    /// Successful operations.
    pub successful_ops: usize,
    /// Failed operations.
    pub failed_ops: usize,
    /// Total duration.
    pub duration: Duration,
    /// Operations per second.
    pub ops_per_second: f64,
}

impl StressTestResult {
    /// Creates a new result.
    pub fn new(successful: usize, failed: usize, duration: Duration) -> Self {
        let total = successful + failed;
        let ops_per_second = if duration.as_secs_f64() > 0.0 {
            total as f64 / duration.as_secs_f64()
        } else {
            0.0
        };

        Self {
            total_ops: total,
            successful_ops: successful,
            failed_ops: failed,
            duration,
            ops_per_second,
        }
    }
}

/// Configuration for stress tests.
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Operations per thread.
    pub operations: usize,
    /// Number of concurrent threads.
    pub threads: usize,
    /// Contacts per simulate call.
    pub simulate_batch: i64,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            operations: 200,
            threads: 4,
            simulate_batch: 5,
        }
    }
}

/// Checks the store-wide invariants and returns every violation found.
///
/// - ids are unique
/// - ids appear in strictly increasing counter order
/// - `lastModified >= createdAt` for every contact
pub fn store_violations(service: &CrmService) -> Vec<String> {
    let prefix = service.config().id_prefix.clone();
    let mut violations = Vec::new();
    let mut seen = HashSet::new();
    let mut previous = None;

    for contact in service.snapshot() {
        if !seen.insert(contact.id.clone()) {
            violations.push(format!("duplicate id {}", contact.id));
        }
        match id_counter(&contact.id, &prefix) {
            Some(counter) => {
                if previous.map_or(false, |p| counter <= p) {
                    violations.push(format!("id {} out of order", contact.id));
                }
                previous = Some(counter);
            }
            None => violations.push(format!("unexpected id {}", contact.id)),
        }
        if contact.last_modified < contact.created_at {
            violations.push(format!("{} modified before created", contact.id));
        }
    }

    violations
}

/// Runs concurrent creates; every thread issues `operations` creates.
pub fn stress_concurrent_creates(
    service: Arc<CrmService>,
    config: &StressConfig,
) -> StressTestResult {
    let successful = Arc::new(AtomicUsize::new(0));
    let failed = Arc::new(AtomicUsize::new(0));
    let start = Instant::now();

    let handles: Vec<_> = (0..config.threads)
        .map(|_| {
            let service = Arc::clone(&service);
            let successful = Arc::clone(&successful);
            let failed = Arc::clone(&failed);
            let operations = config.operations;

            thread::spawn(move || {
                for _ in 0..operations {
                    match service.create(ContactPatch::default()) {
                        Ok(_) => successful.fetch_add(1, Ordering::Relaxed),
                        Err(_) => failed.fetch_add(1, Ordering::Relaxed),
                    };
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    StressTestResult::new(
        successful.load(Ordering::Relaxed),
        failed.load(Ordering::Relaxed),
        start.elapsed(),
    )
}

/// Runs simulate batches on half the threads and full listings on the rest.
///
/// A reader counts a failure if a listing ever shrinks, if its ids are not
/// in counter order, or if it sees a partial simulate batch (a store size
/// that is not the seed plus a whole number of batches).
pub fn stress_mixed_operations(
    service: Arc<CrmService>,
    config: &StressConfig,
) -> StressTestResult {
    let successful = Arc::new(AtomicUsize::new(0));
    let failed = Arc::new(AtomicUsize::new(0));
    let seed = service.len();
    let batch = usize::try_from(config.simulate_batch.max(1)).unwrap_or(1);
    let prefix = service.config().id_prefix.clone();
    let start = Instant::now();

    let handles: Vec<_> = (0..config.threads.max(2))
        .map(|t| {
            let service = Arc::clone(&service);
            let successful = Arc::clone(&successful);
            let failed = Arc::clone(&failed);
            let operations = config.operations;
            let prefix = prefix.clone();
            let writer = t % 2 == 0;

            thread::spawn(move || {
                let mut last_total = 0;
                for _ in 0..operations {
                    let ok = if writer {
                        service.simulate(Some(batch as i64)).contacts.len() == batch
                    } else {
                        let query = ListQuery::new().with_limit(100);
                        let snapshot = service.snapshot();
                        let total = snapshot.len();
                        let ordered = snapshot
                            .windows(2)
                            .all(|w| id_counter(&w[0].id, &prefix) < id_counter(&w[1].id, &prefix));
                        let whole_batches = (total - seed) % batch == 0;
                        let grew = total >= last_total;
                        last_total = total;
                        ordered && whole_batches && grew && service.list(&query).is_ok()
                    };

                    if ok {
                        successful.fetch_add(1, Ordering::Relaxed);
                    } else {
                        failed.fetch_add(1, Ordering::Relaxed);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    StressTestResult::new(
        successful.load(Ordering::Relaxed),
        failed.load(Ordering::Relaxed),
        start.elapsed(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::shared_service;

    #[test]
    fn test_result_rates() {
        let result = StressTestResult::new(90, 10, Duration::from_secs(2));
        assert_eq!(result.total_ops, 100);
        assert_eq!(result.duration, Duration::from_secs(2));
        assert!((result.ops_per_second - 50.0).abs() < f64::EPSILON);

        let instant = StressTestResult::new(5, 0, Duration::ZERO);
        assert_eq!(instant.ops_per_second, 0.0);
    }

    #[test]
    fn test_concurrent_creates() {
        let service = shared_service(1);
        let config = StressConfig {
            operations: 100,
            threads: 4,
            ..Default::default()
        };

        let result = stress_concurrent_creates(Arc::clone(&service), &config);
        assert_eq!(result.failed_ops, 0);
        assert_eq!(result.successful_ops, 400);
        assert_eq!(result.total_ops, 400);
        assert!(result.duration > Duration::ZERO);
        assert!(result.ops_per_second > 0.0);
        assert_eq!(service.len(), 450);
        assert!(store_violations(&service).is_empty());
    }

    #[test]
    fn test_mixed_operations() {
        let service = shared_service(2);
        let config = StressConfig {
            operations: 50,
            threads: 4,
            simulate_batch: 3,
        };

        let result = stress_mixed_operations(Arc::clone(&service), &config);
        assert_eq!(result.failed_ops, 0);
        assert_eq!(service.len(), 50 + 2 * 50 * 3);
        assert!(store_violations(&service).is_empty());
    }
}
