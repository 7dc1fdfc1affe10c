//! Service configuration.

/// Configuration for the mock CRM service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrmConfig {
    /// Number of contacts generated at startup.
    pub seed_count: usize,
    /// Prefix of every generated contact id.
    pub id_prefix: String,
    /// Counter value before the first contact; the first id uses `start + 1`.
    pub id_counter_start: u64,
    /// Page size when the caller gives no `limit`.
    pub default_limit: usize,
    /// Upper bound for `limit`.
    pub max_limit: usize,
    /// Batch size when the caller gives no simulate `count`.
    pub default_simulate: usize,
    /// Upper bound for a simulate batch.
    pub max_simulate: usize,
    /// How far back `createdAt` may reach, in days.
    pub history_days: u32,
    /// Value of the `source` field on generated contacts.
    pub source: String,
    /// Seed for the random source. `None` draws from OS entropy.
    pub rng_seed: Option<u64>,
}

impl CrmConfig {
    /// Sets the number of contacts seeded at startup.
    pub fn with_seed_count(mut self, count: usize) -> Self {
        self.seed_count = count;
        self
    }

    /// Makes generation reproducible.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Sets the id prefix.
    pub fn with_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = prefix.into();
        self
    }

    /// Sets the counter value the first id is derived from.
    pub fn with_id_counter_start(mut self, start: u64) -> Self {
        self.id_counter_start = start;
        self
    }

    /// Sets the page size bounds.
    pub fn with_limits(mut self, default_limit: usize, max_limit: usize) -> Self {
        self.default_limit = default_limit.min(max_limit);
        self.max_limit = max_limit;
        self
    }

    /// Sets the simulate batch bounds.
    pub fn with_simulate_bounds(mut self, default_count: usize, max_count: usize) -> Self {
        self.default_simulate = default_count.min(max_count);
        self.max_simulate = max_count;
        self
    }
}

impl Default for CrmConfig {
    fn default() -> Self {
        Self {
            seed_count: 50,
            id_prefix: "mock_crm_".to_string(),
            id_counter_start: 1000,
            default_limit: 20,
            max_limit: 100,
            default_simulate: 5,
            max_simulate: 20,
            history_days: 30,
            source: "website_form".to_string(),
            rng_seed: None,
        }
    }
}
