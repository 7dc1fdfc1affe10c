//! Synthetic contact generation.
//!
//! The generator owns the id counter. Every creation path (bootstrap seeding,
//! create, simulate) goes through [`ContactGenerator::generate`], so ids stay
//! unique for the lifetime of the process.

use crate::config::CrmConfig;
use crate::contact::{Contact, Tag, MAX_LEAD_SCORE, MAX_TAGS, MIN_LEAD_SCORE};
use crate::providers::{FrenchLocale, NameProvider, PhoneFormatProvider};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Companies a generated contact may work for.
pub const COMPANIES: &[&str] = &[
    "TechCorp",
    "DataInc",
    "InnovateSAS",
    "DigitalPro",
    "CloudSystems",
    "AI Solutions",
    "WebDev Studio",
    "Analytics Plus",
    "StartupLab",
    "Enterprise Solutions",
    "Digital Agency",
    "Tech Consulting",
];

/// Job titles a generated contact may hold.
pub const JOB_TITLES: &[&str] = &[
    "Développeur Full Stack",
    "Chef de Projet",
    "Directeur Marketing",
    "Analyste de Données",
    "Consultant IT",
    "Responsable Commercial",
    "Product Owner",
    "UX Designer",
    "DevOps Engineer",
    "Data Scientist",
];

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Produces randomized contacts.
pub struct ContactGenerator {
    rng: StdRng,
    names: Box<dyn NameProvider>,
    phones: Box<dyn PhoneFormatProvider>,
    id_prefix: String,
    counter: u64,
    history_millis: i64,
    source: String,
}

impl ContactGenerator {
    /// Creates a generator backed by the French locale.
    pub fn new(config: &CrmConfig) -> Self {
        Self::with_providers(config, Box::new(FrenchLocale), Box::new(FrenchLocale))
    }

    /// Creates a generator with custom data providers.
    pub fn with_providers(
        config: &CrmConfig,
        names: Box<dyn NameProvider>,
        phones: Box<dyn PhoneFormatProvider>,
    ) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            rng,
            names,
            phones,
            id_prefix: config.id_prefix.clone(),
            counter: config.id_counter_start,
            history_millis: i64::from(config.history_days) * MILLIS_PER_DAY,
            source: config.source.clone(),
        }
    }

    /// Returns the counter value of the last generated contact.
    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// Generates one contact stamped at `now`.
    ///
    /// Advances the id counter. Never fails.
    pub fn generate(&mut self, now: DateTime<Utc>) -> Contact {
        self.counter += 1;
        let id = format!("{}{}", self.id_prefix, self.counter);

        let rng = &mut self.rng;
        let first_name = self.names.first_name(rng);
        let last_name = self.names.last_name(rng);
        let email = self.names.email(&first_name, &last_name, rng);
        let phone = self.phones.random_phone(rng);
        let company = COMPANIES.choose(rng).copied().unwrap_or_default().to_string();
        let job_title = JOB_TITLES.choose(rng).copied().unwrap_or_default().to_string();

        let tag_count = rng.gen_range(1..=MAX_TAGS);
        let tags: Vec<Tag> = Tag::ALL.choose_multiple(rng, tag_count).copied().collect();

        let age = rng.gen_range(0..=self.history_millis);
        let created_at = now - Duration::milliseconds(age);
        let lead_score = rng.gen_range(MIN_LEAD_SCORE..=MAX_LEAD_SCORE);
        let notes = self.names.notes(rng);

        Contact {
            id,
            first_name,
            last_name,
            email,
            phone,
            company,
            job_title,
            tags,
            created_at,
            last_modified: now,
            source: self.source.clone(),
            lead_score,
            notes,
        }
    }
}

impl std::fmt::Debug for ContactGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactGenerator")
            .field("id_prefix", &self.id_prefix)
            .field("counter", &self.counter)
            .finish_non_exhaustive()
    }
}
