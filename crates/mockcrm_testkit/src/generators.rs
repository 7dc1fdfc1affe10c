//! Property-based test generators using proptest.
//!
//! Provides strategies for create payloads and listing queries, both valid
//! and deliberately invalid.

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Timelike, Utc};
use mockcrm_core::{ContactPatch, ListQuery, Tag, MAX_LEAD_SCORE, MIN_LEAD_SCORE};
use proptest::prelude::*;

/// Earliest timestamp the strategies produce (2020-01-01T00:00:00Z).
const EPOCH_2020: i64 = 1_577_836_800;
/// Span of generated timestamps, roughly three years.
const SPAN_SECS: i64 = 100_000_000;

/// Strategy for a single tag.
pub fn tag_strategy() -> impl Strategy<Value = Tag> {
    prop::sample::select(Tag::ALL.to_vec())
}

/// Strategy for a valid tag list (1 to 3 distinct tags).
pub fn tags_strategy() -> impl Strategy<Value = Vec<Tag>> {
    prop::sample::subsequence(Tag::ALL.to_vec(), 1..=3).prop_shuffle()
}

/// Strategy for an in-range lead score.
pub fn lead_score_strategy() -> impl Strategy<Value = i64> {
    MIN_LEAD_SCORE..=MAX_LEAD_SCORE
}

/// Strategy for a timestamp between 2020 and early 2023.
pub fn past_timestamp_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (0..SPAN_SECS).prop_map(|secs| {
        Utc.timestamp_opt(EPOCH_2020 + secs, 0)
            .single()
            .unwrap_or_default()
    })
}

fn short_text() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Za-zÀ-ÿ' -]{1,24}").expect("Invalid regex")
}

/// Strategy for create payloads that pass validation.
pub fn valid_patch_strategy() -> impl Strategy<Value = ContactPatch> {
    let names = (
        prop::option::of(short_text()),
        prop::option::of(short_text()),
        prop::option::of(
            prop::string::string_regex("[a-z]{1,10}@[a-z]{1,8}\\.fr").expect("Invalid regex"),
        ),
        prop::option::of(
            prop::string::string_regex("\\+33[1-7][0-9]{8}").expect("Invalid regex"),
        ),
        prop::option::of(short_text()),
        prop::option::of(short_text()),
    );
    let details = (
        prop::option::of(tags_strategy()),
        prop::option::of(lead_score_strategy()),
        prop::option::of(short_text()),
        prop::option::of(short_text()),
        prop::option::of((past_timestamp_strategy(), prop::option::of(0..SPAN_SECS))),
    );

    (names, details).prop_map(
        |(
            (first_name, last_name, email, phone, company, job_title),
            (tags, lead_score, source, notes, times),
        )| {
            let (created_at, last_modified) = match times {
                Some((created, Some(delta))) => {
                    (Some(created), Some(created + Duration::seconds(delta)))
                }
                Some((created, None)) => (Some(created), None),
                None => (None, None),
            };
            ContactPatch {
                first_name,
                last_name,
                email,
                phone,
                company,
                job_title,
                tags,
                created_at,
                last_modified,
                source,
                lead_score,
                notes,
            }
        },
    )
}

/// Strategy for create payloads that must be rejected.
pub fn invalid_patch_strategy() -> impl Strategy<Value = ContactPatch> {
    prop_oneof![
        prop_oneof![i64::MIN..MIN_LEAD_SCORE, (MAX_LEAD_SCORE + 1)..=i64::MAX].prop_map(
            |score| ContactPatch {
                lead_score: Some(score),
                ..Default::default()
            }
        ),
        Just(ContactPatch {
            tags: Some(Vec::new()),
            ..Default::default()
        }),
        tag_strategy().prop_map(|tag| ContactPatch {
            tags: Some(vec![tag, tag]),
            ..Default::default()
        }),
        Just(ContactPatch {
            tags: Some(Tag::ALL[..4].to_vec()),
            ..Default::default()
        }),
        (past_timestamp_strategy(), 1..SPAN_SECS).prop_map(|(modified, delta)| ContactPatch {
            created_at: Some(modified + Duration::seconds(delta)),
            last_modified: Some(modified),
            ..Default::default()
        }),
    ]
}

/// Strategy for listing queries without a `since` filter.
///
/// Limits range past both ends of the clamp; offsets are never negative.
pub fn list_query_strategy() -> impl Strategy<Value = ListQuery> {
    (
        prop::option::of(-10i64..200),
        prop::option::of(0i64..150),
    )
        .prop_map(|(limit, offset)| ListQuery {
            limit,
            offset,
            since: None,
        })
}

/// Strategy for a timestamp rendered in one of the accepted `since` layouts.
///
/// Yields the string and the instant it must parse to. Layouts without
/// seconds parse to the start of the minute.
pub fn since_strategy() -> impl Strategy<Value = (String, DateTime<Utc>)> {
    (past_timestamp_strategy(), 0usize..8, -12i32..=14).prop_map(|(at, layout, hours)| {
        let offset = FixedOffset::east_opt(hours * 3600).expect("Invalid offset");
        let local = at.with_timezone(&offset);
        // Minute-precision layouts drop the seconds.
        let at_minute = at - Duration::seconds(i64::from(at.second()));
        let (text, expected) = match layout {
            0 => (at.format("%Y-%m-%dT%H:%M:%SZ").to_string(), at),
            1 => (local.to_rfc3339(), at),
            2 => (at.format("%Y-%m-%dT%H:%M:%S").to_string(), at),
            3 => (at.format("%Y-%m-%dT%H:%M:%S%.3f").to_string(), at),
            4 => (local.format("%Y-%m-%dT%H:%M:%S%z").to_string(), at),
            5 => (local.format("%Y-%m-%dT%H:%M%:z").to_string(), at_minute),
            6 => (at.format("%Y-%m-%dT%H:%MZ").to_string(), at_minute),
            _ => (at.format("%Y-%m-%d %H:%M:%S").to_string(), at),
        };
        (text, expected)
    })
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockcrm_core::validate_tags;

    proptest! {
        #![proptest_config(PropTestConfig::quick().to_proptest_config())]

        #[test]
        fn tags_are_valid(tags in tags_strategy()) {
            prop_assert!(validate_tags(&tags).is_ok());
        }

        #[test]
        fn valid_patches_validate(patch in valid_patch_strategy()) {
            prop_assert!(patch.validate(Utc::now()).is_ok());
        }

        #[test]
        fn invalid_patches_fail(patch in invalid_patch_strategy()) {
            prop_assert!(patch.validate(Utc::now()).is_err());
        }

        #[test]
        fn offsets_are_non_negative(query in list_query_strategy()) {
            prop_assert!(query.offset.map_or(true, |o| o >= 0));
        }
    }
}
