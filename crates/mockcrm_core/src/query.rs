//! Contact listing: incremental-sync filtering and offset pagination.
//!
//! Listing is a pure function of a repository snapshot and the query. It
//! draws no random numbers, so the same store and the same arguments always
//! give the same page.

use crate::config::CrmConfig;
use crate::contact::Contact;
use crate::error::{CrmError, CrmResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;
use std::num::IntErrorKind;
use std::sync::Arc;

/// Naive layouts accepted for `since`, read as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Layouts with a numeric offset that RFC 3339 rejects: a missing seconds
/// field, a colon-less `+hhmm`, or a space separator. `%.f` also matches an
/// absent fraction.
const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M%z",
];

/// Parameters of a listing request, before defaults are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Requested page size.
    pub limit: Option<i64>,
    /// Number of matching contacts to skip.
    pub offset: Option<i64>,
    /// Only return contacts modified strictly after this ISO-8601 instant.
    pub since: Option<String>,
}

impl ListQuery {
    /// Creates an empty query (first page, default size, no filter).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a query from raw query-string values.
    ///
    /// Fails with [`CrmError::InvalidParameter`] if `limit` or `offset` is
    /// not an integer.
    pub fn from_raw(
        limit: Option<&str>,
        offset: Option<&str>,
        since: Option<&str>,
    ) -> CrmResult<Self> {
        Ok(Self {
            limit: parse_int_param("limit", limit)?,
            offset: parse_int_param("offset", offset)?,
            since: since.map(str::to_string),
        })
    }

    /// Sets the page size.
    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the offset.
    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Sets the incremental-sync lower bound.
    pub fn with_since(mut self, since: impl Into<String>) -> Self {
        self.since = Some(since.into());
        self
    }
}

/// Pagination block of a listing response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Number of contacts matching the filter.
    pub total: usize,
    /// Effective page size.
    pub limit: usize,
    /// Effective offset.
    pub offset: usize,
    /// True if contacts remain past this page.
    pub has_more: bool,
}

/// One page of contacts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactPage {
    /// Contacts on this page, in insertion order.
    pub contacts: Vec<Contact>,
    /// Pagination details.
    pub pagination: Pagination,
    /// When the page was produced.
    pub timestamp: DateTime<Utc>,
}

/// Filters and paginates repository snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryEngine {
    default_limit: usize,
    max_limit: usize,
}

impl QueryEngine {
    /// Creates a query engine with the configured page bounds.
    pub fn new(config: &CrmConfig) -> Self {
        Self {
            default_limit: config.default_limit,
            max_limit: config.max_limit,
        }
    }

    /// Lists contacts from `snapshot`.
    ///
    /// 1. Parse `since`, failing before anything else on bad input.
    /// 2. Keep contacts with `lastModified > since`.
    /// 3. Count them, then slice `[offset, offset + limit)`.
    pub fn list(
        &self,
        snapshot: &[Arc<Contact>],
        query: &ListQuery,
        now: DateTime<Utc>,
    ) -> CrmResult<ContactPage> {
        let since = match query.since.as_deref() {
            Some(raw) => parse_since(raw)?,
            None => None,
        };
        let limit = self.resolve_limit(query.limit);
        let offset = resolve_offset(query.offset)?;

        let matching: Vec<&Arc<Contact>> = snapshot
            .iter()
            .filter(|c| since.map_or(true, |since| c.last_modified > since))
            .collect();

        let total = matching.len();
        let contacts = matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|c| Contact::clone(c))
            .collect();

        Ok(ContactPage {
            contacts,
            pagination: Pagination {
                total,
                limit,
                offset,
                has_more: offset.saturating_add(limit) < total,
            },
            timestamp: now,
        })
    }

    fn resolve_limit(&self, limit: Option<i64>) -> usize {
        match limit {
            None => self.default_limit,
            Some(n) if n <= 0 => 0,
            Some(n) => usize::try_from(n).map_or(self.max_limit, |n| n.min(self.max_limit)),
        }
    }
}

fn resolve_offset(offset: Option<i64>) -> CrmResult<usize> {
    match offset {
        None => Ok(0),
        Some(n) => usize::try_from(n).map_err(|_| CrmError::InvalidParameter {
            name: "offset",
            value: n.to_string(),
        }),
    }
}

/// Parses an optional integer query parameter.
///
/// Absent and blank values are `None`. Integers outside the `i64` range
/// saturate, so the caller's clamping still applies to them.
pub fn parse_int_param(name: &'static str, raw: Option<&str>) -> CrmResult<Option<i64>> {
    let value = match raw.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(value) => value,
    };

    match value.parse::<i64>() {
        Ok(n) => Ok(Some(n)),
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow => Ok(Some(i64::MAX)),
            IntErrorKind::NegOverflow => Ok(Some(i64::MIN)),
            _ => Err(CrmError::InvalidParameter {
                name,
                value: value.to_string(),
            }),
        },
    }
}

/// Parses an incremental-sync timestamp.
///
/// Accepts RFC 3339 (with `Z` or a numeric offset), ISO 8601 date-times with
/// a `Z`, a `+hhmm` offset or no seconds, naive date-times read as UTC, and
/// bare dates read as midnight UTC. A blank value means no filter.
pub fn parse_since(raw: &str) -> CrmResult<Option<DateTime<Utc>>> {
    let value = raw.trim();
    if value.is_empty() {
        return Ok(None);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }

    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Ok(Some(dt.with_timezone(&Utc)));
        }
    }

    // A trailing `Z` on an otherwise naive layout means UTC.
    let naive_value = value.strip_suffix(['Z', 'z']).unwrap_or(value);
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(naive_value, format) {
            return Ok(Some(Utc.from_utc_datetime(&naive)));
        }
    }

    if let Some(midnight) = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(Some(Utc.from_utc_datetime(&midnight)));
    }

    Err(CrmError::InvalidSince {
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::ContactGenerator;
    use chrono::Duration;

    fn snapshot_of(count: usize, now: DateTime<Utc>) -> Vec<Arc<Contact>> {
        let mut generator = ContactGenerator::new(&CrmConfig::default().with_rng_seed(11));
        (0..count)
            .map(|i| Arc::new(generator.generate(now + Duration::seconds(i as i64))))
            .collect()
    }

    fn engine() -> QueryEngine {
        QueryEngine::new(&CrmConfig::default())
    }

    #[test]
    fn first_page() {
        let now = Utc::now();
        let snapshot = snapshot_of(50, now);
        let page = engine()
            .list(&snapshot, &ListQuery::new().with_limit(10), now)
            .unwrap();

        assert_eq!(page.contacts.len(), 10);
        assert_eq!(page.pagination.total, 50);
        assert_eq!(page.pagination.limit, 10);
        assert_eq!(page.pagination.offset, 0);
        assert!(page.pagination.has_more);
        assert_eq!(page.contacts[0].id, snapshot[0].id);
    }

    #[test]
    fn defaults() {
        let now = Utc::now();
        let snapshot = snapshot_of(50, now);
        let page = engine().list(&snapshot, &ListQuery::new(), now).unwrap();
        assert_eq!(page.contacts.len(), 20);
        assert_eq!(page.pagination.limit, 20);
        assert_eq!(page.pagination.offset, 0);
    }

    #[test]
    fn last_page() {
        let now = Utc::now();
        let snapshot = snapshot_of(50, now);
        let page = engine()
            .list(&snapshot, &ListQuery::new().with_limit(20).with_offset(40), now)
            .unwrap();
        assert_eq!(page.contacts.len(), 10);
        assert!(!page.pagination.has_more);
        assert_eq!(page.contacts[0].id, snapshot[40].id);
    }

    #[test]
    fn offset_past_end() {
        let now = Utc::now();
        let snapshot = snapshot_of(5, now);
        let page = engine()
            .list(&snapshot, &ListQuery::new().with_offset(10), now)
            .unwrap();
        assert!(page.contacts.is_empty());
        assert_eq!(page.pagination.total, 5);
        assert!(!page.pagination.has_more);
    }

    #[test]
    fn limit_clamped() {
        let now = Utc::now();
        let snapshot = snapshot_of(150, now);
        let page = engine()
            .list(&snapshot, &ListQuery::new().with_limit(1000), now)
            .unwrap();
        assert_eq!(page.pagination.limit, 100);
        assert_eq!(page.contacts.len(), 100);

        let page = engine()
            .list(&snapshot, &ListQuery::new().with_limit(-5), now)
            .unwrap();
        assert_eq!(page.pagination.limit, 0);
        assert!(page.contacts.is_empty());
        assert!(page.pagination.has_more);
    }

    #[test]
    fn negative_offset_rejected() {
        let now = Utc::now();
        let snapshot = snapshot_of(5, now);
        let err = engine()
            .list(&snapshot, &ListQuery::new().with_offset(-1), now)
            .unwrap_err();
        assert!(matches!(err, CrmError::InvalidParameter { name: "offset", .. }));
    }

    #[test]
    fn since_filters_strictly() {
        let now = Utc::now();
        let snapshot = snapshot_of(10, now);
        // contacts are modified at now, now+1s, ..., now+9s
        let since = (now + Duration::seconds(4)).to_rfc3339();
        let page = engine()
            .list(&snapshot, &ListQuery::new().with_since(since), now)
            .unwrap();
        assert_eq!(page.pagination.total, 5);
        assert_eq!(page.contacts[0].id, snapshot[5].id);
    }

    #[test]
    fn since_after_everything() {
        let now = Utc::now();
        let snapshot = snapshot_of(10, now);
        let since = (now + Duration::days(1)).to_rfc3339();
        let page = engine()
            .list(&snapshot, &ListQuery::new().with_since(since), now)
            .unwrap();
        assert!(page.contacts.is_empty());
        assert_eq!(page.pagination.total, 0);
        assert!(!page.pagination.has_more);
    }

    #[test]
    fn bad_since() {
        let now = Utc::now();
        let snapshot = snapshot_of(3, now);
        let err = engine()
            .list(&snapshot, &ListQuery::new().with_since("not-a-date"), now)
            .unwrap_err();
        assert!(matches!(err, CrmError::InvalidSince { .. }));
    }

    #[test]
    fn deterministic() {
        let now = Utc::now();
        let snapshot = snapshot_of(30, now);
        let query = ListQuery::new().with_limit(7).with_offset(3);
        let a = engine().list(&snapshot, &query, now).unwrap();
        let b = engine().list(&snapshot, &query, now).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn since_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap();
        assert_eq!(parse_since("2024-03-01T10:30:00Z").unwrap(), Some(expected));
        assert_eq!(
            parse_since("2024-03-01T12:30:00+02:00").unwrap(),
            Some(expected)
        );
        assert_eq!(parse_since("2024-03-01T10:30:00").unwrap(), Some(expected));
        assert_eq!(
            parse_since("2024-03-01T10:30:00.000").unwrap(),
            Some(expected)
        );
        assert_eq!(
            parse_since("2024-03-01").unwrap(),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_since("2024-03-01T10:30Z").unwrap(), Some(expected));
        assert_eq!(parse_since("2024-03-01T10:30").unwrap(), Some(expected));
        assert_eq!(
            parse_since("2024-03-01T12:30:00+0200").unwrap(),
            Some(expected)
        );
        assert_eq!(
            parse_since("2024-03-01T12:30+02:00").unwrap(),
            Some(expected)
        );
        assert_eq!(
            parse_since("2024-03-01T10:30:00.250Z").unwrap(),
            Some(expected + Duration::milliseconds(250))
        );
        assert_eq!(parse_since("2024-03-01 10:30Z").unwrap(), Some(expected));
        assert_eq!(parse_since("").unwrap(), None);
        assert!(parse_since("01/03/2024").is_err());
        assert!(parse_since("2024-03-01T10Z").is_err());
    }

    #[test]
    fn int_params() {
        assert_eq!(parse_int_param("limit", None).unwrap(), None);
        assert_eq!(parse_int_param("limit", Some("")).unwrap(), None);
        assert_eq!(parse_int_param("limit", Some("15")).unwrap(), Some(15));
        assert_eq!(parse_int_param("offset", Some("-2")).unwrap(), Some(-2));
        assert!(parse_int_param("limit", Some("ten")).is_err());
        assert!(parse_int_param("limit", Some("1.5")).is_err());
        assert_eq!(
            parse_int_param("limit", Some("99999999999999999999")).unwrap(),
            Some(i64::MAX)
        );
        assert_eq!(
            parse_int_param("offset", Some("-99999999999999999999")).unwrap(),
            Some(i64::MIN)
        );
    }

    #[test]
    fn page_serializes_has_more() {
        let now = Utc::now();
        let snapshot = snapshot_of(3, now);
        let page = engine()
            .list(&snapshot, &ListQuery::new().with_limit(2), now)
            .unwrap();
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["pagination"]["hasMore"], true);
        assert_eq!(json["pagination"]["total"], 3);
        assert_eq!(json["contacts"].as_array().unwrap().len(), 2);
    }
}
