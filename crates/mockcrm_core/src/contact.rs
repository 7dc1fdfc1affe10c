//! Contact record, tag vocabulary and the create-path patch.

use crate::error::{CrmError, CrmResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest lead score a contact may carry.
pub const MIN_LEAD_SCORE: i64 = 10;
/// Highest lead score a contact may carry.
pub const MAX_LEAD_SCORE: i64 = 100;
/// Most tags a single contact may carry.
pub const MAX_TAGS: usize = 3;

/// A tag from the fixed CRM vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    /// Not yet contacted.
    Prospect,
    /// Paying customer.
    Client,
    /// Qualified lead.
    Lead,
    /// Large account.
    Enterprise,
    /// Early-stage company.
    Startup,
    /// High-value account.
    Premium,
}

impl Tag {
    /// Every tag, in vocabulary order.
    pub const ALL: [Tag; 6] = [
        Tag::Prospect,
        Tag::Client,
        Tag::Lead,
        Tag::Enterprise,
        Tag::Startup,
        Tag::Premium,
    ];

    /// Returns the wire name of the tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Prospect => "prospect",
            Tag::Client => "client",
            Tag::Lead => "lead",
            Tag::Enterprise => "enterprise",
            Tag::Startup => "startup",
            Tag::Premium => "premium",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A CRM contact.
///
/// Contacts are produced by the generator and owned by the repository.
/// Once stored they are never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// Unique id, `<prefix><counter>`.
    pub id: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Email address.
    pub email: String,
    /// Phone number in one of the supported formats.
    pub phone: String,
    /// Employer.
    pub company: String,
    /// Role at the employer.
    pub job_title: String,
    /// 1 to 3 distinct tags.
    pub tags: Vec<Tag>,
    /// When the contact was created upstream.
    pub created_at: DateTime<Utc>,
    /// Last modification, never earlier than `created_at`.
    pub last_modified: DateTime<Utc>,
    /// Origin of the contact.
    pub source: String,
    /// Lead score in `[10, 100]`.
    pub lead_score: i64,
    /// Free-form notes.
    pub notes: String,
}

/// Field overrides supplied when creating a contact.
///
/// Every field is optional. There is no `id` field: an `id` key in the
/// incoming JSON is dropped during deserialization along with any other
/// unknown key, so the generated id always survives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPatch {
    /// Overrides `firstName`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Overrides `lastName`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Overrides `email`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Overrides `phone`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Overrides `company`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Overrides `jobTitle`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    /// Overrides `tags`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
    /// Overrides `createdAt`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Overrides `lastModified`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    /// Overrides `source`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Overrides `leadScore`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_score: Option<i64>,
    /// Overrides `notes`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ContactPatch {
    /// Returns true if the patch overrides nothing.
    pub fn is_empty(&self) -> bool {
        *self == ContactPatch::default()
    }

    /// Checks the patch against the contact schema.
    ///
    /// `now` is the instant the base contact will be generated at; it is the
    /// `lastModified` the merged record gets unless the patch overrides it.
    pub fn validate(&self, now: DateTime<Utc>) -> CrmResult<()> {
        if let Some(score) = self.lead_score {
            if !(MIN_LEAD_SCORE..=MAX_LEAD_SCORE).contains(&score) {
                return Err(CrmError::invalid_payload(format!(
                    "leadScore must be between {} and {}, got {}",
                    MIN_LEAD_SCORE, MAX_LEAD_SCORE, score
                )));
            }
        }

        if let Some(tags) = &self.tags {
            validate_tags(tags)?;
        }

        if let Some(created_at) = self.created_at {
            let last_modified = self.last_modified.unwrap_or(now);
            if created_at > last_modified {
                return Err(CrmError::invalid_payload(format!(
                    "createdAt {} is later than lastModified {}",
                    created_at.to_rfc3339(),
                    last_modified.to_rfc3339()
                )));
            }
        }

        Ok(())
    }

    /// Overlays the patch onto a freshly generated contact.
    ///
    /// The contact id is left untouched. If only `lastModified` is overridden
    /// the generated `createdAt` is pulled back so it never lands after it.
    pub fn apply(self, contact: &mut Contact) {
        if let Some(v) = self.first_name {
            contact.first_name = v;
        }
        if let Some(v) = self.last_name {
            contact.last_name = v;
        }
        if let Some(v) = self.email {
            contact.email = v;
        }
        if let Some(v) = self.phone {
            contact.phone = v;
        }
        if let Some(v) = self.company {
            contact.company = v;
        }
        if let Some(v) = self.job_title {
            contact.job_title = v;
        }
        if let Some(v) = self.tags {
            contact.tags = v;
        }
        if let Some(v) = self.source {
            contact.source = v;
        }
        if let Some(v) = self.lead_score {
            contact.lead_score = v;
        }
        if let Some(v) = self.notes {
            contact.notes = v;
        }
        if let Some(v) = self.last_modified {
            contact.last_modified = v;
        }
        match self.created_at {
            Some(v) => contact.created_at = v,
            None => contact.created_at = contact.created_at.min(contact.last_modified),
        }
    }
}

/// Checks that a tag list has 1 to 3 entries and no duplicates.
pub fn validate_tags(tags: &[Tag]) -> CrmResult<()> {
    if tags.is_empty() || tags.len() > MAX_TAGS {
        return Err(CrmError::invalid_payload(format!(
            "tags must contain 1 to {} values, got {}",
            MAX_TAGS,
            tags.len()
        )));
    }
    for (i, tag) in tags.iter().enumerate() {
        if tags[..i].contains(tag) {
            return Err(CrmError::invalid_payload(format!("duplicate tag '{}'", tag)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn sample_contact() -> Contact {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        Contact {
            id: "mock_crm_1001".into(),
            first_name: "Camille".into(),
            last_name: "MARTIN".into(),
            email: "camille.martin@orange.fr".into(),
            phone: "+33612345678".into(),
            company: "TechCorp".into(),
            job_title: "Product Owner".into(),
            tags: vec![Tag::Lead],
            created_at: now - Duration::days(3),
            last_modified: now,
            source: "website_form".into(),
            lead_score: 42,
            notes: "Rencontré au salon.".into(),
        }
    }

    #[test]
    fn contact_serializes_camel_case() {
        let json = serde_json::to_value(sample_contact()).unwrap();
        assert_eq!(json["firstName"], "Camille");
        assert_eq!(json["jobTitle"], "Product Owner");
        assert_eq!(json["leadScore"], 42);
        assert_eq!(json["tags"], serde_json::json!(["lead"]));
        assert!(json["createdAt"].is_string());
        assert!(json["lastModified"].is_string());
    }

    #[test]
    fn patch_drops_id() {
        let patch: ContactPatch =
            serde_json::from_str(r#"{"firstName":"Alice","id":"should-be-ignored"}"#).unwrap();
        assert_eq!(patch.first_name.as_deref(), Some("Alice"));

        let mut contact = sample_contact();
        patch.apply(&mut contact);
        assert_eq!(contact.first_name, "Alice");
        assert_eq!(contact.id, "mock_crm_1001");
    }

    #[test]
    fn empty_patch() {
        let patch: ContactPatch = serde_json::from_str("{}").unwrap();
        assert!(patch.is_empty());
        let mut contact = sample_contact();
        let before = contact.clone();
        patch.apply(&mut contact);
        assert_eq!(contact, before);
    }

    #[test]
    fn lead_score_out_of_range() {
        let now = Utc::now();
        let patch = ContactPatch {
            lead_score: Some(101),
            ..Default::default()
        };
        assert!(matches!(
            patch.validate(now),
            Err(CrmError::InvalidPayload { .. })
        ));

        let patch = ContactPatch {
            lead_score: Some(10),
            ..Default::default()
        };
        assert!(patch.validate(now).is_ok());
    }

    #[test]
    fn tag_rules() {
        assert!(validate_tags(&[Tag::Client]).is_ok());
        assert!(validate_tags(&[Tag::Client, Tag::Lead, Tag::Premium]).is_ok());
        assert!(validate_tags(&[]).is_err());
        assert!(validate_tags(&[Tag::Client, Tag::Client]).is_err());
        assert!(validate_tags(&[Tag::Client, Tag::Lead, Tag::Premium, Tag::Startup]).is_err());
    }

    #[test]
    fn unknown_tag_is_rejected_by_serde() {
        let result: Result<ContactPatch, _> = serde_json::from_str(r#"{"tags":["vip"]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn created_after_modified_is_rejected() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        let patch = ContactPatch {
            created_at: Some(now + Duration::hours(1)),
            ..Default::default()
        };
        assert!(patch.validate(now).is_err());

        let patch = ContactPatch {
            created_at: Some(now + Duration::hours(1)),
            last_modified: Some(now + Duration::hours(2)),
            ..Default::default()
        };
        assert!(patch.validate(now).is_ok());
    }

    #[test]
    fn earlier_last_modified_pulls_created_at_back() {
        let mut contact = sample_contact();
        let earlier = contact.created_at - Duration::days(10);
        let patch = ContactPatch {
            last_modified: Some(earlier),
            ..Default::default()
        };
        patch.apply(&mut contact);
        assert_eq!(contact.last_modified, earlier);
        assert!(contact.created_at <= contact.last_modified);
    }
}
