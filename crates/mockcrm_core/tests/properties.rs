//! Property tests for the query engine and the create path.

use mockcrm_core::{parse_since, CrmError, ListQuery};
use mockcrm_testkit::prelude::*;
use proptest::prelude::*;

proptest! {
    #![proptest_config(PropTestConfig::quick().to_proptest_config())]

    #[test]
    fn pagination_matches_slice(query in list_query_strategy()) {
        let service = service_with(60, DEFAULT_TEST_SEED);
        let snapshot = service.snapshot();
        let page = service.list(&query).unwrap();

        let limit = page.pagination.limit;
        let offset = page.pagination.offset;
        prop_assert!(limit <= 100);
        prop_assert_eq!(offset as i64, query.offset.unwrap_or(0));
        prop_assert_eq!(page.pagination.total, 60);
        prop_assert_eq!(page.pagination.has_more, offset + limit < 60);

        let expected: Vec<_> = snapshot
            .iter()
            .skip(offset)
            .take(limit)
            .map(|c| c.id.clone())
            .collect();
        let actual: Vec<_> = page.contacts.iter().map(|c| c.id.clone()).collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn valid_patch_is_merged(patch in valid_patch_strategy()) {
        let service = service_with(1, DEFAULT_TEST_SEED);
        let contact = service.create(patch.clone()).unwrap();

        prop_assert_eq!(contact.id.as_str(), "mock_crm_1002");
        prop_assert!(contact.last_modified >= contact.created_at);
        if let Some(first_name) = &patch.first_name {
            prop_assert_eq!(&contact.first_name, first_name);
        }
        if let Some(tags) = &patch.tags {
            prop_assert_eq!(&contact.tags, tags);
        }
        if let Some(score) = patch.lead_score {
            prop_assert_eq!(contact.lead_score, score);
        }
        if let Some(created_at) = patch.created_at {
            prop_assert_eq!(contact.created_at, created_at);
        }
        prop_assert_eq!(service.len(), 2);
    }

    #[test]
    fn invalid_patch_changes_nothing(patch in invalid_patch_strategy()) {
        let service = service_with(1, DEFAULT_TEST_SEED);
        let err = service.create(patch).unwrap_err();

        let is_invalid_payload = matches!(err, CrmError::InvalidPayload { .. });
        prop_assert!(is_invalid_payload);
        prop_assert_eq!(service.len(), 1);
        prop_assert_eq!(service.last_id_counter(), 1001);
    }

    #[test]
    fn since_layouts_parse((text, at) in since_strategy()) {
        prop_assert_eq!(parse_since(&text).unwrap(), Some(at));
    }

    #[test]
    fn simulate_count_is_clamped(count in -50i64..80) {
        let service = service_with(0, DEFAULT_TEST_SEED);
        let created = service.simulate(Some(count)).contacts.len();
        prop_assert_eq!(created, count.clamp(0, 20) as usize);
        prop_assert_eq!(service.len(), created);
    }
}

#[test]
fn bad_since_is_rejected_without_side_effects() {
    with_service(|service| {
        let err = service
            .list(&ListQuery::new().with_since("not-a-date"))
            .unwrap_err();
        assert!(matches!(err, CrmError::InvalidSince { .. }));
        assert_eq!(service.len(), 50);
    });
}

#[test]
fn recent_batch_is_all_that_syncs() {
    let scenario = scenarios::recent_batch(6);
    let page = scenario
        .service
        .list(&ListQuery::new().with_since(scenario.marker.to_rfc3339()))
        .unwrap();

    assert_eq!(page.pagination.total, 6);
    assert_eq!(page.contacts, scenario.batch);
}

#[test]
fn concurrent_writers_keep_ids_unique() {
    let service = shared_service(DEFAULT_TEST_SEED);
    let config = StressConfig {
        operations: 50,
        threads: 8,
        ..Default::default()
    };

    let result = stress_concurrent_creates(std::sync::Arc::clone(&service), &config);
    assert_eq!(result.failed_ops, 0);
    assert_eq!(service.len(), 50 + 8 * 50);
    assert!(store_violations(&service).is_empty());
}
