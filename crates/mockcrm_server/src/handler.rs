//! Request handlers for the contact API.

use crate::error::ApiError;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use mockcrm_core::{
    parse_int_param, Contact, ContactPage, ContactPatch, CrmService, Health, ListQuery,
    SimulateResult, WebhookEcho,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// Service handle shared by all handlers.
pub type SharedService = Arc<CrmService>;

/// Raw query string as ordered key/value pairs.
///
/// Decoding into pairs never fails on repeated keys, so every query error is
/// reported through [`ApiError`].
pub type QueryPairs = Vec<(String, String)>;

/// Returns the first value given for `key`; later repeats are ignored.
fn first_value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.as_str())
}

/// GET /health
pub async fn health(State(service): State<SharedService>) -> Json<Health> {
    Json(service.health())
}

/// GET /api/contacts
pub async fn list_contacts(
    State(service): State<SharedService>,
    Query(params): Query<QueryPairs>,
) -> Result<Json<ContactPage>, ApiError> {
    let query = ListQuery::from_raw(
        first_value(&params, "limit"),
        first_value(&params, "offset"),
        first_value(&params, "since"),
    )?;
    Ok(Json(service.list(&query)?))
}

/// GET /api/contacts/:id
pub async fn get_contact(
    State(service): State<SharedService>,
    Path(id): Path<String>,
) -> Result<Json<Contact>, ApiError> {
    Ok(Json(service.get(&id)?))
}

/// POST /api/contacts
///
/// The body is optional; an empty body or `null` creates a fully generated
/// contact.
pub async fn create_contact(
    State(service): State<SharedService>,
    body: Bytes,
) -> Result<(StatusCode, Json<Contact>), ApiError> {
    let patch = parse_optional_json::<ContactPatch>(&body)?.unwrap_or_default();
    let contact = service.create(patch)?;
    Ok((StatusCode::CREATED, Json(contact)))
}

/// POST /api/contacts/simulate
pub async fn simulate_contacts(
    State(service): State<SharedService>,
    Query(params): Query<QueryPairs>,
) -> Result<Json<SimulateResult>, ApiError> {
    let count = parse_int_param("count", first_value(&params, "count"))?;
    Ok(Json(service.simulate(count)))
}

/// POST /webhook/test
pub async fn webhook_test(
    State(service): State<SharedService>,
    body: Bytes,
) -> Result<Json<WebhookEcho>, ApiError> {
    let payload = parse_optional_json::<Value>(&body)?;
    Ok(Json(service.echo(payload)))
}

/// Decodes a JSON body that may be absent.
///
/// Whitespace-only bodies decode to `None`; so does a literal `null`.
fn parse_optional_json<T>(body: &[u8]) -> Result<Option<T>, ApiError>
where
    T: for<'de> Deserialize<'de>,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    Ok(serde_json::from_slice::<Option<T>>(body)?)
}
