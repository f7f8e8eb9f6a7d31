//! Input validation utilities
//!
//! Holds the registration field rules and the event partial-update
//! validator. The update validator works on the raw JSON object so that an
//! absent field (left untouched) is distinguishable from an explicit null.

use chrono::{DateTime, NaiveDate, NaiveTime};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

use crate::error::{ApiError, ApiResult};

/// Validate a display name
pub fn validate_name(name: &str) -> Result<(), String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Name is required".to_string());
    }

    if name.chars().count() > 100 {
        return Err("Name must be at most 100 characters long".to_string());
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.len() < 8 {
        return Err("Password must be at least 8 characters long".to_string());
    }

    if password.len() > 128 {
        return Err("Password must be at most 128 characters long".to_string());
    }

    Ok(())
}

/// Canonicalize a time-of-day value to "HH:MM:SS"
///
/// Accepts either the canonical "HH:MM:SS" form or an ISO-8601 timestamp,
/// from which the time-of-day component is extracted. Fractional seconds
/// are dropped.
pub fn canonicalize_time(value: &str) -> Result<String, String> {
    if let Ok(time) = NaiveTime::parse_from_str(value, "%H:%M:%S") {
        return Ok(time.format("%H:%M:%S").to_string());
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.time().format("%H:%M:%S").to_string());
    }

    Err("expected \"HH:MM:SS\" or an ISO-8601 timestamp".to_string())
}

/// Parse a calendar date in "YYYY-MM-DD" form
pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| "expected a calendar date in YYYY-MM-DD form".to_string())
}

/// Validated, canonicalized event partial update
///
/// `None` means the field was absent from the request and is left
/// untouched; the nested options carry an explicit set-to-null.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub location: Option<String>,
    pub category: Option<Option<String>>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
}

const MAX_TITLE_LEN: usize = 200;
const MAX_DESCRIPTION_LEN: usize = 2000;
const MAX_LOCATION_LEN: usize = 500;
const MAX_CATEGORY_LEN: usize = 100;

/// Validate an event partial update against today's date
///
/// Every supplied field is validated independently; the first failure
/// aborts the whole update and names the offending field. An empty field
/// set and unknown keys are both rejected.
pub fn parse_event_update(
    fields: &Map<String, Value>,
    today: NaiveDate,
) -> ApiResult<EventUpdate> {
    if fields.is_empty() {
        return Err(ApiError::validation("body", "no fields provided"));
    }

    let mut update = EventUpdate::default();

    for (key, value) in fields {
        match key.as_str() {
            "title" => {
                update.title = Some(required_text("title", value, MAX_TITLE_LEN)?);
            }
            "description" => {
                update.description =
                    Some(optional_text("description", value, MAX_DESCRIPTION_LEN)?);
            }
            "location" => {
                update.location = Some(required_text("location", value, MAX_LOCATION_LEN)?);
            }
            "category" => {
                update.category = Some(optional_text("category", value, MAX_CATEGORY_LEN)?);
            }
            "date" => {
                let raw = as_str("date", value)?;
                let date =
                    parse_date(raw).map_err(|message| ApiError::validation("date", message))?;
                if date < today {
                    return Err(ApiError::validation("date", "must not be in the past"));
                }
                update.date = Some(date);
            }
            "time" => {
                let raw = as_str("time", value)?;
                let time = canonicalize_time(raw)
                    .map_err(|message| ApiError::validation("time", message))?;
                update.time = Some(time);
            }
            other => {
                return Err(ApiError::validation(other, "unknown field"));
            }
        }
    }

    Ok(update)
}

fn as_str<'a>(field: &str, value: &'a Value) -> ApiResult<&'a str> {
    value
        .as_str()
        .ok_or_else(|| ApiError::validation(field, "must be a string"))
}

/// A field that must stay non-empty: string, trimmed, bounded length
fn required_text(field: &str, value: &Value, max_len: usize) -> ApiResult<String> {
    let trimmed = as_str(field, value)?.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation(field, "must not be empty"));
    }
    if trimmed.chars().count() > max_len {
        return Err(ApiError::validation(
            field,
            format!("must be at most {} characters long", max_len),
        ));
    }
    Ok(trimmed.to_string())
}

/// A clearable field: string or null, trimmed; empty trims to null
fn optional_text(field: &str, value: &Value, max_len: usize) -> ApiResult<Option<String>> {
    if value.is_null() {
        return Ok(None);
    }
    let trimmed = as_str(field, value)?.trim();
    if trimmed.chars().count() > max_len {
        return Err(ApiError::validation(
            field,
            format!("must be at most {} characters long", max_len),
        ));
    }
    if trimmed.is_empty() {
        return Ok(None);
    }
    Ok(Some(trimmed.to_string()))
}

/// Validate and canonicalize an event creation payload in place
pub fn validate_new_event(event: &mut crate::models::CreateEvent) -> ApiResult<()> {
    event.title = required_text("title", &Value::String(event.title.clone()), MAX_TITLE_LEN)?;
    event.location = required_text(
        "location",
        &Value::String(event.location.clone()),
        MAX_LOCATION_LEN,
    )?;

    if let Some(description) = event.description.take() {
        event.description = optional_text(
            "description",
            &Value::String(description),
            MAX_DESCRIPTION_LEN,
        )?;
    }
    if let Some(category) = event.category.take() {
        event.category = optional_text("category", &Value::String(category), MAX_CATEGORY_LEN)?;
    }

    event.time =
        canonicalize_time(&event.time).map_err(|message| ApiError::validation("time", message))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().expect("object literal").clone()
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    #[test]
    fn test_empty_update_rejected() {
        let err = parse_event_update(&Map::new(), today()).unwrap_err();
        match err {
            ApiError::Validation { field, message } => {
                assert_eq!(field, "body");
                assert_eq!(message, "no fields provided");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_title_is_trimmed() {
        let update =
            parse_event_update(&fields(json!({"title": "  Rust Meetup  "})), today()).unwrap();
        assert_eq!(update.title.as_deref(), Some("Rust Meetup"));
        assert!(update.description.is_none());
        assert!(update.location.is_none());
    }

    #[test]
    fn test_empty_title_rejected() {
        let err = parse_event_update(&fields(json!({"title": "   "})), today()).unwrap_err();
        match err {
            ApiError::Validation { field, .. } => assert_eq!(field, "title"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_title_length_limit() {
        let long = "x".repeat(201);
        assert!(parse_event_update(&fields(json!({"title": long})), today()).is_err());

        let max = "x".repeat(200);
        assert!(parse_event_update(&fields(json!({"title": max})), today()).is_ok());
    }

    #[test]
    fn test_description_null_clears() {
        let update =
            parse_event_update(&fields(json!({"description": null})), today()).unwrap();
        assert_eq!(update.description, Some(None));

        let update =
            parse_event_update(&fields(json!({"description": "  details "})), today()).unwrap();
        assert_eq!(update.description, Some(Some("details".to_string())));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = parse_event_update(
            &fields(json!({"title": "ok", "organizer_id": "someone-else"})),
            today(),
        )
        .unwrap_err();
        match err {
            ApiError::Validation { field, .. } => assert_eq!(field, "organizer_id"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_string_title_rejected() {
        assert!(parse_event_update(&fields(json!({"title": 42})), today()).is_err());
    }

    #[test]
    fn test_date_boundary() {
        let today = today();
        let yesterday = today - Duration::days(1);
        let tomorrow = today + Duration::days(1);

        let err = parse_event_update(
            &fields(json!({"date": yesterday.format("%Y-%m-%d").to_string()})),
            today,
        )
        .unwrap_err();
        match err {
            ApiError::Validation { field, .. } => assert_eq!(field, "date"),
            other => panic!("expected validation error, got {:?}", other),
        }

        let update = parse_event_update(
            &fields(json!({"date": today.format("%Y-%m-%d").to_string()})),
            today,
        )
        .unwrap();
        assert_eq!(update.date, Some(today));

        let update = parse_event_update(
            &fields(json!({"date": tomorrow.format("%Y-%m-%d").to_string()})),
            today,
        )
        .unwrap();
        assert_eq!(update.date, Some(tomorrow));
    }

    #[test]
    fn test_malformed_date_rejected() {
        assert!(parse_event_update(&fields(json!({"date": "09/08/2025"})), today()).is_err());
        assert!(parse_event_update(&fields(json!({"date": "not-a-date"})), today()).is_err());
    }

    #[test]
    fn test_time_canonicalization() {
        assert_eq!(
            canonicalize_time("2025-09-08T02:01:44.542Z").unwrap(),
            "02:01:44"
        );
        assert_eq!(canonicalize_time("02:01:44").unwrap(), "02:01:44");
        assert!(canonicalize_time("2 o'clock").is_err());
        assert!(canonicalize_time("25:00:00").is_err());
    }

    #[test]
    fn test_time_field_canonicalized_in_update() {
        let update = parse_event_update(
            &fields(json!({"time": "2025-09-08T02:01:44.542Z"})),
            today(),
        )
        .unwrap();
        assert_eq!(update.time.as_deref(), Some("02:01:44"));
    }

    #[test]
    fn test_failing_field_aborts_whole_update() {
        // A valid title alongside a bad date must not produce a partial result.
        let err = parse_event_update(
            &fields(json!({"title": "Valid", "date": "garbage"})),
            today(),
        )
        .unwrap_err();
        match err {
            ApiError::Validation { field, .. } => assert_eq!(field, "date"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_new_event() {
        let mut event = crate::models::CreateEvent {
            title: "  Launch party  ".to_string(),
            description: Some("   ".to_string()),
            date: today(),
            time: "2025-09-08T18:30:00Z".to_string(),
            location: " HQ ".to_string(),
            category: Some(" social ".to_string()),
        };

        validate_new_event(&mut event).unwrap();
        assert_eq!(event.title, "Launch party");
        assert_eq!(event.description, None);
        assert_eq!(event.location, "HQ");
        assert_eq!(event.category.as_deref(), Some("social"));
        assert_eq!(event.time, "18:30:00");
    }

    #[test]
    fn test_registration_field_rules() {
        assert!(validate_name("Ada Lovelace").is_ok());
        assert!(validate_name("   ").is_err());

        assert!(validate_email("ada@example.com").is_ok());
        assert!(validate_email("not-an-email").is_err());

        assert!(validate_password("longenough").is_ok());
        assert!(validate_password("short").is_err());
    }
}
