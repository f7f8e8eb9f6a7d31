//! RSVP model and status vocabulary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Per-user response to an event, exactly one row per (user, event)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rsvp {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub status: RsvpStatus,
    pub created_at: DateTime<Utc>,
}

/// RSVP status vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsvpStatus {
    Yes,
    No,
    Maybe,
}

impl RsvpStatus {
    pub const ALL: [RsvpStatus; 3] = [RsvpStatus::Yes, RsvpStatus::No, RsvpStatus::Maybe];

    pub fn as_str(&self) -> &'static str {
        match self {
            RsvpStatus::Yes => "yes",
            RsvpStatus::No => "no",
            RsvpStatus::Maybe => "maybe",
        }
    }
}

impl fmt::Display for RsvpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RsvpStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yes" => Ok(RsvpStatus::Yes),
            "no" => Ok(RsvpStatus::No),
            "maybe" => Ok(RsvpStatus::Maybe),
            other => Err(format!("unknown RSVP status: {}", other)),
        }
    }
}

/// Request body for setting an RSVP; omitted status defaults to "yes"
#[derive(Debug, Clone, Deserialize)]
pub struct RsvpRequest {
    #[serde(default = "default_status")]
    pub status: RsvpStatus,
}

fn default_status() -> RsvpStatus {
    RsvpStatus::Yes
}

/// Count of RSVPs per status for a single event
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct RsvpCounts {
    pub yes: i64,
    pub no: i64,
    pub maybe: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in RsvpStatus::ALL {
            assert_eq!(status.as_str().parse::<RsvpStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_legacy_vocabulary_rejected() {
        assert!("going".parse::<RsvpStatus>().is_err());
        assert!("interested".parse::<RsvpStatus>().is_err());
        assert!("not_going".parse::<RsvpStatus>().is_err());
    }

    #[test]
    fn test_request_defaults_to_yes() {
        let req: RsvpRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.status, RsvpStatus::Yes);

        let req: RsvpRequest = serde_json::from_str(r#"{"status":"maybe"}"#).unwrap();
        assert_eq!(req.status, RsvpStatus::Maybe);
    }

    #[test]
    fn test_request_rejects_unknown_status() {
        let result = serde_json::from_str::<RsvpRequest>(r#"{"status":"going"}"#);
        assert!(result.is_err());
    }
}
