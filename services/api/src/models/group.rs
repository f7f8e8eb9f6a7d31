//! Group and membership models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Group entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub avatar_url: Option<String>,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Membership fact row linking a user to a group
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GroupMember {
    pub id: Uuid,
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub joined_at: DateTime<Utc>,
}

/// Group creation payload
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGroup {
    pub name: String,
    pub description: Option<String>,
    pub avatar_url: Option<String>,
}

/// Group update payload; absent fields are left untouched
///
/// `description` and `avatar_url` are doubly optional so an explicit
/// `null` (clear the field) is distinguishable from an absent key.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateGroup {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "clearable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "clearable")]
    pub avatar_url: Option<Option<String>>,
}

fn clearable<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_group_absent_fields_stay_unset() {
        let update: UpdateGroup = serde_json::from_str(r#"{"name": "Hikers"}"#).unwrap();
        assert_eq!(update.name.as_deref(), Some("Hikers"));
        assert_eq!(update.description, None);
        assert_eq!(update.avatar_url, None);
    }

    #[test]
    fn test_update_group_null_clears_field() {
        let update: UpdateGroup =
            serde_json::from_str(r#"{"description": null, "avatar_url": null}"#).unwrap();
        assert_eq!(update.description, Some(None));
        assert_eq!(update.avatar_url, Some(None));
    }

    #[test]
    fn test_update_group_value_sets_field() {
        let update: UpdateGroup =
            serde_json::from_str(r#"{"description": "Weekend hikes"}"#).unwrap();
        assert_eq!(update.description, Some(Some("Weekend hikes".to_string())));
        assert_eq!(update.avatar_url, None);
    }
}
