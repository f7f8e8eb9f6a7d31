//! Repositories for database operations

pub mod events;
pub mod groups;
pub mod rsvps;
pub mod users;

pub use events::EventRepository;
pub use groups::GroupRepository;
pub use rsvps::RsvpRepository;
pub use users::UserRepository;

// Database round-trip tests; skipped unless TEST_DATABASE_URL is set.
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::models::{CreateEvent, CreateGroup, NewUser, RsvpStatus, UpdateGroup};
    use crate::validation::{EventUpdate, parse_event_update};
    use chrono::{Duration, Utc};
    use serde_json::json;
    use sqlx::PgPool;
    use uuid::Uuid;

    async fn test_pool() -> Option<PgPool> {
        let url = std::env::var("TEST_DATABASE_URL").ok()?;
        let pool = PgPool::connect(&url).await.expect("connect test database");
        common::database::MIGRATOR
            .run(&pool)
            .await
            .expect("run migrations");
        Some(pool)
    }

    async fn register(pool: &PgPool, tag: &str) -> crate::models::User {
        UserRepository::new(pool.clone())
            .create(&NewUser {
                name: format!("User {}", tag),
                email: format!("{}-{}@example.com", tag, Uuid::new_v4()),
                password: "correct-horse".to_string(),
            })
            .await
            .expect("create user")
    }

    fn sample_event(title: &str) -> CreateEvent {
        CreateEvent {
            title: title.to_string(),
            description: Some("A meetup".to_string()),
            date: Utc::now().date_naive() + Duration::days(7),
            time: "18:30:00".to_string(),
            location: "San Francisco Public Library".to_string(),
            category: Some("tech".to_string()),
        }
    }

    #[tokio::test]
    async fn test_duplicate_group_name_conflicts() {
        let Some(pool) = test_pool().await else { return };
        let groups = GroupRepository::new(pool.clone());
        let owner = register(&pool, "owner").await;

        let name = format!("rustaceans-{}", Uuid::new_v4());
        let group = groups
            .create(
                owner.id,
                &CreateGroup {
                    name: name.clone(),
                    description: None,
                    avatar_url: None,
                },
            )
            .await
            .expect("create group");

        // Owner is auto-enrolled.
        let members = groups.members(group.id).await.expect("members");
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].id, owner.id);

        let err = groups
            .create(
                owner.id,
                &CreateGroup {
                    name,
                    description: None,
                    avatar_url: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_join_group_is_idempotent() {
        let Some(pool) = test_pool().await else { return };
        let groups = GroupRepository::new(pool.clone());
        let owner = register(&pool, "owner").await;
        let joiner = register(&pool, "joiner").await;

        let group = groups
            .create(
                owner.id,
                &CreateGroup {
                    name: format!("hikers-{}", Uuid::new_v4()),
                    description: None,
                    avatar_url: None,
                },
            )
            .await
            .expect("create group");

        let first = groups.join(group.id, joiner.id).await.expect("join");
        let second = groups.join(group.id, joiner.id).await.expect("re-join");
        assert_eq!(first.id, second.id);

        let members = groups.members(group.id).await.expect("members");
        assert_eq!(members.len(), 2);
    }

    #[tokio::test]
    async fn test_group_update_clears_description() {
        let Some(pool) = test_pool().await else { return };
        let groups = GroupRepository::new(pool.clone());
        let owner = register(&pool, "owner").await;

        let group = groups
            .create(
                owner.id,
                &CreateGroup {
                    name: format!("climbers-{}", Uuid::new_v4()),
                    description: Some("Indoor bouldering".to_string()),
                    avatar_url: Some("https://example.com/wall.png".to_string()),
                },
            )
            .await
            .expect("create group");

        // Absent fields keep their stored values.
        let updated = groups
            .update(
                group.id,
                owner.id,
                &UpdateGroup {
                    name: Some("Climbers".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("rename");
        assert_eq!(updated.name, "Climbers");
        assert_eq!(updated.description.as_deref(), Some("Indoor bouldering"));

        // An explicit null clears the column.
        let cleared = groups
            .update(
                group.id,
                owner.id,
                &UpdateGroup {
                    description: Some(None),
                    ..Default::default()
                },
            )
            .await
            .expect("clear description");
        assert_eq!(cleared.description, None);
        assert_eq!(
            cleared.avatar_url.as_deref(),
            Some("https://example.com/wall.png")
        );
    }

    #[tokio::test]
    async fn test_rsvp_upsert_keeps_single_row() {
        let Some(pool) = test_pool().await else { return };
        let events = EventRepository::new(pool.clone());
        let rsvps = RsvpRepository::new(pool.clone());
        let organizer = register(&pool, "organizer").await;
        let attendee = register(&pool, "attendee").await;

        let event = events
            .create(organizer.id, &sample_event("RSVP upsert"))
            .await
            .expect("create event");

        rsvps
            .set_status(attendee.id, event.id, RsvpStatus::Yes)
            .await
            .expect("first rsvp");
        let second = rsvps
            .set_status(attendee.id, event.id, RsvpStatus::Maybe)
            .await
            .expect("second rsvp");
        assert_eq!(second.status, RsvpStatus::Maybe);

        let counts = rsvps.counts_by_status(event.id).await.expect("counts");
        assert_eq!(counts.yes, 0);
        assert_eq!(counts.maybe, 1);

        rsvps.clear(attendee.id, event.id).await.expect("clear");
        let err = rsvps.clear(attendee.id, event.id).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_title_only_update_leaves_rest_unchanged() {
        let Some(pool) = test_pool().await else { return };
        let events = EventRepository::new(pool.clone());
        let organizer = register(&pool, "organizer").await;
        let stranger = register(&pool, "stranger").await;

        let event = events
            .create(organizer.id, &sample_event("Original title"))
            .await
            .expect("create event");

        // Non-organizer is rejected before anything changes.
        let update = parse_event_update(
            json!({"title": "Hijacked"}).as_object().unwrap(),
            Utc::now().date_naive(),
        )
        .unwrap();
        let err = events
            .apply_update(event.id, stranger.id, &update)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden));

        let update = EventUpdate {
            title: Some("New Title".to_string()),
            ..Default::default()
        };
        let updated = events
            .apply_update(event.id, organizer.id, &update)
            .await
            .expect("update");

        assert_eq!(updated.title, "New Title");
        assert_eq!(updated.description, event.description);
        assert_eq!(updated.location, event.location);
        assert_eq!(updated.date, event.date);
        assert_eq!(updated.time, event.time);
    }

    #[tokio::test]
    async fn test_city_filter_matches_substring() {
        let Some(pool) = test_pool().await else { return };
        let events = EventRepository::new(pool.clone());
        let organizer = register(&pool, "organizer").await;

        let marker = format!("Filterville-{}", Uuid::new_v4());
        let mut event = sample_event("Filtered event");
        event.location = format!("Community Hall, {}", marker);
        events
            .create(organizer.id, &event)
            .await
            .expect("create event");

        let found = events
            .list(Some(&marker.to_lowercase()), None, None, None)
            .await
            .expect("list");
        assert_eq!(found.len(), 1);
        assert!(found[0].location.contains(&marker));
        assert_eq!(found[0].organizer.id, organizer.id);
        assert_eq!(found[0].rsvp_count, 0);
    }
}
