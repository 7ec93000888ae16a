use anyhow::Result;
use chrono::{DateTime, TimeZone};
use sqlx::Row;

use crate::domain::models::{to_stored_timestamp, NewCareEvent, StoredCareEvent};
use crate::storage::connection::DbConnection;

/// Repository for the `completed_items` table
#[derive(Clone)]
pub struct CareEventRepository {
    db: DbConnection,
}

impl CareEventRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Insert an event and return the row as stored
    pub async fn insert(&self, event: &NewCareEvent) -> Result<StoredCareEvent> {
        let completed_time = to_stored_timestamp(&event.occurred_at);

        let result = sqlx::query(
            r#"
            INSERT INTO completed_items (item, description, completed_time)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(event.category.label())
        .bind(&event.detail)
        .bind(&completed_time)
        .execute(self.db.pool())
        .await?;

        Ok(StoredCareEvent {
            id: result.last_insert_rowid(),
            item: event.category.label().to_string(),
            description: event.detail.clone(),
            completed_time,
        })
    }

    /// All events at or after `since`, newest first
    pub async fn list_since<Tz: TimeZone>(&self, since: &DateTime<Tz>) -> Result<Vec<StoredCareEvent>> {
        let rows = sqlx::query(
            r#"
            SELECT id, item, description, completed_time
            FROM completed_items
            WHERE completed_time >= ?
            ORDER BY completed_time DESC, id DESC
            "#,
        )
        .bind(to_stored_timestamp(since))
        .fetch_all(self.db.pool())
        .await?;

        let events = rows
            .iter()
            .map(|row| StoredCareEvent {
                id: row.get("id"),
                item: row.get("item"),
                description: row.get("description"),
                completed_time: row.get("completed_time"),
            })
            .collect();

        Ok(events)
    }

    /// Delete an event by id.
    /// Returns true if a row was removed, false if the id did not exist
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM completed_items WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::EventCategory;
    use chrono::Utc;

    async fn setup_test() -> CareEventRepository {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        CareEventRepository::new(db)
    }

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap().with_timezone(&Utc)
    }

    fn new_event(category: EventCategory, detail: &str, occurred_at: &str) -> NewCareEvent {
        NewCareEvent {
            category,
            detail: detail.to_string(),
            occurred_at: at(occurred_at),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_ids_and_normalizes_time() {
        let repo = setup_test().await;

        let first = repo
            .insert(&new_event(EventCategory::Feeding, "300 ml", "2024-06-04T10:15:00+08:00"))
            .await
            .expect("Failed to insert event");
        let second = repo
            .insert(&new_event(EventCategory::WetDiaper, "", "2024-06-04T11:00:00+08:00"))
            .await
            .expect("Failed to insert event");

        assert!(second.id > first.id);
        assert_eq!(first.item, "feeding");
        assert_eq!(first.completed_time, "2024-06-04T02:15:00Z");
    }

    #[tokio::test]
    async fn test_list_since_filters_and_orders_newest_first() {
        let repo = setup_test().await;
        for (detail, time) in [
            ("old", "2024-06-01T09:00:00Z"),
            ("boundary", "2024-06-03T00:00:00Z"),
            ("late", "2024-06-04T20:00:00Z"),
            ("early", "2024-06-04T01:00:00Z"),
        ] {
            repo.insert(&new_event(EventCategory::BowelMovement, detail, time))
                .await
                .expect("Failed to insert event");
        }

        let events = repo
            .list_since(&at("2024-06-03T00:00:00Z"))
            .await
            .expect("Failed to list events");

        let details: Vec<&str> = events.iter().map(|e| e.description.as_str()).collect();
        assert_eq!(details, vec!["late", "early", "boundary"]);
    }

    #[tokio::test]
    async fn test_list_since_compares_instants_across_offsets() {
        let repo = setup_test().await;
        repo.insert(&new_event(EventCategory::WetDiaper, "", "2024-06-04T07:00:00+08:00"))
            .await
            .unwrap();

        // The event is 2024-06-03T23:00Z
        let since = DateTime::parse_from_rfc3339("2024-06-03T18:30:00-05:00").unwrap();
        let events = repo.list_since(&since).await.unwrap();
        assert!(events.is_empty());

        let since = DateTime::parse_from_rfc3339("2024-06-03T18:00:00-05:00").unwrap();
        let events = repo.list_since(&since).await.unwrap();
        assert_eq!(events.len(), 1);
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = setup_test().await;
        let stored = repo
            .insert(&new_event(EventCategory::WetDiaper, "", "2024-06-04T10:00:00Z"))
            .await
            .unwrap();

        let deleted = repo.delete(stored.id).await.expect("Failed to delete event");
        assert!(deleted, "Event should have been deleted");

        let remaining = repo.list_since(&at("2000-01-01T00:00:00Z")).await.unwrap();
        assert!(remaining.is_empty());

        let deleted_again = repo.delete(stored.id).await.expect("Failed to re-delete event");
        assert!(!deleted_again, "Event should not exist to be deleted");
    }

    #[tokio::test]
    async fn test_rows_written_elsewhere_are_returned_verbatim() {
        let repo = setup_test().await;
        sqlx::query("INSERT INTO completed_items (item, description, completed_time) VALUES (?, ?, ?)")
            .bind("diaper")
            .bind("")
            .bind("2099-01-01 10:00")
            .execute(repo.db.pool())
            .await
            .unwrap();

        let events = repo.list_since(&at("2024-01-01T00:00:00Z")).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].completed_time, "2099-01-01 10:00");
    }
}
