use chrono::{DateTime, NaiveDateTime, TimeZone, Timelike, Utc};
use shared::{CompletedItem, CreateCompletedItemRequest};
use std::fmt::Display;
use tracing::info;

use crate::domain::daily_aggregator::{DailyAggregator, DailySummary};
use crate::domain::models::{EventCategory, NewCareEvent, StoredCareEvent};
use crate::domain::time_window::{display_time, TimeWindow};
use crate::error::DomainError;
use crate::storage::{CareEventRepository, DbConnection};

/// Local timestamp formats the web client submits, besides RFC 3339
const LOCAL_INPUT_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Entry point for every care log operation.
///
/// Each call takes `now` explicitly; its time zone is the one days are
/// counted in.
#[derive(Clone)]
pub struct CareLogService {
    repository: CareEventRepository,
}

impl CareLogService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            repository: CareEventRepository::new(db),
        }
    }

    /// Store a new event, defaulting its time to the current minute
    pub async fn record_event<Tz>(
        &self,
        request: CreateCompletedItemRequest,
        now: &DateTime<Tz>,
    ) -> Result<CompletedItem, DomainError>
    where
        Tz: TimeZone,
    {
        let occurred_at = match request.completed_time.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => parse_client_time(raw, &now.timezone())?,
            _ => truncate_to_minute(now),
        };

        let event = NewCareEvent {
            category: EventCategory::from_label(&request.item),
            detail: request.description,
            occurred_at: occurred_at.with_timezone(&Utc),
        };

        let stored = self.repository.insert(&event).await?;
        info!(event_id = stored.id, category = %event.category, "Recorded care event");

        Ok(to_completed_item(stored))
    }

    /// Today's events with their time reduced to "HH:MM", latest first.
    ///
    /// Unlike the daily summary, a stored timestamp that does not parse fails
    /// the whole listing.
    pub async fn list_today<Tz>(&self, now: &DateTime<Tz>) -> Result<Vec<CompletedItem>, DomainError>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let tz = now.timezone();
        let since = TimeWindow::Today.window_start(now)?;
        let rows = self.repository.list_since(&since).await?;

        let mut items = rows
            .into_iter()
            .map(|row| -> Result<CompletedItem, DomainError> {
                let event = row.into_event()?;
                Ok(CompletedItem {
                    id: event.id,
                    item: event.category.label().to_string(),
                    completed_time: display_time(&event.occurred_at.with_timezone(&tz)),
                    description: event.detail,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        items.sort_by(|a, b| b.completed_time.cmp(&a.completed_time));
        Ok(items)
    }

    /// Per-day counters for every event in `window`
    pub async fn daily_summary<Tz>(
        &self,
        window: TimeWindow,
        now: &DateTime<Tz>,
    ) -> Result<DailySummary, DomainError>
    where
        Tz: TimeZone,
    {
        let since = window.window_start(now)?;
        let rows = self.repository.list_since(&since).await?;
        let row_count = rows.len();

        let summary = DailyAggregator::new(now.timezone()).aggregate(rows);
        info!(
            "Aggregated {} events into {} days for {:?}",
            row_count,
            summary.buckets().len(),
            window
        );
        Ok(summary)
    }

    /// Delete an event by id; returns whether it existed
    pub async fn delete_event(&self, id: i64) -> Result<bool, DomainError> {
        let deleted = self.repository.delete(id).await?;
        if deleted {
            info!(event_id = id, "Deleted care event");
        } else {
            info!(event_id = id, "Care event to delete was not found");
        }
        Ok(deleted)
    }
}

fn to_completed_item(stored: StoredCareEvent) -> CompletedItem {
    CompletedItem {
        id: stored.id,
        item: stored.item,
        description: stored.description,
        completed_time: stored.completed_time,
    }
}

fn truncate_to_minute<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Tz> {
    now.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or_else(|| now.clone())
}

/// Parse a client-supplied time: RFC 3339, or a local wall-clock time in `tz`
fn parse_client_time<Tz: TimeZone>(raw: &str, tz: &Tz) -> Result<DateTime<Tz>, DomainError> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(tz));
    }

    let naive = LOCAL_INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .ok_or_else(|| DomainError::InvalidInput(format!("invalid completed_time {:?}", raw)))?;

    tz.from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| DomainError::InvalidInput(format!("completed_time {:?} does not exist locally", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn tz() -> FixedOffset {
        FixedOffset::east_opt(8 * 3600).unwrap()
    }

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<FixedOffset> {
        tz().with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    async fn create_test_service() -> CareLogService {
        let db = DbConnection::init_test().await.expect("Failed to init test DB");
        CareLogService::new(db)
    }

    fn request(item: &str, description: &str, completed_time: Option<&str>) -> CreateCompletedItemRequest {
        CreateCompletedItemRequest {
            item: item.to_string(),
            description: description.to_string(),
            completed_time: completed_time.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_record_event_defaults_to_current_minute() {
        let service = create_test_service().await;
        let now = tz().with_ymd_and_hms(2024, 6, 4, 9, 41, 37).unwrap();

        let item = service
            .record_event(request("feeding", "300 ml", None), &now)
            .await
            .unwrap();

        assert_eq!(item.item, "feeding");
        assert_eq!(item.description, "300 ml");
        assert_eq!(item.completed_time, "2024-06-04T01:41:00Z");
    }

    #[tokio::test]
    async fn test_record_event_treats_blank_time_as_missing() {
        let service = create_test_service().await;
        let now = local(2024, 6, 4, 9, 41);

        let item = service
            .record_event(request("diaper", "", Some("  ")), &now)
            .await
            .unwrap();
        assert_eq!(item.completed_time, "2024-06-04T01:41:00Z");
    }

    #[tokio::test]
    async fn test_record_event_accepts_client_formats() {
        let service = create_test_service().await;
        let now = local(2024, 6, 4, 12, 0);

        let local_form = service
            .record_event(request("poop", "", Some("2024-06-03 22:10")), &now)
            .await
            .unwrap();
        assert_eq!(local_form.completed_time, "2024-06-03T14:10:00Z");

        let rfc3339 = service
            .record_event(request("poop", "", Some("2024-06-03T22:10:00-04:00")), &now)
            .await
            .unwrap();
        assert_eq!(rfc3339.completed_time, "2024-06-04T02:10:00Z");
    }

    #[tokio::test]
    async fn test_record_event_rejects_garbage_time() {
        let service = create_test_service().await;
        let result = service
            .record_event(request("poop", "", Some("yesterday")), &local(2024, 6, 4, 12, 0))
            .await;

        match result {
            Err(e @ DomainError::InvalidInput(_)) => assert!(e.is_client_error()),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_record_event_stores_canonical_label_for_alias() {
        let service = create_test_service().await;
        let item = service
            .record_event(request("尿布湿", "", None), &local(2024, 6, 4, 12, 0))
            .await
            .unwrap();
        assert_eq!(item.item, "diaper");
    }

    #[tokio::test]
    async fn test_list_today_only_returns_today_sorted_by_time() {
        let service = create_test_service().await;
        let now = local(2024, 6, 4, 23, 0);

        for (detail, time) in [
            ("yesterday", "2024-06-03 23:59"),
            ("morning", "2024-06-04 00:00"),
            ("evening", "2024-06-04 21:30"),
            ("noon", "2024-06-04 12:05"),
        ] {
            service
                .record_event(request("feeding", detail, Some(time)), &now)
                .await
                .unwrap();
        }

        let items = service.list_today(&now).await.unwrap();
        let seen: Vec<(&str, &str)> = items
            .iter()
            .map(|i| (i.description.as_str(), i.completed_time.as_str()))
            .collect();
        assert_eq!(
            seen,
            vec![("evening", "21:30"), ("noon", "12:05"), ("morning", "00:00")]
        );
    }

    #[tokio::test]
    async fn test_list_today_has_no_upper_bound() {
        let service = create_test_service().await;
        let now = local(2024, 6, 4, 12, 0);
        service
            .record_event(request("diaper", "", Some("2024-06-05 09:00")), &now)
            .await
            .unwrap();

        let items = service.list_today(&now).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].completed_time, "09:00");
    }

    #[tokio::test]
    async fn test_daily_summary_covers_inclusive_window() {
        let service = create_test_service().await;
        let now = local(2024, 6, 7, 8, 0);

        for (item, detail, time) in [
            ("diaper", "", "2024-05-31 23:00"),
            ("diaper", "", "2024-06-01 08:00"),
            ("feeding", "300 ml", "2024-06-07 06:00"),
            ("feeding", "450 ml", "2024-06-07 07:30"),
        ] {
            service
                .record_event(request(item, detail, Some(time)), &now)
                .await
                .unwrap();
        }

        let window = TimeWindow::last_days(7).unwrap();
        let response = service.daily_summary(window, &now).await.unwrap().to_response();

        assert_eq!(response.labels, vec!["06/01", "06/07"]);
        assert_eq!(response.diapers["06/01"], 1);
        assert_eq!(response.milk["06/07"], 750);
    }

    #[tokio::test]
    async fn test_delete_event_reports_existence() {
        let service = create_test_service().await;
        let now = local(2024, 6, 4, 12, 0);
        let item = service.record_event(request("diaper", "", None), &now).await.unwrap();

        assert!(service.delete_event(item.id).await.unwrap());
        assert!(!service.delete_event(item.id).await.unwrap());
        assert!(service.list_today(&now).await.unwrap().is_empty());
    }
}
