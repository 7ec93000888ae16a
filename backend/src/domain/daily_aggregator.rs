//! Per-day aggregation of care events for the trend charts.
//!
//! Events are bucketed by their calendar date in the aggregator's time zone
//! and reduced to three counters per day: feeding volume, wet diapers and
//! bowel movements. Bad data never fails the aggregation. A row whose
//! timestamp does not parse is dropped entirely, and a feeding whose volume
//! does not parse adds nothing, while the rest of the window is still counted.

use chrono::{NaiveDate, TimeZone};
use shared::DailySummaryResponse;
use std::collections::BTreeMap;
use std::num::ParseIntError;
use tracing::{debug, warn};

use crate::domain::models::{CareEvent, EventCategory, StoredCareEvent};

/// Unit suffix on a feeding's detail, e.g. "300 ml"
pub const VOLUME_UNIT_SUFFIX: &str = " ml";

/// One calendar day's counters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub feeding_volume_ml: i64,
    pub diaper_count: i64,
    pub bowel_count: i64,
}

impl DayBucket {
    fn new(date: NaiveDate) -> Self {
        Self {
            date,
            feeding_volume_ml: 0,
            diaper_count: 0,
            bowel_count: 0,
        }
    }

    /// "MM/DD" label for this day
    pub fn label(&self) -> String {
        day_label(self.date)
    }

    fn record(&mut self, event: &CareEvent) {
        match &event.category {
            EventCategory::Feeding => match parse_volume_ml(&event.detail) {
                Ok(volume) => self.feeding_volume_ml += i64::from(volume),
                Err(e) => warn!(
                    event_id = event.id,
                    detail = %event.detail,
                    "Skipping feeding volume that does not parse: {}", e
                ),
            },
            EventCategory::WetDiaper => self.diaper_count += 1,
            EventCategory::BowelMovement => self.bowel_count += 1,
            EventCategory::Other(label) => {
                debug!(event_id = event.id, category = %label, "Category is not counted");
            }
        }
    }
}

/// Day buckets in chronological order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailySummary {
    buckets: Vec<DayBucket>,
}

impl DailySummary {
    pub fn buckets(&self) -> &[DayBucket] {
        &self.buckets
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Day labels oldest first, each listed once
    pub fn labels(&self) -> Vec<String> {
        self.to_response().labels
    }

    /// Label-keyed view served to the charts.
    ///
    /// Should a summary span more than a year, two dates can share a label;
    /// the label then keeps its earliest position and its values are summed.
    pub fn to_response(&self) -> DailySummaryResponse {
        let mut response = DailySummaryResponse::default();

        for bucket in &self.buckets {
            let label = bucket.label();
            if !response.milk.contains_key(&label) {
                response.labels.push(label.clone());
            }
            *response.milk.entry(label.clone()).or_insert(0) += bucket.feeding_volume_ml;
            *response.diapers.entry(label.clone()).or_insert(0) += bucket.diaper_count;
            *response.poops.entry(label).or_insert(0) += bucket.bowel_count;
        }

        response
    }
}

/// Groups events into calendar days of a fixed time zone
#[derive(Debug, Clone)]
pub struct DailyAggregator<Tz: TimeZone> {
    tz: Tz,
}

impl<Tz: TimeZone> DailyAggregator<Tz> {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Aggregate rows straight from the store, dropping those with unreadable timestamps
    pub fn aggregate<I>(&self, rows: I) -> DailySummary
    where
        I: IntoIterator<Item = StoredCareEvent>,
    {
        let events: Vec<CareEvent> = rows
            .into_iter()
            .filter_map(|row| {
                let id = row.id;
                match row.into_event() {
                    Ok(event) => Some(event),
                    Err(e) => {
                        warn!(event_id = id, "Excluding event from daily totals: {}", e);
                        None
                    }
                }
            })
            .collect();

        self.aggregate_events(&events)
    }

    pub fn aggregate_events<'a, I>(&self, events: I) -> DailySummary
    where
        I: IntoIterator<Item = &'a CareEvent>,
    {
        let mut by_day: BTreeMap<NaiveDate, DayBucket> = BTreeMap::new();

        for event in events {
            let date = event.occurred_at.with_timezone(&self.tz).date_naive();
            by_day
                .entry(date)
                .or_insert_with(|| DayBucket::new(date))
                .record(event);
        }

        DailySummary {
            buckets: by_day.into_values().collect(),
        }
    }
}

/// Zero-padded "MM/DD"
pub fn day_label(date: NaiveDate) -> String {
    date.format("%m/%d").to_string()
}

/// Volume of a feeding, from detail text such as "300 ml"
pub fn parse_volume_ml(detail: &str) -> Result<u32, ParseIntError> {
    detail
        .strip_suffix(VOLUME_UNIT_SUFFIX)
        .unwrap_or(detail)
        .parse::<u32>()
}
