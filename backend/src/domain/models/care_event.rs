use chrono::{DateTime, FixedOffset, SecondsFormat, TimeZone, Utc};
use std::fmt;

use crate::error::DomainError;

/// Kind of care event, as far as the daily counters are concerned
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventCategory {
    /// Detail carries a volume such as "300 ml"
    Feeding,
    WetDiaper,
    BowelMovement,
    /// Any label we do not count; kept verbatim so it round-trips through the store
    Other(String),
}

impl EventCategory {
    /// Map a stored or submitted label onto a category.
    ///
    /// The labels written by the original web client are accepted as aliases.
    pub fn from_label(label: &str) -> Self {
        match label {
            "feeding" | "喂奶" => Self::Feeding,
            "diaper" | "尿布湿" => Self::WetDiaper,
            "poop" | "大便" => Self::BowelMovement,
            other => Self::Other(other.to_string()),
        }
    }

    /// Canonical label persisted for this category
    pub fn label(&self) -> &str {
        match self {
            Self::Feeding => "feeding",
            Self::WetDiaper => "diaper",
            Self::BowelMovement => "poop",
            Self::Other(label) => label,
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A care event with its timestamp decoded
#[derive(Debug, Clone, PartialEq)]
pub struct CareEvent {
    pub id: i64,
    pub category: EventCategory,
    pub detail: String,
    pub occurred_at: DateTime<FixedOffset>,
}

/// A row exactly as it sits in the `completed_items` table.
///
/// `completed_time` is text and is only trusted after [`StoredCareEvent::into_event`].
#[derive(Debug, Clone, PartialEq)]
pub struct StoredCareEvent {
    pub id: i64,
    pub item: String,
    pub description: String,
    pub completed_time: String,
}

impl StoredCareEvent {
    pub fn into_event(self) -> Result<CareEvent, DomainError> {
        let occurred_at = DateTime::parse_from_rfc3339(&self.completed_time).map_err(|source| {
            DomainError::InvalidTimestamp {
                value: self.completed_time.clone(),
                source,
            }
        })?;

        Ok(CareEvent {
            id: self.id,
            category: EventCategory::from_label(&self.item),
            detail: self.description,
            occurred_at,
        })
    }
}

/// An event about to be inserted; the store assigns the id
#[derive(Debug, Clone, PartialEq)]
pub struct NewCareEvent {
    pub category: EventCategory,
    pub detail: String,
    pub occurred_at: DateTime<Utc>,
}

/// Storage representation of an instant: RFC 3339 in UTC at second precision.
///
/// A fixed width and a single zone make string order equal time order, which
/// the window query relies on.
pub fn to_stored_timestamp<Tz: TimeZone>(instant: &DateTime<Tz>) -> String {
    instant
        .with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}
