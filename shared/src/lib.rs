use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A logged care event as it travels over the wire.
///
/// Field names follow the web client: `item` is the event category label,
/// `description` the free-text detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedItem {
    /// Store-assigned identifier
    pub id: i64,
    /// Category label (e.g. "feeding", "diaper", "poop")
    pub item: String,
    /// Free-text detail; for feedings a volume such as "300 ml"
    pub description: String,
    /// "HH:MM" in the today list, RFC 3339 when echoing a created record
    pub completed_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCompletedItemRequest {
    pub item: String,
    #[serde(default)]
    pub description: String,
    /// Optional timestamp override - uses the current minute if not provided.
    /// Accepts RFC 3339 or "YYYY-MM-DD HH:MM" in service-local time.
    #[serde(default)]
    pub completed_time: Option<String>,
}

/// Per-day aggregation served to the trend charts.
///
/// `labels` is ordered oldest day first; every label has an entry in each
/// of the three mappings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailySummaryResponse {
    pub labels: Vec<String>,
    /// Feeding volume in millilitres per day label
    pub milk: BTreeMap<String, i64>,
    /// Wet diaper count per day label
    pub diapers: BTreeMap<String, i64>,
    /// Bowel movement count per day label
    pub poops: BTreeMap<String, i64>,
}

impl DailySummaryResponse {
    /// Project one mapping through the label order, yielding a parallel array
    pub fn series(&self, mapping: &BTreeMap<String, i64>) -> Vec<i64> {
        self.labels
            .iter()
            .map(|label| mapping.get(label).copied().unwrap_or(0))
            .collect()
    }
}
