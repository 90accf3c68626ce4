use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An active alert as produced by an [`crate::source::AlertSource`],
/// already filtered and routed to its notification destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// Feed-provided unique key.
    pub id: String,
    /// Zone the alert was fetched for. `None` for injected test alerts.
    pub zone: Option<String>,
    /// Alert type name, e.g. "Tornado Warning".
    pub event: String,
    pub description: String,
    /// Resolved chat/channel id for outbound notifications.
    pub destination: String,
}

/// Persisted state unit: what was last sent for a given alert id.
///
/// Serde names match the on-disk state file written by earlier versions
/// (`chat_id`, capitalized `Description`), so existing state files keep
/// loading across upgrades.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedAlert {
    pub id: String,
    #[serde(rename = "chat_id")]
    pub destination: String,
    #[serde(rename = "Description")]
    pub description: String,
}

/// Result of diffing the current fetch against the previous snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// Alerts that are new or whose description changed, in fetch order.
    pub to_notify: Vec<Alert>,
    /// True when the current fetch is empty but prior state was not.
    pub all_clear: bool,
}

/// Structured event record forwarded to the logging sink and stored by
/// the dashboard's in-memory event log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub timestamp: DateTime<Utc>,
    /// Zone code, or "ALL" for an all-clear, or "DEV" for injected alerts.
    pub county: String,
    pub event: String,
    pub description: String,
}

/// Which timestamp pair of a feed feature bounds its active window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFields {
    Onset,
    Effective,
}

impl Default for TimeFields {
    fn default() -> Self {
        TimeFields::Onset
    }
}

impl TimeFields {
    /// Feed property names for the (start, end) pair.
    pub fn keys(self) -> (&'static str, &'static str) {
        match self {
            TimeFields::Onset => ("onset", "ends"),
            TimeFields::Effective => ("effective", "expires"),
        }
    }
}

/// Zone code to destination mapping with a default fallback.
/// Static for the process lifetime.
#[derive(Debug, Clone)]
pub struct ZoneRouting {
    map: HashMap<String, String>,
    default: String,
}

impl ZoneRouting {
    pub fn new(map: HashMap<String, String>, default: String) -> Self {
        Self { map, default }
    }

    pub fn resolve(&self, zone: &str) -> &str {
        self.map.get(zone).map_or(&self.default, String::as_str)
    }

    pub fn default_destination(&self) -> &str {
        &self.default
    }

    /// Distinct destinations (explicit mappings plus the default), used
    /// to fan out injected test alerts when no explicit targets are set.
    pub fn distinct_destinations(&self) -> Vec<String> {
        let mut out: Vec<String> = self.map.values().cloned().collect();
        out.push(self.default.clone());
        out.sort();
        out.dedup();
        out
    }
}
