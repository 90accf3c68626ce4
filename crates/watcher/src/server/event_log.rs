use chrono::{DateTime, NaiveDate, Utc};

use crate::model::EventRecord;

/// In-memory event log with same-day retention: when the UTC date rolls
/// over, entries from before the start of the new day are dropped on the
/// next access. There is no persistence; a restart starts empty.
pub struct EventLog {
    entries: Vec<EventRecord>,
    last_prune_date: NaiveDate,
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            last_prune_date: Utc::now().date_naive(),
        }
    }

    pub fn append(&mut self, record: EventRecord) {
        self.entries.push(record);
    }

    pub fn entries(&self) -> &[EventRecord] {
        &self.entries
    }

    /// Drop yesterday's entries once per date rollover.
    pub fn prune(&mut self, now: DateTime<Utc>) {
        let today = now.date_naive();
        if today == self.last_prune_date {
            return;
        }
        let cutoff = today
            .and_hms_opt(0, 0, 0)
            .expect("midnight is always valid")
            .and_utc();
        self.entries.retain(|entry| entry.timestamp >= cutoff);
        self.last_prune_date = today;
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(timestamp: DateTime<Utc>) -> EventRecord {
        EventRecord {
            timestamp,
            county: "OHZ016".to_string(),
            event: "Wind Advisory".to_string(),
            description: "windy".to_string(),
        }
    }

    #[test]
    fn append_and_read_back() {
        let mut log = EventLog::new();
        log.append(record(Utc::now()));
        assert_eq!(log.entries().len(), 1);
    }

    #[test]
    fn prune_same_day_keeps_everything() {
        let now = Utc::now();
        let mut log = EventLog::new();
        log.last_prune_date = now.date_naive();
        log.append(record(now - Duration::hours(2)));
        log.prune(now);
        assert_eq!(log.entries().len(), 1);
    }

    #[test]
    fn prune_after_rollover_drops_previous_day() {
        let now = Utc::now();
        let mut log = EventLog::new();
        // Pretend the last prune happened yesterday.
        log.last_prune_date = (now - Duration::days(1)).date_naive();
        log.append(record(now - Duration::days(1)));
        log.append(record(now));

        log.prune(now);
        assert_eq!(log.entries().len(), 1);
        assert_eq!(log.entries()[0].timestamp, now);
        assert_eq!(log.last_prune_date, now.date_naive());
    }

    #[test]
    fn prune_is_idempotent_within_a_day() {
        let now = Utc::now();
        let mut log = EventLog::new();
        log.last_prune_date = (now - Duration::days(1)).date_naive();
        log.append(record(now));
        log.prune(now);
        log.prune(now);
        assert_eq!(log.entries().len(), 1);
    }
}
