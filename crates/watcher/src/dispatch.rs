use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error};

use crate::metrics;
use crate::model::{Alert, EventRecord, TrackedAlert};
use crate::normalize::TextNormalizer;
use crate::sinks::{EventSink, Notifier};

pub const ALL_CLEAR_MESSAGE: &str =
    "ALL CLEAR: The national weather service has cleared all alerts for this area.";

/// Sends one message per change-set entry to the right destination and
/// optionally forwards a structured event record to the logging sink.
/// Everything here is fire-and-forget: failures are logged and counted,
/// never returned, so one bad send cannot stop the rest of a cycle.
pub struct Dispatcher {
    notifier: Arc<dyn Notifier>,
    event_sink: Option<Arc<dyn EventSink>>,
    normalizer: TextNormalizer,
    uppercase: bool,
}

impl Dispatcher {
    pub fn new(
        notifier: Arc<dyn Notifier>,
        event_sink: Option<Arc<dyn EventSink>>,
        normalizer: TextNormalizer,
        uppercase: bool,
    ) -> Self {
        Self {
            notifier,
            event_sink,
            normalizer,
            uppercase,
        }
    }

    /// Notify one new or changed alert.
    pub async fn dispatch_alert(&self, alert: &Alert) {
        let text = format!("Detailed alert for {}. {}", alert.event, alert.description);
        let text = self.normalizer.normalize(&text);
        self.send(&text, &alert.destination).await;

        let county = alert.zone.clone().unwrap_or_else(|| "DEV".to_string());
        self.forward_event(EventRecord {
            timestamp: Utc::now(),
            county,
            event: alert.event.clone(),
            description: alert.description.clone(),
        })
        .await;
    }

    /// Notify that a previously non-empty alert set went empty.
    ///
    /// One message per *distinct* destination found in prior state, in
    /// first-seen order. (The alternative, one per tracked entry, would
    /// repeat a destination that had several active alerts.)
    pub async fn dispatch_all_clear(&self, previous: &[TrackedAlert]) {
        let mut destinations: Vec<&str> = Vec::new();
        for tracked in previous {
            if !destinations.contains(&tracked.destination.as_str()) {
                destinations.push(&tracked.destination);
            }
        }

        for destination in destinations {
            self.send(ALL_CLEAR_MESSAGE, destination).await;
            self.forward_event(EventRecord {
                timestamp: Utc::now(),
                county: "ALL".to_string(),
                event: "ALL CLEAR".to_string(),
                description: String::new(),
            })
            .await;
        }
    }

    async fn send(&self, text: &str, destination: &str) {
        let text = if self.uppercase {
            text.to_uppercase()
        } else {
            text.to_string()
        };
        match self.notifier.send(&text, destination).await {
            Ok(()) => metrics::ALERTS_NOTIFIED_TOTAL.inc(),
            Err(e) => {
                metrics::NOTIFY_ERRORS_TOTAL.inc();
                error!("Error sending to {destination}: {e}");
            }
        }
    }

    async fn forward_event(&self, record: EventRecord) {
        let Some(sink) = &self.event_sink else { return };
        if let Err(e) = sink.forward(&record).await {
            debug!("Failed to forward event record: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingNotifier {
        sent: Mutex<Vec<(String, String)>>,
    }

    impl RecordingNotifier {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                sent: Mutex::new(Vec::new()),
            })
        }

        fn sent(&self) -> Vec<(String, String)> {
            self.sent.lock().expect("mutex poisoned").clone()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, text: &str, destination: &str) -> crate::Result<()> {
            self.sent
                .lock()
                .expect("mutex poisoned")
                .push((text.to_string(), destination.to_string()));
            Ok(())
        }
    }

    struct FailingNotifier;

    #[async_trait]
    impl Notifier for FailingNotifier {
        async fn send(&self, _text: &str, _destination: &str) -> crate::Result<()> {
            Err(crate::Error::Notify("chat unreachable".to_string()))
        }
    }

    struct RecordingSink {
        records: Mutex<Vec<EventRecord>>,
    }

    impl RecordingSink {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                records: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl EventSink for RecordingSink {
        async fn forward(&self, record: &EventRecord) -> crate::Result<()> {
            self.records
                .lock()
                .expect("mutex poisoned")
                .push(record.clone());
            Ok(())
        }
    }

    struct FailingSink;

    #[async_trait]
    impl EventSink for FailingSink {
        async fn forward(&self, _record: &EventRecord) -> crate::Result<()> {
            Err(crate::Error::Forward("endpoint down".to_string()))
        }
    }

    fn alert(zone: Option<&str>) -> Alert {
        Alert {
            id: "a1".to_string(),
            zone: zone.map(String::from),
            event: "Wind Advisory".to_string(),
            description: "Winds 40 mph expected".to_string(),
            destination: "-100123".to_string(),
        }
    }

    fn tracked(id: &str, destination: &str) -> TrackedAlert {
        TrackedAlert {
            id: id.to_string(),
            destination: destination.to_string(),
            description: "old".to_string(),
        }
    }

    fn dispatcher(
        notifier: Arc<dyn Notifier>,
        sink: Option<Arc<dyn EventSink>>,
        uppercase: bool,
    ) -> Dispatcher {
        Dispatcher::new(notifier, sink, TextNormalizer::default(), uppercase)
    }

    #[tokio::test]
    async fn alert_message_is_composed_and_normalized() {
        let notifier = RecordingNotifier::new();
        let d = dispatcher(notifier.clone(), None, false);
        d.dispatch_alert(&alert(Some("OHZ016"))).await;

        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(
            sent[0].0,
            "Detailed alert for Wind Advisory. Winds 40 miles per hour expected"
        );
        assert_eq!(sent[0].1, "-100123");
    }

    #[tokio::test]
    async fn uppercase_flag_applies_to_whole_message() {
        let notifier = RecordingNotifier::new();
        let d = dispatcher(notifier.clone(), None, true);
        d.dispatch_alert(&alert(Some("OHZ016"))).await;

        let sent = notifier.sent();
        assert!(sent[0].0.starts_with("DETAILED ALERT FOR WIND ADVISORY."));
    }

    #[tokio::test]
    async fn all_clear_deduplicates_destinations() {
        let notifier = RecordingNotifier::new();
        let d = dispatcher(notifier.clone(), None, false);
        let previous = vec![
            tracked("a", "-1"),
            tracked("b", "-1"),
            tracked("c", "-2"),
        ];
        d.dispatch_all_clear(&previous).await;

        let sent = notifier.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].1, "-1");
        assert_eq!(sent[1].1, "-2");
        assert!(sent.iter().all(|(text, _)| text == ALL_CLEAR_MESSAGE));
    }

    #[tokio::test]
    async fn all_clear_is_not_normalized_but_uppercased() {
        let notifier = RecordingNotifier::new();
        let d = dispatcher(notifier.clone(), None, true);
        d.dispatch_all_clear(&[tracked("a", "-1")]).await;

        let sent = notifier.sent();
        assert_eq!(sent[0].0, ALL_CLEAR_MESSAGE.to_uppercase());
    }

    #[tokio::test]
    async fn event_record_carries_zone_and_raw_description() {
        let notifier = RecordingNotifier::new();
        let sink = RecordingSink::new();
        let d = dispatcher(notifier, Some(sink.clone()), false);
        d.dispatch_alert(&alert(Some("OHZ016"))).await;

        let records = sink.records.lock().expect("mutex poisoned").clone();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].county, "OHZ016");
        assert_eq!(records[0].event, "Wind Advisory");
        // The sink gets the raw description, not the normalized message.
        assert_eq!(records[0].description, "Winds 40 mph expected");
    }

    #[tokio::test]
    async fn injected_alert_logs_county_dev() {
        let notifier = RecordingNotifier::new();
        let sink = RecordingSink::new();
        let d = dispatcher(notifier, Some(sink.clone()), false);
        d.dispatch_alert(&alert(None)).await;

        let records = sink.records.lock().expect("mutex poisoned").clone();
        assert_eq!(records[0].county, "DEV");
    }

    #[tokio::test]
    async fn all_clear_records_county_all_with_empty_description() {
        let notifier = RecordingNotifier::new();
        let sink = RecordingSink::new();
        let d = dispatcher(notifier, Some(sink.clone()), false);
        d.dispatch_all_clear(&[tracked("a", "-1")]).await;

        let records = sink.records.lock().expect("mutex poisoned").clone();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].county, "ALL");
        assert_eq!(records[0].event, "ALL CLEAR");
        assert!(records[0].description.is_empty());
    }

    #[tokio::test]
    async fn notify_failure_is_swallowed() {
        let d = dispatcher(Arc::new(FailingNotifier), None, false);
        // Must not panic or propagate.
        d.dispatch_alert(&alert(Some("OHZ016"))).await;
        d.dispatch_all_clear(&[tracked("a", "-1"), tracked("b", "-2")]).await;
    }

    #[tokio::test]
    async fn sink_failure_does_not_block_notification() {
        let notifier = RecordingNotifier::new();
        let d = dispatcher(notifier.clone(), Some(Arc::new(FailingSink)), false);
        d.dispatch_alert(&alert(Some("OHZ016"))).await;
        assert_eq!(notifier.sent().len(), 1);
    }
}
