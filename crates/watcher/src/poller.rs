use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use crate::diff;
use crate::dispatch::Dispatcher;
use crate::metrics;
use crate::source::AlertSource;
use crate::store::StateStore;

/// What one fetch→diff→notify→persist cycle did, for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleOutcome {
    pub fetched: usize,
    pub notified: usize,
    pub all_clear: bool,
}

/// Drives one cycle per timer tick. A cycle failure is logged and the
/// loop moves on to the next tick; nothing short of process termination
/// stops it. Cycles never overlap: the next tick is only considered
/// after the current cycle completes.
pub struct PollLoop {
    source: Arc<dyn AlertSource>,
    store: Arc<dyn StateStore>,
    dispatcher: Dispatcher,
    interval: Duration,
}

impl PollLoop {
    pub fn new(
        source: Arc<dyn AlertSource>,
        store: Arc<dyn StateStore>,
        dispatcher: Dispatcher,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            store,
            dispatcher,
            interval,
        }
    }

    pub async fn run(&self) {
        info!("Starting polling every {}s", self.interval.as_secs());
        let mut ticker = tokio::time::interval(self.interval);
        loop {
            ticker.tick().await;
            match self.run_cycle().await {
                Ok(outcome) => {
                    metrics::CYCLES_TOTAL.inc();
                    info!(
                        "Cycle done: {} active, {} notified, all_clear={}",
                        outcome.fetched, outcome.notified, outcome.all_clear
                    );
                }
                Err(e) => {
                    metrics::CYCLE_FAILURES_TOTAL.inc();
                    error!("Cycle failed: {e}");
                }
            }
        }
    }

    /// One full cycle: load state, fetch, diff, dispatch, persist.
    ///
    /// The persisted snapshot is derived from the current fetch and
    /// replaces the previous state wholesale; alerts that silently
    /// dropped out of the feed are expired by omission.
    pub async fn run_cycle(&self) -> crate::Result<CycleOutcome> {
        let previous = self.store.load();
        let current = self.source.fetch_active().await;
        let changes = diff::diff(&current, &previous);

        if changes.all_clear {
            self.dispatcher.dispatch_all_clear(&previous).await;
        } else if changes.to_notify.is_empty() {
            info!("No new or changed alerts");
        } else {
            // Every entry gets an attempt, even when earlier sends fail.
            for alert in &changes.to_notify {
                self.dispatcher.dispatch_alert(alert).await;
            }
        }

        self.store.save(&diff::snapshot(&current));

        Ok(CycleOutcome {
            fetched: current.len(),
            notified: changes.to_notify.len(),
            all_clear: changes.all_clear,
        })
    }
}
