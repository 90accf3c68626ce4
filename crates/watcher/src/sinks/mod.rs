mod log_forward;
mod telegram;

pub use log_forward::HttpEventSink;
pub use telegram::{TelegramNotifier, DEFAULT_API_BASE};

use async_trait::async_trait;

use crate::model::EventRecord;

/// Outbound message transport: send one text to one destination id.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str, destination: &str) -> crate::Result<()>;
}

/// Optional structured-event forwarder (the dashboard's log endpoint).
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn forward(&self, record: &EventRecord) -> crate::Result<()>;
}
