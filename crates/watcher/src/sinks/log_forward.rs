use std::time::Duration;

use async_trait::async_trait;

use crate::model::EventRecord;
use crate::sinks::EventSink;

const FORWARD_TIMEOUT: Duration = Duration::from_secs(5);

/// POSTs structured event records to the dashboard's log endpoint.
/// The response body is ignored; only the status matters.
pub struct HttpEventSink {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpEventSink {
    pub fn new(endpoint: impl Into<String>) -> crate::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(FORWARD_TIMEOUT)
            .build()
            .map_err(|e| crate::Error::Config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl EventSink for HttpEventSink {
    async fn forward(&self, record: &EventRecord) -> crate::Result<()> {
        self.client
            .post(&self.endpoint)
            .json(record)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| crate::Error::Forward(format!("log forward failed: {e}")))?;
        Ok(())
    }
}
