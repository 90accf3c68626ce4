use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::metrics;
use crate::model::{Alert, TimeFields, ZoneRouting};
use crate::source::{AlertSource, EventBlocklist};

pub const DEFAULT_BASE_URL: &str = "https://api.weather.gov/alerts/active";

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches active alerts from the NWS feed, one request per zone.
///
/// The feed is treated as untrusted: every property is optional and a
/// feature is silently dropped as soon as a required field is missing or
/// unparseable. A failed request for one zone is logged and skipped
/// without affecting the other zones.
pub struct NwsSource {
    client: reqwest::Client,
    base_url: String,
    zones: Vec<String>,
    routing: ZoneRouting,
    blocklist: EventBlocklist,
    time_fields: TimeFields,
}

/// GeoJSON-ish feed payload. Only the fields we check are modeled.
#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Default, Deserialize)]
struct Feature {
    id: Option<String>,
    #[serde(default)]
    properties: FeatureProperties,
}

#[derive(Debug, Default, Deserialize)]
struct FeatureProperties {
    event: Option<String>,
    description: Option<String>,
    onset: Option<String>,
    ends: Option<String>,
    effective: Option<String>,
    expires: Option<String>,
}

impl NwsSource {
    pub fn new(
        base_url: impl Into<String>,
        user_agent: &str,
        zones: Vec<String>,
        routing: ZoneRouting,
        blocklist: EventBlocklist,
        time_fields: TimeFields,
    ) -> crate::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(user_agent)
            .build()
            .map_err(|e| crate::Error::Config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            zones,
            routing,
            blocklist,
            time_fields,
        })
    }

    async fn fetch_zone(&self, zone: &str, now: DateTime<Utc>) -> crate::Result<Vec<Alert>> {
        let url = format!("{}?zone={zone}", self.base_url);
        let collection: FeatureCollection = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(self.select_active(zone, collection, now))
    }

    /// Filters a zone's raw features down to the currently active,
    /// non-blocked alerts, resolving each one's destination.
    fn select_active(
        &self,
        zone: &str,
        collection: FeatureCollection,
        now: DateTime<Utc>,
    ) -> Vec<Alert> {
        let mut alerts = Vec::new();
        for feature in collection.features {
            let Some(id) = feature.id else { continue };
            let p = feature.properties;
            let Some(event) = p.event else { continue };
            if self.blocklist.blocks(&event) {
                debug!("Blocked event {event:?} in zone {zone}");
                continue;
            }

            let (start, end) = match self.time_fields {
                TimeFields::Onset => (p.onset, p.ends.or(p.expires)),
                TimeFields::Effective => (p.effective, p.expires),
            };
            let (Some(start), Some(end)) = (start, end) else {
                continue;
            };
            let (Ok(start), Ok(end)) = (
                DateTime::parse_from_rfc3339(&start),
                DateTime::parse_from_rfc3339(&end),
            ) else {
                debug!("Unparseable timestamps on {id} in zone {zone}");
                continue;
            };

            // Half-open activity window: active at the start instant,
            // inactive at the end instant.
            let start = start.with_timezone(&Utc);
            let end = end.with_timezone(&Utc);
            if !(start <= now && now < end) {
                continue;
            }

            alerts.push(Alert {
                id,
                zone: Some(zone.to_string()),
                event,
                description: p.description.unwrap_or_default().trim().to_string(),
                destination: self.routing.resolve(zone).to_string(),
            });
        }
        alerts
    }
}

#[async_trait]
impl AlertSource for NwsSource {
    async fn fetch_active(&self) -> Vec<Alert> {
        let now = Utc::now();
        let mut alerts = Vec::new();
        for zone in &self.zones {
            match self.fetch_zone(zone, now).await {
                Ok(mut zone_alerts) => alerts.append(&mut zone_alerts),
                Err(e) => {
                    metrics::FETCH_ERRORS_TOTAL.inc();
                    warn!("Fetch error for zone {zone}: {e}");
                }
            }
        }
        alerts
    }
}
