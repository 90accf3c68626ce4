use async_trait::async_trait;
use tracing::info;

use crate::config::{DevConfig, InjectAlert};
use crate::model::{Alert, ZoneRouting};
use crate::source::AlertSource;

/// Development-mode source that serves a static list of fake alerts
/// instead of hitting the feed. Each configured alert is fanned out to
/// every injection destination with a destination-scoped id, so the diff
/// engine treats the copies independently.
pub struct StaticSource {
    alerts: Vec<InjectAlert>,
    prefix: String,
    destinations: Vec<String>,
}

impl StaticSource {
    pub fn new(dev: &DevConfig, routing: &ZoneRouting) -> Self {
        let destinations = if dev.inject_chat_ids.is_empty() {
            routing.distinct_destinations()
        } else {
            dev.inject_chat_ids.clone()
        };
        Self {
            alerts: dev.inject_alerts.clone(),
            prefix: dev.prefix_message.clone(),
            destinations,
        }
    }
}

#[async_trait]
impl AlertSource for StaticSource {
    async fn fetch_active(&self) -> Vec<Alert> {
        info!("DEV mode: injecting {} test alert(s)", self.alerts.len());
        let mut out = Vec::new();
        for alert in &self.alerts {
            let description = format!("{}{}", self.prefix, alert.description);
            for destination in &self.destinations {
                out.push(Alert {
                    id: format!("inject_{destination}_{}", alert.title),
                    zone: None,
                    event: alert.title.clone(),
                    description: description.clone(),
                    destination: destination.clone(),
                });
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn routing() -> ZoneRouting {
        let mut map = HashMap::new();
        map.insert("OHZ016".to_string(), "-100456".to_string());
        ZoneRouting::new(map, "-100123".to_string())
    }

    fn dev(inject_chat_ids: Vec<&str>) -> DevConfig {
        DevConfig {
            inject: true,
            inject_alerts: vec![InjectAlert {
                title: "Test Tornado Warning".to_string(),
                description: "Just a drill".to_string(),
            }],
            prefix_message: "TEST -- ".to_string(),
            inject_chat_ids: inject_chat_ids.into_iter().map(String::from).collect(),
        }
    }

    #[tokio::test]
    async fn explicit_destinations_are_used() {
        let source = StaticSource::new(&dev(vec!["-42"]), &routing());
        let alerts = source.fetch_active().await;
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].destination, "-42");
        assert_eq!(alerts[0].id, "inject_-42_Test Tornado Warning");
        assert_eq!(alerts[0].description, "TEST -- Just a drill");
        assert!(alerts[0].zone.is_none());
    }

    #[tokio::test]
    async fn empty_destinations_fan_out_to_routed_set() {
        let source = StaticSource::new(&dev(vec![]), &routing());
        let alerts = source.fetch_active().await;
        // One fake alert, two distinct destinations (mapped + default).
        assert_eq!(alerts.len(), 2);
        let dests: Vec<&str> = alerts.iter().map(|a| a.destination.as_str()).collect();
        assert!(dests.contains(&"-100123"));
        assert!(dests.contains(&"-100456"));
    }

    #[tokio::test]
    async fn ids_are_destination_scoped_and_distinct() {
        let source = StaticSource::new(&dev(vec![]), &routing());
        let alerts = source.fetch_active().await;
        let mut ids: Vec<&str> = alerts.iter().map(|a| a.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), alerts.len());
    }
}
