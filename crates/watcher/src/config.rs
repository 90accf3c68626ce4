use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::{TimeFields, ZoneRouting};

/// Top-level application configuration, loaded from YAML.
///
/// Everything except the bot token has a usable default. The token may
/// come from the file or from the `STORMWATCH_BOT_TOKEN` environment
/// variable (the env var wins, so the file can be committed without it).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub alerting: AlertingConfig,
    #[serde(default)]
    pub weather_alerts: WeatherAlertsConfig,
    #[serde(default)]
    pub describe: DescribeConfig,
    #[serde(default)]
    pub webapp: WebappConfig,
    #[serde(default)]
    pub dev: DevConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: String,
    /// Default destination when a zone has no explicit mapping.
    #[serde(default)]
    pub chat_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertingConfig {
    #[serde(default)]
    pub zone_codes: Vec<String>,
    #[serde(default)]
    pub zone_chat_map: HashMap<String, String>,
    /// Human-readable labels for the dashboard, keyed by zone code.
    #[serde(default)]
    pub zone_labels: HashMap<String, String>,
    /// Glob patterns; matching events are dropped everywhere.
    #[serde(default)]
    pub global_blocked_events: Vec<String>,
    #[serde(default)]
    pub time_type: TimeFields,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherAlertsConfig {
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    #[serde(default)]
    pub uppercase: bool,
}

impl Default for WeatherAlertsConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            uppercase: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescribeConfig {
    #[serde(default = "default_max_words")]
    pub max_words: usize,
}

impl Default for DescribeConfig {
    fn default() -> Self {
        Self {
            max_words: default_max_words(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebappConfig {
    /// Where the poll loop POSTs structured event records. Disabled when unset.
    #[serde(default)]
    pub log_endpoint: Option<String>,
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for WebappConfig {
    fn default() -> Self {
        Self {
            log_endpoint: None,
            listen_addr: default_listen_addr(),
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DevConfig {
    /// When true, the poll loop reads alerts from `inject_alerts`
    /// instead of the feed.
    #[serde(default)]
    pub inject: bool,
    #[serde(default)]
    pub inject_alerts: Vec<InjectAlert>,
    /// Prepended to every injected description.
    #[serde(default)]
    pub prefix_message: String,
    /// Destinations for injected alerts; when empty, all routed
    /// destinations plus the default are used.
    #[serde(default)]
    pub inject_chat_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InjectAlert {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

// --- Defaults ---

const fn default_poll_interval() -> u64 {
    300
}

const fn default_max_words() -> usize {
    150
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_user_agent() -> String {
    "StormwatchBot/1.0 (no-contact@example.com)".to_string()
}

impl Config {
    /// Load configuration from a YAML file, apply environment overrides,
    /// and validate. A missing bot token is a startup error: nothing in
    /// the pipeline can be dispatched without it.
    pub fn load(path: &Path) -> crate::Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            crate::Error::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let mut config: Config = serde_yaml::from_str(&raw)?;

        let _ = dotenvy::dotenv();
        if let Ok(token) = std::env::var("STORMWATCH_BOT_TOKEN") {
            if !token.is_empty() {
                config.telegram.bot_token = token;
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.telegram.bot_token.is_empty() {
            return Err(crate::Error::Config(
                "telegram.bot_token is not set (file or STORMWATCH_BOT_TOKEN)".to_string(),
            ));
        }
        if self.telegram.chat_id.is_empty() {
            return Err(crate::Error::Config(
                "telegram.chat_id (default destination) is not set".to_string(),
            ));
        }
        Ok(())
    }

    pub fn routing(&self) -> ZoneRouting {
        ZoneRouting::new(
            self.alerting.zone_chat_map.clone(),
            self.telegram.chat_id.clone(),
        )
    }
}
