pub mod config;
pub mod diff;
pub mod dispatch;
pub mod metrics;
pub mod model;
pub mod normalize;
pub mod poller;
pub mod server;
pub mod sinks;
pub mod source;
pub mod store;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Fetch error: {0}")]
    Fetch(String),
    #[error("State error: {0}")]
    State(String),
    #[error("Notification error: {0}")]
    Notify(String),
    #[error("Log forward error: {0}")]
    Forward(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    SerdeYaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
