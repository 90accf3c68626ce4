mod inject;
mod nws;

pub use inject::StaticSource;
pub use nws::{NwsSource, DEFAULT_BASE_URL};

use async_trait::async_trait;
use regex::Regex;

use crate::model::Alert;

/// Produces the currently active alerts for one cycle, already filtered
/// and routed. Implementations handle their own failures internally
/// (logging and skipping) so a bad zone or endpoint never aborts a cycle.
#[async_trait]
pub trait AlertSource: Send + Sync {
    async fn fetch_active(&self) -> Vec<Alert>;
}

/// Glob-pattern event blocklist (`*` and `?` wildcards, full-string,
/// case-sensitive). Compiled once at startup.
#[derive(Debug, Clone, Default)]
pub struct EventBlocklist {
    patterns: Vec<Regex>,
}

impl EventBlocklist {
    pub fn new(globs: &[String]) -> Self {
        let patterns = globs
            .iter()
            .filter_map(|glob| {
                let pattern = glob_to_regex(glob);
                match Regex::new(&pattern) {
                    Ok(re) => Some(re),
                    Err(e) => {
                        tracing::warn!("Ignoring unusable blocklist pattern {glob:?}: {e}");
                        None
                    }
                }
            })
            .collect();
        Self { patterns }
    }

    pub fn blocks(&self, event: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(event))
    }
}

fn glob_to_regex(glob: &str) -> String {
    let mut out = String::with_capacity(glob.len() + 8);
    out.push('^');
    for ch in glob.chars() {
        match ch {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            other => out.push_str(&regex::escape(&other.to_string())),
        }
    }
    out.push('$');
    out
}
