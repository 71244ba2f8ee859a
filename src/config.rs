use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::ui::calendar::CalendarView;

pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_FILE: &str = "smart-finance.log";

#[derive(Debug, Clone, PartialEq)]
pub struct AdvisorConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub advisor: AdvisorConfig,
    pub log_file: PathBuf,
    pub calendar_view: CalendarView,
}

impl Config {
    /// Reads `.env` (if any) and then the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let timeout_secs = match non_empty("ADVISOR_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("ADVISOR_TIMEOUT_SECS must be a whole number of seconds, got {raw:?}"))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let calendar_view = match non_empty("CALENDAR_INITIAL_VIEW") {
            Some(raw) => raw.parse::<CalendarView>().context("Invalid CALENDAR_INITIAL_VIEW")?,
            None => CalendarView::default(),
        };

        Ok(Config {
            advisor: AdvisorConfig {
                api_key: non_empty("OPENAI_API_KEY"),
                model: non_empty("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                base_url: non_empty("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                timeout: Duration::from_secs(timeout_secs),
            },
            log_file: non_empty("FINANCE_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
            calendar_view,
        })
    }
}
