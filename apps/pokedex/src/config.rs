use std::{collections::HashMap, fs};

use client_core::DEFAULT_GRAPHQL_URL;
use serde::Deserialize;
use shared::domain::DEFAULT_PAGE_SIZE;
use storage::{DatabaseLocation, MEMORY_DATABASE_URL};

pub const CONFIG_FILE: &str = "pokedex.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub graphql_url: String,
    pub database_url: String,
    pub page_size: u64,
    pub request_timeout_secs: u64,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            graphql_url: DEFAULT_GRAPHQL_URL.into(),
            database_url: "sqlite://./data/pokedex.db".into(),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout_secs: 15,
            log_filter: "info".into(),
        }
    }
}

impl Settings {
    /// Applies a flat `key = value` table. Unknown keys and values that do
    /// not parse leave the current setting alone.
    pub fn apply_file(&mut self, raw: &str) {
        let Ok(file_cfg) = toml::from_str::<HashMap<String, toml::Value>>(raw) else {
            return;
        };
        for (key, value) in file_cfg {
            let value = match value {
                toml::Value::String(text) => text,
                other => other.to_string(),
            };
            self.apply(&key, value);
        }
    }

    /// Plain variables first, then their `APP__` forms, so the latter win.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let layers = [
            ("POKEDEX_GRAPHQL_URL", "graphql_url"),
            ("APP__GRAPHQL_URL", "graphql_url"),
            ("DATABASE_URL", "database_url"),
            ("APP__DATABASE_URL", "database_url"),
            ("APP__PAGE_SIZE", "page_size"),
            ("APP__REQUEST_TIMEOUT_SECS", "request_timeout_secs"),
            ("APP__LOG_FILTER", "log_filter"),
        ];
        for (variable, key) in layers {
            if let Some(value) = lookup(variable) {
                self.apply(key, value);
            }
        }
    }

    fn apply(&mut self, key: &str, value: String) {
        match key {
            "graphql_url" => self.graphql_url = value,
            "database_url" => self.database_url = value,
            "page_size" => {
                if let Some(parsed) = value.trim().parse::<u64>().ok().filter(|size| *size > 0) {
                    self.page_size = parsed;
                }
            }
            "request_timeout_secs" => {
                if let Ok(parsed) = value.trim().parse::<u64>() {
                    self.request_timeout_secs = parsed;
                }
            }
            "log_filter" => self.log_filter = value,
            _ => {}
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(CONFIG_FILE) {
        settings.apply_file(&raw);
    }
    settings.apply_env(|key| std::env::var(key).ok());

    settings
}

pub fn prepare_database_url(raw_database_url: &str) -> anyhow::Result<String> {
    let database_url = normalize_database_url(raw_database_url);
    DatabaseLocation::of(&database_url).create_parent_dir()?;
    Ok(database_url)
}

/// Turns a bare path or a `sqlite:` shorthand into a full sqlite url.
fn normalize_database_url(raw_database_url: &str) -> String {
    match raw_database_url.trim() {
        "" => Settings::default().database_url,
        url if url.contains("://") || url.starts_with(MEMORY_DATABASE_URL) => url.to_string(),
        url => {
            let path = url.strip_prefix("sqlite:").unwrap_or(url).replace('\\', "/");
            // drive paths keep the single-colon form
            let authority = if starts_with_drive(&path) { "" } else { "//" };
            format!("sqlite:{authority}{path}")
        }
    }
}

fn starts_with_drive(path: &str) -> bool {
    let mut chars = path.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(letter), Some(':'), Some('/')) if letter.is_ascii_alphabetic()
    )
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
