//! Flat key-value preference store under the user data dir
//!
//! Holds what the orchestrator reads through its preferences gateway:
//! the selected account, the share target, confirmation suppressions,
//! sync flags, and the grants the simulated authorizer caches.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::warn;
use tracksend_core::PreferencesGateway;

#[derive(Clone)]
pub struct FilePreferences {
    path: PathBuf,
}

impl Default for FilePreferences {
    fn default() -> Self {
        Self::new()
    }
}

impl FilePreferences {
    pub fn new() -> Self {
        Self {
            path: Self::default_prefs_path(),
        }
    }

    /// Create a store backed by a specific file (for testing)
    #[allow(dead_code)]
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Get the preferences file path
    pub fn path(&self) -> PathBuf {
        self.path.clone()
    }

    fn default_prefs_path() -> PathBuf {
        // Check for XDG_DATA_HOME override first (Linux/macOS)
        #[cfg(not(target_os = "windows"))]
        if let Ok(xdg_data) = std::env::var("XDG_DATA_HOME") {
            return PathBuf::from(xdg_data).join("tracksend/prefs.toml");
        }

        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tracksend/prefs.toml")
    }

    // Every read goes back to disk, so clones of the store held by the
    // orchestrator and the shell always see each other's writes.
    fn load_table(&self) -> toml::Table {
        let Ok(content) = fs::read_to_string(&self.path) else {
            return toml::Table::new();
        };
        match toml::from_str(&content) {
            Ok(table) => table,
            Err(error) => {
                warn!("Ignoring unreadable preferences file: {error}");
                toml::Table::new()
            }
        }
    }

    fn store_table(&self, table: &toml::Table) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, toml::to_string_pretty(table)?)?;
        Ok(())
    }

    fn write_value(&self, key: &str, value: toml::Value) {
        let mut table = self.load_table();
        table.insert(key.to_string(), value);
        if let Err(error) = self.store_table(&table) {
            warn!("Failed to write preference '{key}': {error}");
        }
    }

    /// Store a string preference, logging instead of failing on IO errors
    pub fn set_string(&self, key: &str, value: &str) {
        self.write_value(key, toml::Value::String(value.to_string()));
    }

    /// Get a preference value for CLI display
    pub fn get(&self, key: &str) -> Option<String> {
        self.load_table().get(key).map(render_value)
    }

    /// Set a preference from the CLI, inferring the value type
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let parsed = if let Ok(b) = value.parse::<bool>() {
            toml::Value::Boolean(b)
        } else if let Ok(i) = value.parse::<i64>() {
            toml::Value::Integer(i)
        } else {
            toml::Value::String(value.to_string())
        };

        let mut table = self.load_table();
        table.insert(key.to_string(), parsed);
        self.store_table(&table)
            .with_context(|| format!("Failed to write preferences to {}", self.path.display()))
    }

    /// List all preference values sorted by key
    pub fn list(&self) -> Vec<(String, String)> {
        let mut items: Vec<(String, String)> = self
            .load_table()
            .iter()
            .map(|(key, value)| (key.clone(), render_value(value)))
            .collect();
        items.sort_by(|a, b| a.0.cmp(&b.0));
        items
    }
}

fn render_value(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl PreferencesGateway for FilePreferences {
    fn get_string(&self, key: &str, default: &str) -> String {
        self.load_table()
            .get(key)
            .and_then(toml::Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| default.to_string())
    }

    fn get_bool(&self, key: &str, default: bool) -> bool {
        self.load_table()
            .get(key)
            .and_then(toml::Value::as_bool)
            .unwrap_or(default)
    }

    fn set_bool(&self, key: &str, value: bool) {
        self.write_value(key, toml::Value::Boolean(value));
    }
}
