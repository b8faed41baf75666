use anyhow::{Context, Result};
use colored::Colorize;
use dialoguer::{Confirm, Input, Select};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracksend_core::{MasterSyncPolicy, OrchestratorConfig};

#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub flow: OrchestratorConfig,

    #[serde(default)]
    pub accounts: AccountsConfig,

    #[serde(default)]
    pub share: ShareConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct AccountsConfig {
    pub available: Vec<String>,
}

/// An app the map link can be handed to, in the manner of a platform
/// share sheet entry
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ShareApp {
    pub label: String,
    pub package: String,
    pub class: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ShareConfig {
    pub apps: Vec<ShareApp>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OutputConfig {
    pub color_enabled: bool,
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            available: vec!["demo@example.com".to_string()],
        }
    }
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            apps: vec![
                ShareApp {
                    label: "Messages".to_string(),
                    package: "com.example.messages".to_string(),
                    class: "com.example.messages.ComposeActivity".to_string(),
                },
                ShareApp {
                    label: "Email".to_string(),
                    package: "com.example.mail".to_string(),
                    class: "com.example.mail.ComposeActivity".to_string(),
                },
            ],
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color_enabled: true,
        }
    }
}

/// Configuration manager that handles XDG-compliant paths and layered configuration
pub struct ConfigManager {
    config_path: PathBuf,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    /// Create a new ConfigManager with default XDG-compliant paths
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a ConfigManager with a specific path (for testing)
    #[allow(dead_code)]
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the configuration file path
    pub fn get_config_path(&self) -> PathBuf {
        self.config_path.clone()
    }

    /// Get the default XDG-compliant configuration path
    fn default_config_path() -> PathBuf {
        // Check for XDG_CONFIG_HOME override first (Linux/macOS)
        #[cfg(not(target_os = "windows"))]
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg_config).join("tracksend/config.toml");
        }

        // Use platform-specific defaults
        #[cfg(target_os = "linux")]
        {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config/tracksend/config.toml")
        }

        #[cfg(target_os = "macos")]
        {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("Library/Application Support/tracksend/config.toml")
        }

        #[cfg(target_os = "windows")]
        {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("tracksend\\config.toml")
        }
    }

    /// Load configuration with layered priority: ENV > File > Defaults
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new();

        // Layer 1: Defaults
        figment = figment.merge(Serialized::defaults(AppConfig::default()));

        // Layer 2: Config file (if exists)
        if self.config_path.exists() {
            figment = figment.merge(Toml::file(&self.config_path));
        }

        // Layer 3: Environment variables
        figment = figment.merge(Env::prefixed("TRACKSEND_").split("__"));

        figment.extract().context("Failed to load configuration")
    }

    /// Get a configuration value by key (dot notation)
    pub fn get(&self, key: &str) -> Result<String> {
        let config = self.load()?;
        let toml_string = toml::to_string(&config)?;
        let value: toml::Value = toml::from_str(&toml_string)?;

        let parts: Vec<&str> = key.split('.').collect();
        let mut current = &value;

        for part in parts {
            match current {
                toml::Value::Table(table) => {
                    current = table
                        .get(part)
                        .ok_or_else(|| anyhow::anyhow!("Key '{}' not found", key))?;
                }
                _ => anyhow::bail!("Invalid key path: {}", key),
            }
        }

        match current {
            toml::Value::String(s) => Ok(s.clone()),
            toml::Value::Integer(i) => Ok(i.to_string()),
            toml::Value::Float(f) => Ok(f.to_string()),
            toml::Value::Boolean(b) => Ok(b.to_string()),
            toml::Value::Array(values) => {
                let strings: Vec<&str> = values.iter().filter_map(toml::Value::as_str).collect();
                if strings.len() == values.len() {
                    Ok(strings.join(","))
                } else {
                    anyhow::bail!("Value at '{}' is not a simple type", key)
                }
            }
            _ => anyhow::bail!("Value at '{}' is not a simple type", key),
        }
    }

    /// Set a configuration value by key (dot notation)
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        // Validate the value based on the key
        self.validate_config_value(key, value)?;

        // Load existing config or create new
        let mut config = if self.config_path.exists() {
            let content = fs::read_to_string(&self.config_path)?;
            toml::from_str(&content)?
        } else {
            toml::Value::Table(toml::map::Map::new())
        };

        // Parse the key path
        let parts: Vec<&str> = key.split('.').collect();
        if parts.is_empty() {
            anyhow::bail!("Empty key");
        }

        // Navigate to the correct position and set the value
        let mut current = &mut config;
        for (i, part) in parts.iter().enumerate() {
            if i == parts.len() - 1 {
                // Last part - set the value
                if let toml::Value::Table(table) = current {
                    // Parse the value to the appropriate type
                    let parsed_value = self.parse_config_value(key, value)?;
                    table.insert(part.to_string(), parsed_value);
                } else {
                    anyhow::bail!("Cannot set value on non-table");
                }
            } else {
                // Intermediate part - ensure table exists
                if let toml::Value::Table(table) = current {
                    if !table.contains_key(*part) {
                        table.insert(part.to_string(), toml::Value::Table(toml::map::Map::new()));
                    }
                    current = table.get_mut(*part).unwrap();
                } else {
                    anyhow::bail!("Invalid key path: expected table at '{}'", part);
                }
            }
        }

        // Ensure directory exists
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write the updated config
        let toml_string = toml::to_string_pretty(&config)?;
        fs::write(&self.config_path, toml_string)?;

        Ok(())
    }

    /// List all configuration values
    pub fn list(&self) -> Result<Vec<(String, String)>> {
        let config = self.load()?;
        let toml_string = toml::to_string(&config)?;
        let value: toml::Value = toml::from_str(&toml_string)?;

        let mut items = Vec::new();
        Self::collect_values(&value, String::new(), &mut items);
        items.sort_by(|a, b| a.0.cmp(&b.0));

        Ok(items)
    }

    /// Recursively collect all key-value pairs from TOML
    fn collect_values(value: &toml::Value, prefix: String, items: &mut Vec<(String, String)>) {
        match value {
            toml::Value::Table(table) => {
                for (key, val) in table {
                    let new_prefix = if prefix.is_empty() {
                        key.clone()
                    } else {
                        format!("{prefix}.{key}")
                    };
                    Self::collect_values(val, new_prefix, items);
                }
            }
            toml::Value::String(s) => items.push((prefix, s.clone())),
            toml::Value::Integer(i) => items.push((prefix, i.to_string())),
            toml::Value::Float(f) => items.push((prefix, f.to_string())),
            toml::Value::Boolean(b) => items.push((prefix, b.to_string())),
            toml::Value::Array(values) => {
                // Flat rendering only for plain string lists; app tables
                // are shown in the config file itself
                let strings: Vec<&str> = values.iter().filter_map(toml::Value::as_str).collect();
                if strings.len() == values.len() && !strings.is_empty() {
                    items.push((prefix, strings.join(",")));
                }
            }
            _ => {} // Skip other complex types
        }
    }

    /// Validate a configuration value
    fn validate_config_value(&self, key: &str, value: &str) -> Result<()> {
        match key {
            "flow.master_sync" => {
                if value != "leave-untouched" && value != "force-enable" {
                    anyhow::bail!("master_sync must be 'leave-untouched' or 'force-enable'");
                }
            }
            "accounts.available" => {
                if value.split(',').any(|name| name.trim().is_empty()) {
                    anyhow::bail!("accounts must be a comma separated list of names");
                }
            }
            "output.color_enabled" => {
                let _: bool = value.parse().context("Value must be 'true' or 'false'")?;
            }
            k if k.starts_with("share.apps") => {
                anyhow::bail!("Share apps are edited in the config file directly");
            }
            _ => {} // No validation for unknown keys
        }
        Ok(())
    }

    /// Parse a value to the appropriate TOML type
    fn parse_config_value(&self, key: &str, value: &str) -> Result<toml::Value> {
        // Try to infer type from the key or parse as best fit
        match key {
            "accounts.available" => {
                let names: Vec<toml::Value> = value
                    .split(',')
                    .map(|name| toml::Value::String(name.trim().to_string()))
                    .collect();
                Ok(toml::Value::Array(names))
            }
            // Force string types for these fields
            k if k == "flow.master_sync" => Ok(toml::Value::String(value.to_string())),
            k if k.ends_with("_enabled") => {
                let bool_val: bool = value
                    .parse()
                    .context("Expected boolean value (true/false)")?;
                Ok(toml::Value::Boolean(bool_val))
            }
            _ => {
                // Try parsing as different types
                if let Ok(b) = value.parse::<bool>() {
                    Ok(toml::Value::Boolean(b))
                } else if let Ok(i) = value.parse::<i64>() {
                    Ok(toml::Value::Integer(i))
                } else if let Ok(f) = value.parse::<f64>() {
                    Ok(toml::Value::Float(f))
                } else {
                    Ok(toml::Value::String(value.to_string()))
                }
            }
        }
    }
}

/// Get the default configuration
pub fn get_config() -> Result<AppConfig, Box<figment::Error>> {
    ConfigManager::new()
        .load()
        .map_err(|e| Box::new(figment::Error::from(e.to_string())))
}

/// Interactive setup wizard for accounts and flow behavior
pub fn interactive_init(force: bool) -> Result<()> {
    println!("{}", "Track Send Setup".bold());
    println!("{}", "================".bold());
    println!();

    let mut config_mgr = ConfigManager::new();

    // Check if already configured
    if !force && config_mgr.get_config_path().exists() {
        let reconfigure = Confirm::new()
            .with_prompt("Configuration already exists. Reconfigure?")
            .default(false)
            .interact()
            .context("Failed to read input")?;

        if !reconfigure {
            println!("Setup cancelled.");
            return Ok(());
        }
    }

    // Load existing config for defaults
    let current = config_mgr.load().unwrap_or_default();

    println!("{}", "Accounts".bold());
    println!("Tracks are sent as one of these accounts.");

    let default_accounts = if current.accounts.available.is_empty() {
        "demo@example.com".to_string()
    } else {
        current.accounts.available.join(",")
    };

    let accounts: String = Input::new()
        .with_prompt("Accounts (comma separated)")
        .default(default_accounts)
        .interact_text()
        .context("Failed to read accounts")?;

    println!();
    println!("{}", "Drive Sync".bold());
    println!("When a flow enables background sync, the device-global switch can");
    println!("be forced on so the new registration takes effect immediately.");

    let policies = ["leave-untouched", "force-enable"];
    let default_policy = match current.flow.master_sync {
        MasterSyncPolicy::LeaveUntouched => 0,
        MasterSyncPolicy::ForceEnable => 1,
    };

    let policy = Select::new()
        .with_prompt("Master sync policy")
        .items(&policies)
        .default(default_policy)
        .interact()
        .context("Failed to read policy")?;

    let color_enabled = Confirm::new()
        .with_prompt("Enable colored output?")
        .default(current.output.color_enabled)
        .interact()
        .context("Failed to read input")?;

    // Save configuration
    config_mgr.set("accounts.available", &accounts)?;
    config_mgr.set("flow.master_sync", policies[policy])?;
    config_mgr.set("output.color_enabled", &color_enabled.to_string())?;

    println!();
    println!("{}", "✓ Configuration saved".green());
    println!();
    println!("You can now use:");
    println!("  tracksend send <track-id> --drive   - Send a track to Drive");
    println!("  tracksend share <track-id>          - Share through the default target");

    Ok(())
}
