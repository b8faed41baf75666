use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use colored::*;
use std::path::PathBuf;

mod config;
mod prefs_store;
mod shell;
mod terminal;

use crate::config::{AppConfig, ConfigManager, get_config};
use crate::prefs_store::FilePreferences;
use crate::shell::FlowDriver;
use tracksend_core::SendRequest;

#[derive(Parser)]
#[command(name = "tracksend")]
#[command(author, version, about = "Send and share recorded GPS tracks through Google services", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a track to one or more destinations
    Send {
        /// Track to send
        #[arg(required_unless_present = "resume")]
        track_id: Option<i64>,

        /// Send to Google Drive
        #[arg(long)]
        drive: bool,

        /// Send to Google Maps
        #[arg(long)]
        maps: bool,

        /// Send to Google Fusion Tables
        #[arg(long)]
        fusion_tables: bool,

        /// Send to Google Spreadsheets
        #[arg(long)]
        spreadsheets: bool,

        /// Share the Drive file with recipients asked for during the flow
        #[arg(long, requires = "drive", conflicts_with = "enable_sync")]
        drive_share: bool,

        /// Enable background Drive sync instead of a one-shot send
        #[arg(long, requires = "drive")]
        enable_sync: bool,

        /// Share the map link through an app picked during the flow
        #[arg(long, requires = "maps")]
        maps_share: bool,

        /// Send to an existing map instead of creating a new one
        #[arg(long, requires = "maps")]
        existing_map: bool,

        /// Resume the flow saved in the state file
        #[arg(long, requires = "state", conflicts_with_all = [
            "drive", "maps", "fusion_tables", "spreadsheets",
            "drive_share", "enable_sync", "maps_share", "existing_map",
        ])]
        resume: bool,

        /// File the flow state is saved to when a prompt is dismissed
        #[arg(long, value_name = "FILE")]
        state: Option<PathBuf>,
    },

    /// Share a track through the configured share target
    Share {
        /// Track to share
        track_id: i64,

        /// File the flow state is saved to when a prompt is dismissed
        #[arg(long, value_name = "FILE")]
        state: Option<PathBuf>,
    },

    /// Inspect or change runtime preferences
    Prefs {
        #[command(subcommand)]
        command: PrefsCommand,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum PrefsCommand {
    /// Get a preference value
    Get {
        /// Preference key
        key: String,
    },
    /// Set a preference value
    Set {
        /// Preference key
        key: String,
        /// Value to set
        value: String,
    },
    /// List all preference values
    List,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Interactive setup for accounts and flow behavior
    Init {
        /// Force reconfiguration even if already configured
        #[arg(short, long)]
        force: bool,
    },
    /// Get a configuration value
    Get {
        /// Configuration key (e.g., flow.master_sync)
        key: String,
    },
    /// Set a configuration value
    Set {
        /// Configuration key (e.g., flow.master_sync)
        key: String,
        /// Value to set
        value: String,
    },
    /// List all configuration values
    List,
    /// Show the configuration file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on debug flag
    if cli.debug {
        env_logger::Builder::from_env(env_logger::Env::default())
            .filter_level(log::LevelFilter::Debug)
            .filter_module("tracksend_core", log::LevelFilter::Debug)
            .filter_module("tracksend_cli", log::LevelFilter::Debug)
            .format_timestamp_millis()
            .init();
        eprintln!("Debug logging enabled");
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let config = get_config().context("Failed to load configuration")?;

    if !config.output.color_enabled {
        colored::control::set_override(false);
    }

    match cli.command {
        Commands::Send {
            track_id,
            drive,
            maps,
            fusion_tables,
            spreadsheets,
            drive_share,
            enable_sync,
            maps_share,
            existing_map,
            resume,
            state,
        } => {
            send_command(
                config,
                track_id,
                drive,
                maps,
                fusion_tables,
                spreadsheets,
                drive_share,
                enable_sync,
                maps_share,
                existing_map,
                resume,
                state,
            )
            .await?;
        }
        Commands::Share { track_id, state } => {
            share_command(config, track_id, state).await?;
        }
        Commands::Prefs { command } => {
            prefs_command(command)?;
        }
        Commands::Config { command } => {
            config_command(command)?;
        }
        Commands::Completions { shell } => {
            generate_completions(shell);
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn send_command(
    config: AppConfig,
    track_id: Option<i64>,
    drive: bool,
    maps: bool,
    fusion_tables: bool,
    spreadsheets: bool,
    drive_share: bool,
    enable_sync: bool,
    maps_share: bool,
    existing_map: bool,
    resume: bool,
    state: Option<PathBuf>,
) -> Result<()> {
    terminal::ensure_interactive()?;

    let driver = FlowDriver::new(&config, state.clone());

    if resume {
        let path = state.context("--resume needs --state <file>")?;
        let blob = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read state file {}", path.display()))?;
        return driver.run_resume(&blob).await;
    }

    let track_id = track_id.context("<TRACK_ID> is required unless --resume is given")?;

    let mut request = SendRequest::new(track_id);
    if drive {
        request = request.with_drive();
    }
    if maps {
        request = request.with_maps();
    }
    if fusion_tables {
        request = request.with_fusion_tables();
    }
    if spreadsheets {
        request = request.with_spreadsheets();
    }
    if enable_sync {
        request = request.with_drive_sync();
    }
    if drive_share {
        request = request.with_drive_share();
    }
    if maps_share {
        request = request.with_maps_share();
    }
    if existing_map {
        request = request.with_existing_map();
    }

    driver.run_send(request).await
}

async fn share_command(config: AppConfig, track_id: i64, state: Option<PathBuf>) -> Result<()> {
    terminal::ensure_interactive()?;

    FlowDriver::new(&config, state).run_share(track_id).await
}

fn prefs_command(command: PrefsCommand) -> Result<()> {
    let store = FilePreferences::new();

    match command {
        PrefsCommand::Get { key } => match store.get(&key) {
            Some(value) => {
                println!("{value}");
            }
            None => {
                eprintln!("{}", format!("Preference '{key}' is not set").yellow());
                std::process::exit(1);
            }
        },
        PrefsCommand::Set { key, value } => match store.set(&key, &value) {
            Ok(()) => {
                eprintln!("{}", format!("Set {key} = {value}").green());
            }
            Err(e) => {
                eprintln!("{}", format!("Error: {e}").red());
                std::process::exit(1);
            }
        },
        PrefsCommand::List => {
            let items = store.list();
            if items.is_empty() {
                eprintln!("No preferences set.");
                eprintln!("Preferences file: {}", store.path().display());
            } else {
                eprintln!("{}", "Preferences:".bold().blue());
                eprintln!("Preferences file: {}", store.path().display());
                eprintln!();
                for (key, value) in items {
                    println!("{} = {}", key.cyan(), value);
                }
            }
        }
    }

    Ok(())
}

fn config_command(command: ConfigCommand) -> Result<()> {
    let mut manager = ConfigManager::new();

    match command {
        ConfigCommand::Init { force } => {
            config::interactive_init(force)?;
        }
        ConfigCommand::Get { key } => match manager.get(&key) {
            Ok(value) => {
                println!("{value}");
            }
            Err(e) => {
                eprintln!("{}", format!("Error: {e}").red());
                std::process::exit(1);
            }
        },
        ConfigCommand::Set { key, value } => match manager.set(&key, &value) {
            Ok(()) => {
                eprintln!("{}", format!("Set {key} = {value}").green());
                eprintln!(
                    "Configuration saved to: {}",
                    manager.get_config_path().display()
                );
            }
            Err(e) => {
                eprintln!("{}", format!("Error: {e}").red());
                std::process::exit(1);
            }
        },
        ConfigCommand::List => {
            match manager.list() {
                Ok(items) => {
                    if items.is_empty() {
                        eprintln!("No configuration values set. Using defaults.");
                        eprintln!("Config file: {}", manager.get_config_path().display());
                    } else {
                        eprintln!("{}", "Configuration:".bold().blue());
                        eprintln!("Config file: {}", manager.get_config_path().display());
                        eprintln!();

                        // Group items by section
                        let mut sections: std::collections::HashMap<String, Vec<(String, String)>> =
                            std::collections::HashMap::new();

                        for (key, value) in items {
                            let section = key.split('.').next().unwrap_or("general");
                            sections
                                .entry(section.to_string())
                                .or_default()
                                .push((key, value));
                        }

                        // Display by section
                        for (section, mut items) in sections {
                            eprintln!("[{}]", section.yellow());
                            items.sort_by(|a, b| a.0.cmp(&b.0));

                            for (key, value) in items {
                                let key_parts: Vec<&str> = key.split('.').collect();
                                let display_key = key_parts[1..].join(".");
                                eprintln!("  {} = {}", display_key.cyan(), value);
                            }
                            eprintln!();
                        }
                    }
                }
                Err(e) => {
                    eprintln!("{}", format!("Error: {e}").red());
                    std::process::exit(1);
                }
            }
        }
        ConfigCommand::Path => {
            println!("{}", manager.get_config_path().display());
        }
    }

    Ok(())
}

fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();

    generate(shell, &mut cmd, name, &mut std::io::stdout());
}
