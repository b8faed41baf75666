//! Terminal action gateway that records hand-offs
//!
//! A real shell would launch another surface here. The CLI prints the
//! hand-off and appends it to a JSON-lines manifest under the data
//! dir, one record per finished flow.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use chrono::Utc;
use colored::Colorize;
use log::warn;
use serde_json::json;
use tracksend_core::{ExternalActionGateway, SendRequest, TerminalAction};

pub struct ManifestActions {
    manifest_path: PathBuf,
}

impl ManifestActions {
    pub fn new() -> Self {
        Self {
            manifest_path: Self::default_manifest_path(),
        }
    }

    fn default_manifest_path() -> PathBuf {
        #[cfg(not(target_os = "windows"))]
        if let Ok(xdg_data) = std::env::var("XDG_DATA_HOME") {
            return PathBuf::from(xdg_data).join("tracksend/handoffs.jsonl");
        }

        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tracksend/handoffs.jsonl")
    }

    fn append_line(&self, line: &str) -> std::io::Result<()> {
        if let Some(parent) = self.manifest_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.manifest_path)?;
        writeln!(file, "{line}")
    }
}

impl ExternalActionGateway for ManifestActions {
    fn launch(&self, action: TerminalAction, request: &SendRequest) {
        let summary = match action {
            TerminalAction::FileExport(format) => {
                format!("Exporting track {} as {}", request.track_id(), format)
            }
            TerminalAction::UploadResult => {
                format!("Nothing left to upload for track {}", request.track_id())
            }
            _ => format!("Launching {} for track {}", action, request.track_id()),
        };
        eprintln!("{}", summary.green());

        let record = json!({
            "at": Utc::now().to_rfc3339(),
            "action": action.as_str(),
            "track_id": request.track_id(),
            "account": request.account().map(|account| account.name.clone()),
            "emails": request.drive_share_emails(),
            "share_app": request
                .maps_share_target()
                .map(|(package, class)| format!("{package}/{class}")),
            "file": match action {
                TerminalAction::FileExport(format) => Some(format!(
                    "track{}.{}",
                    request.track_id(),
                    format.extension()
                )),
                _ => None,
            },
        });

        if let Err(error) = self.append_line(&record.to_string()) {
            warn!("Failed to record hand-off: {error}");
        }
    }
}
