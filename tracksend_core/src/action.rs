//! Terminal actions a flow hands off to
//!
//! Every flow ends in exactly one of these. The orchestrator picks the
//! action; the shell owns whatever screen, upload, or file write the
//! action stands for.

use std::fmt;

use serde::{Deserialize, Serialize};

/// File format for a local track export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackFileFormat {
    Gpx,
    Kml,
    Csv,
    Tcx,
}

impl TrackFileFormat {
    /// Resolve a stored format name, falling back to TCX
    ///
    /// Share-target preferences hold either a service name or a format
    /// name. Anything unrecognized lands on TCX rather than failing.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "gpx" => TrackFileFormat::Gpx,
            "kml" => TrackFileFormat::Kml,
            "csv" => TrackFileFormat::Csv,
            _ => TrackFileFormat::Tcx,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrackFileFormat::Gpx => "gpx",
            TrackFileFormat::Kml => "kml",
            TrackFileFormat::Csv => "csv",
            TrackFileFormat::Tcx => "tcx",
        }
    }

    /// File extension for exports in this format
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for TrackFileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The one hand-off a finished flow performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalAction {
    /// Upload the track to Drive, sharing with recipients if recorded
    DriveSend,
    /// Send the track to a map the user picks from their existing maps
    MapsExisting,
    /// Send the track to a freshly created map
    MapsNew,
    /// Upload the track to Fusion Tables
    FusionTablesSend,
    /// Upload the track to Spreadsheets
    SpreadsheetsSend,
    /// Show the outcome summary with nothing left to upload
    UploadResult,
    /// Write the track to a local file and share it
    FileExport(TrackFileFormat),
}

impl TerminalAction {
    /// Short stable name used in logs and hand-off records
    pub fn as_str(&self) -> &'static str {
        match self {
            TerminalAction::DriveSend => "drive-send",
            TerminalAction::MapsExisting => "maps-existing",
            TerminalAction::MapsNew => "maps-new",
            TerminalAction::FusionTablesSend => "fusion-send",
            TerminalAction::SpreadsheetsSend => "sheets-send",
            TerminalAction::UploadResult => "upload-result",
            TerminalAction::FileExport(_) => "file-export",
        }
    }
}

impl fmt::Display for TerminalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
