//! Preference keys shared between the orchestrator and its shell
//!
//! The orchestrator reads and writes preferences only through the
//! `PreferencesGateway`, always passing a key and a default from this
//! module. Shells that persist preferences use the same keys so the
//! two sides never drift.

use std::fmt;

/// Account name remembered from an earlier flow
pub const ACCOUNT_NAME: &str = "selected_account";
/// Sentinel meaning no account has ever been chosen
pub const ACCOUNT_NAME_DEFAULT: &str = "unset";

/// Whether new Fusion Tables are created publicly visible
pub const DEFAULT_TABLE_PUBLIC: &str = "default_table_public";
pub const DEFAULT_TABLE_PUBLIC_DEFAULT: bool = true;

/// Destination the share entry point currently points at
///
/// Holds `drive`, `maps`, or a track file format name.
pub const SHARE_TARGET: &str = "share_target";
pub const SHARE_TARGET_DRIVE: &str = "drive";
pub const SHARE_TARGET_MAPS: &str = "maps";
pub const SHARE_TARGET_DEFAULT: &str = SHARE_TARGET_DRIVE;

/// Whether Drive folder sync has been switched on
pub const DRIVE_SYNC_ENABLED: &str = "drive_sync_enabled";
pub const DRIVE_SYNC_ENABLED_DEFAULT: bool = false;

/// Which share confirmation a prompt or suppression applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfirmKey {
    Drive,
    Maps,
    File,
}

impl ConfirmKey {
    /// Preference key holding the "don't ask again" flag
    pub fn suppress_key(&self) -> &'static str {
        match self {
            ConfirmKey::Drive => "confirm_share_drive_suppressed",
            ConfirmKey::Maps => "confirm_share_maps_suppressed",
            ConfirmKey::File => "confirm_share_file_suppressed",
        }
    }

    /// Default for the suppression flag: always ask until told not to
    pub fn default_suppress(&self) -> bool {
        false
    }

    /// Message shown when the confirmation is not suppressed
    pub fn message(&self) -> &'static str {
        match self {
            ConfirmKey::Drive => {
                "This track will be uploaded to Google Drive and shared with the people you choose."
            }
            ConfirmKey::Maps => {
                "This track will be uploaded to Google Maps and the map link shared."
            }
            ConfirmKey::File => "The track file will be saved and shared with another app.",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfirmKey::Drive => "drive",
            ConfirmKey::Maps => "maps",
            ConfirmKey::File => "file",
        }
    }
}

impl fmt::Display for ConfirmKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
