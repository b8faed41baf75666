//! Send request model
//!
//! A `SendRequest` captures everything one flow needs to know about the
//! user's intent: which track, which identity, which destinations, and
//! the destination-specific choices collected along the way. The whole
//! request serializes, so a flow can survive process tear-down.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SendError};

/// Provider tag attached to every account an orchestrator selects
pub const ACCOUNT_PROVIDER: &str = "google";

/// Identity the flow sends as
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub name: String,
    pub provider: String,
}

impl Account {
    /// Create an account for the fixed provider
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            provider: ACCOUNT_PROVIDER.to_string(),
        }
    }
}

/// One user's intent to send a recorded track
///
/// Built with the consuming `with_*` methods, then enriched by the
/// orchestrator as callbacks deliver the user's choices. Fields stay
/// private so every mutation passes through a named operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendRequest {
    track_id: i64,
    account: Option<Account>,
    send_drive: bool,
    send_maps: bool,
    send_fusion_tables: bool,
    send_spreadsheets: bool,
    drive_enable_sync: bool,
    drive_share: bool,
    maps_share: bool,
    maps_existing_map: bool,
    drive_share_emails: Option<String>,
    maps_share_package: Option<String>,
    maps_share_class: Option<String>,
}

impl SendRequest {
    /// Create a request for a track with no destinations selected
    pub fn new(track_id: i64) -> Self {
        Self {
            track_id,
            account: None,
            send_drive: false,
            send_maps: false,
            send_fusion_tables: false,
            send_spreadsheets: false,
            drive_enable_sync: false,
            drive_share: false,
            maps_share: false,
            maps_existing_map: false,
            drive_share_emails: None,
            maps_share_package: None,
            maps_share_class: None,
        }
    }

    /// Target Google Drive
    pub fn with_drive(mut self) -> Self {
        self.send_drive = true;
        self
    }

    /// Target Google Maps
    pub fn with_maps(mut self) -> Self {
        self.send_maps = true;
        self
    }

    /// Target Google Fusion Tables
    pub fn with_fusion_tables(mut self) -> Self {
        self.send_fusion_tables = true;
        self
    }

    /// Target Google Spreadsheets
    pub fn with_spreadsheets(mut self) -> Self {
        self.send_spreadsheets = true;
        self
    }

    /// Enable folder sync instead of a one-shot Drive send
    pub fn with_drive_sync(mut self) -> Self {
        self.drive_enable_sync = true;
        self
    }

    /// Share the Drive file with recipients collected later
    pub fn with_drive_share(mut self) -> Self {
        self.drive_share = true;
        self
    }

    /// Share the map through an app chosen later
    pub fn with_maps_share(mut self) -> Self {
        self.maps_share = true;
        self
    }

    /// Send to a map the user already owns instead of a new one
    pub fn with_existing_map(mut self) -> Self {
        self.maps_existing_map = true;
        self
    }

    /// Record the identity the user picked
    pub fn set_account(&mut self, account: Account) {
        self.account = Some(account);
    }

    /// Record the recipients for a Drive share
    pub fn set_drive_share_emails(&mut self, emails: &str) {
        self.drive_share_emails = Some(emails.to_string());
    }

    /// Record the app a map link will be shared through
    pub fn set_maps_share_target(&mut self, package: &str, class: &str) {
        self.maps_share_package = Some(package.to_string());
        self.maps_share_class = Some(class.to_string());
    }

    pub fn track_id(&self) -> i64 {
        self.track_id
    }

    pub fn account(&self) -> Option<&Account> {
        self.account.as_ref()
    }

    pub fn send_drive(&self) -> bool {
        self.send_drive
    }

    pub fn send_maps(&self) -> bool {
        self.send_maps
    }

    pub fn send_fusion_tables(&self) -> bool {
        self.send_fusion_tables
    }

    pub fn send_spreadsheets(&self) -> bool {
        self.send_spreadsheets
    }

    pub fn drive_enable_sync(&self) -> bool {
        self.drive_enable_sync
    }

    pub fn drive_share(&self) -> bool {
        self.drive_share
    }

    pub fn maps_share(&self) -> bool {
        self.maps_share
    }

    pub fn maps_existing_map(&self) -> bool {
        self.maps_existing_map
    }

    pub fn drive_share_emails(&self) -> Option<&str> {
        self.drive_share_emails.as_deref()
    }

    pub fn maps_share_target(&self) -> Option<(&str, &str)> {
        match (&self.maps_share_package, &self.maps_share_class) {
            (Some(package), Some(class)) => Some((package, class)),
            _ => None,
        }
    }

    /// Check the cross-field rules a request must satisfy
    ///
    /// Run before a flow starts and again after a snapshot is decoded,
    /// so a tampered or stale snapshot cannot smuggle in a combination
    /// the dispatch ladder does not handle.
    pub fn validate(&self) -> Result<()> {
        if self.drive_enable_sync && self.drive_share {
            return Err(SendError::invariant(
                "drive sync and drive share are mutually exclusive",
            ));
        }
        if self.drive_share && !self.send_drive {
            return Err(SendError::invariant(
                "drive share requires sending to drive",
            ));
        }
        if self.drive_enable_sync && !self.send_drive {
            return Err(SendError::invariant(
                "drive sync requires sending to drive",
            ));
        }
        if self.maps_share && !self.send_maps {
            return Err(SendError::invariant(
                "maps share requires sending to maps",
            ));
        }
        if self.maps_existing_map && !self.send_maps {
            return Err(SendError::invariant(
                "existing map selection requires sending to maps",
            ));
        }
        if self.drive_share_emails.is_some() && !self.drive_share {
            return Err(SendError::invariant(
                "share recipients require drive share",
            ));
        }
        if self.maps_share_package.is_some() != self.maps_share_class.is_some() {
            return Err(SendError::invariant(
                "share app package and class must be set together",
            ));
        }
        Ok(())
    }
}
