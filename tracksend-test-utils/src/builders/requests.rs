//! Builders for send requests used in flow tests

use tracksend_core::{Account, SendRequest};

/// Builder for send requests at any point in a flow
///
/// Thin layer over the request's own builders that can also seed the
/// fields a flow normally records mid-way (account, recipients, share
/// app), so tests can start from a restored or partially completed
/// flow.
pub struct SendRequestBuilder {
    track_id: i64,
    drive: bool,
    maps: bool,
    fusion_tables: bool,
    spreadsheets: bool,
    drive_sync: bool,
    drive_share: bool,
    maps_share: bool,
    existing_map: bool,
    account: Option<String>,
    emails: Option<String>,
    share_app: Option<(String, String)>,
}

impl SendRequestBuilder {
    /// Create a builder for a track
    pub fn new(track_id: i64) -> Self {
        Self {
            track_id,
            drive: false,
            maps: false,
            fusion_tables: false,
            spreadsheets: false,
            drive_sync: false,
            drive_share: false,
            maps_share: false,
            existing_map: false,
            account: None,
            emails: None,
            share_app: None,
        }
    }

    /// Target Drive
    pub fn with_drive(mut self) -> Self {
        self.drive = true;
        self
    }

    /// Target Maps
    pub fn with_maps(mut self) -> Self {
        self.maps = true;
        self
    }

    /// Target Fusion Tables
    pub fn with_fusion_tables(mut self) -> Self {
        self.fusion_tables = true;
        self
    }

    /// Target Spreadsheets
    pub fn with_spreadsheets(mut self) -> Self {
        self.spreadsheets = true;
        self
    }

    /// Enable folder sync (implies targeting Drive)
    pub fn with_drive_sync(mut self) -> Self {
        self.drive = true;
        self.drive_sync = true;
        self
    }

    /// Share the Drive file (implies targeting Drive)
    pub fn with_drive_share(mut self) -> Self {
        self.drive = true;
        self.drive_share = true;
        self
    }

    /// Share the map (implies targeting Maps)
    pub fn with_maps_share(mut self) -> Self {
        self.maps = true;
        self.maps_share = true;
        self
    }

    /// Send to an existing map (implies targeting Maps)
    pub fn with_existing_map(mut self) -> Self {
        self.maps = true;
        self.existing_map = true;
        self
    }

    /// Seed the account a flow would have recorded
    pub fn with_account(mut self, name: &str) -> Self {
        self.account = Some(name.to_string());
        self
    }

    /// Seed recorded share recipients
    pub fn with_emails(mut self, emails: &str) -> Self {
        self.drive = true;
        self.drive_share = true;
        self.emails = Some(emails.to_string());
        self
    }

    /// Seed a recorded share app
    pub fn with_share_app(mut self, package: &str, class: &str) -> Self {
        self.maps = true;
        self.maps_share = true;
        self.share_app = Some((package.to_string(), class.to_string()));
        self
    }

    /// Build the request
    pub fn build(self) -> SendRequest {
        let mut request = SendRequest::new(self.track_id);
        if self.drive {
            request = request.with_drive();
        }
        if self.maps {
            request = request.with_maps();
        }
        if self.fusion_tables {
            request = request.with_fusion_tables();
        }
        if self.spreadsheets {
            request = request.with_spreadsheets();
        }
        if self.drive_sync {
            request = request.with_drive_sync();
        }
        if self.drive_share {
            request = request.with_drive_share();
        }
        if self.maps_share {
            request = request.with_maps_share();
        }
        if self.existing_map {
            request = request.with_existing_map();
        }
        if let Some(name) = self.account {
            request.set_account(Account::new(&name));
        }
        if let Some(emails) = self.emails {
            request.set_drive_share_emails(&emails);
        }
        if let Some((package, class)) = self.share_app {
            request.set_maps_share_target(&package, &class);
        }
        request
    }
}
