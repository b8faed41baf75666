//! Sync control gateway over the preference store
//!
//! Stands in for platform sync machinery: registrations land as
//! preference keys so a later run (or a test) can inspect them.

use colored::Colorize;
use log::debug;
use tracksend_core::{Account, PreferencesGateway, SyncControlGateway};

use crate::prefs_store::FilePreferences;

const SYNC_PERIODIC_REGISTERED: &str = "sync_periodic_registered";
const SYNC_MASTER_ENABLED: &str = "sync_master_enabled";
const SYNC_ACCOUNT: &str = "sync_account";

pub struct LocalSyncControl {
    prefs: FilePreferences,
}

impl LocalSyncControl {
    pub fn new(prefs: FilePreferences) -> Self {
        Self { prefs }
    }
}

impl SyncControlGateway for LocalSyncControl {
    fn disable_sync(&self) {
        debug!("Unregistering periodic sync");
        self.prefs.set_bool(SYNC_PERIODIC_REGISTERED, false);
    }

    fn set_master_sync(&self, enabled: bool) {
        debug!("Master sync switch set to {enabled}");
        self.prefs.set_bool(SYNC_MASTER_ENABLED, enabled);
    }

    fn enable_account_sync(&self, account: &Account) {
        self.prefs.set_bool(SYNC_PERIODIC_REGISTERED, true);
        self.prefs.set_string(SYNC_ACCOUNT, &account.name);
        eprintln!(
            "{}",
            format!("Drive sync enabled for {}", account.name).green()
        );
    }
}
