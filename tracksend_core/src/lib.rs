//! Track Send Core Library
//!
//! This is the core library for sending and sharing recorded tracks
//! through Google services. It walks a chosen account through each
//! requested service's authorization and then dispatches to exactly one
//! terminal action, keeping the user's intent across process tear-down.

pub mod action;
pub mod error;
pub mod gateway;
pub mod orchestrator;
pub mod prefs;
pub mod request;
pub mod scope;
pub mod snapshot;

// Re-export main types
pub use action::{TerminalAction, TrackFileFormat};
pub use error::{Result, SendError};
pub use gateway::{
    AuthorizationGateway, DialogGateway, ExternalActionGateway, PreferencesGateway,
    SyncControlGateway,
};
pub use orchestrator::SendOrchestrator;
pub use prefs::ConfirmKey;
pub use request::{Account, SendRequest};
pub use scope::{AuthOutcome, ConsentFollowUp, Scope};
pub use snapshot::{SEND_REQUEST_STATE_KEY, SNAPSHOT_VERSION};

/// What to do with the device-global automatic sync switch when a flow
/// turns on background sync for an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MasterSyncPolicy {
    /// Leave the global switch as the user set it
    LeaveUntouched,
    /// Force the global switch on so the new registration takes effect
    ForceEnable,
}

/// Core orchestrator configuration
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct OrchestratorConfig {
    pub master_sync: MasterSyncPolicy,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            master_sync: MasterSyncPolicy::LeaveUntouched,
        }
    }
}
