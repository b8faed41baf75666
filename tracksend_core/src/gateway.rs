//! Gateway traits the shell implements
//!
//! The orchestrator runs on one interaction thread and never blocks.
//! Every gateway call is dispatch-only: it starts platform work and
//! returns immediately. Whatever the user decides later comes back as
//! a fresh orchestrator callback, marshalled by the shell onto the
//! interaction thread.

use crate::action::TerminalAction;
use crate::prefs::ConfirmKey;
use crate::request::{Account, SendRequest};
use crate::scope::{ConsentFollowUp, Scope};

/// Durable key/value preferences
pub trait PreferencesGateway: Send + Sync {
    /// Read a string preference, returning `default` when unset
    fn get_string(&self, key: &str, default: &str) -> String;

    /// Read a boolean preference, returning `default` when unset
    fn get_bool(&self, key: &str, default: bool) -> bool;

    /// Write a boolean preference
    fn set_bool(&self, key: &str, value: bool);
}

/// Per-service authorization
pub trait AuthorizationGateway: Send + Sync {
    /// Start acquiring a scope for the account
    ///
    /// The outcome arrives later through `on_authorization_result`.
    /// Implementations cache grants, so a restored flow walks the
    /// sweep again without prompting for scopes it already holds.
    fn request_scope(&self, account: &Account, scope: Scope);

    /// Start acquiring a token-based scope for the account
    ///
    /// Token acquisition produces a token or nothing, so the outcome
    /// delivered later is `Granted` or `Denied`, never a follow-up.
    fn request_token(&self, account: &Account, scope: Scope);

    /// Present the consent surface a follow-up points at
    ///
    /// The final outcome for the scope arrives through
    /// `on_authorization_result` once the user decides.
    fn launch_follow_up(&self, follow_up: &ConsentFollowUp);
}

/// User-facing prompts
///
/// A dismissed prompt delivers no callback at all. The flow stays
/// parked with its state intact until the user answers a re-shown
/// prompt or starts a new flow over it.
pub trait DialogGateway: Send + Sync {
    /// Ask the user to pick the account to send as
    fn choose_account(&self);

    /// Ask the user for share recipients for a track
    fn add_emails(&self, track_id: i64);

    /// Ask the user to pick the app a map link is shared through
    fn choose_share_target(&self);

    /// Ask the user to confirm a share before it starts
    ///
    /// The prompt carries a "don't ask again" option preset to
    /// `default_suppress`.
    fn confirm(&self, key: ConfirmKey, default_suppress: bool, message: &str, track_id: i64);

    /// Tell the user the flow stopped because permission was refused
    ///
    /// Fire-and-forget notice with no callback.
    fn show_permission_failure(&self);
}

/// Hand-off to the surface that performs the terminal action
pub trait ExternalActionGateway: Send + Sync {
    /// Launch the terminal action for a finished flow
    fn launch(&self, action: TerminalAction, request: &SendRequest);
}

/// Platform sync machinery behind Drive folder sync
pub trait SyncControlGateway: Send + Sync {
    /// Unregister any periodic sync so it restarts cleanly
    fn disable_sync(&self);

    /// Flip the platform-wide automatic sync switch
    fn set_master_sync(&self, enabled: bool);

    /// Register and start periodic sync for the account
    fn enable_account_sync(&self, account: &Account);
}
