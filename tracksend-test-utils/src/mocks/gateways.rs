//! Mock implementations of the shell gateways
//!
//! Every mock records the calls the orchestrator makes so tests can
//! assert on prompt order, authorization traffic, and hand-offs.
//! Clones share state, so a test can keep a handle for assertions
//! after moving a clone into the orchestrator.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracksend_core::{
    Account, AuthorizationGateway, ConfirmKey, ConsentFollowUp, DialogGateway,
    ExternalActionGateway, PreferencesGateway, Scope, SendRequest, SyncControlGateway,
    TerminalAction,
};

/// In-memory preferences with recorded writes
#[derive(Clone)]
pub struct MockPreferences {
    state: Arc<Mutex<PreferencesState>>,
}

#[derive(Default)]
struct PreferencesState {
    strings: HashMap<String, String>,
    bools: HashMap<String, bool>,
    bool_writes: Vec<(String, bool)>,
}

impl MockPreferences {
    /// Create an empty preference store
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(PreferencesState::default())),
        }
    }

    /// Seed a string preference
    pub fn with_string(self, key: &str, value: &str) -> Self {
        self.set_string(key, value);
        self
    }

    /// Seed a boolean preference
    pub fn with_bool(self, key: &str, value: bool) -> Self {
        self.state
            .lock()
            .unwrap()
            .bools
            .insert(key.to_string(), value);
        self
    }

    /// Change a string preference after construction
    pub fn set_string(&self, key: &str, value: &str) {
        self.state
            .lock()
            .unwrap()
            .strings
            .insert(key.to_string(), value.to_string());
    }

    /// Boolean writes the orchestrator performed, in order
    pub fn bool_writes(&self) -> Vec<(String, bool)> {
        self.state.lock().unwrap().bool_writes.clone()
    }

    /// Whether `key` was ever written with `value`
    pub fn wrote_bool(&self, key: &str, value: bool) -> bool {
        self.state
            .lock()
            .unwrap()
            .bool_writes
            .iter()
            .any(|(written_key, written_value)| written_key == key && *written_value == value)
    }
}

impl Default for MockPreferences {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferencesGateway for MockPreferences {
    fn get_string(&self, key: &str, default: &str) -> String {
        self.state
            .lock()
            .unwrap()
            .strings
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    fn get_bool(&self, key: &str, default: bool) -> bool {
        self.state
            .lock()
            .unwrap()
            .bools
            .get(key)
            .copied()
            .unwrap_or(default)
    }

    fn set_bool(&self, key: &str, value: bool) {
        let mut state = self.state.lock().unwrap();
        state.bools.insert(key.to_string(), value);
        state.bool_writes.push((key.to_string(), value));
    }
}

/// Records authorization traffic without resolving anything
///
/// Gateway calls are dispatch-only, so outcomes never come from the
/// mock; tests deliver them through `on_authorization_result`.
#[derive(Clone)]
pub struct MockAuthorizer {
    state: Arc<Mutex<AuthorizerState>>,
}

#[derive(Default)]
struct AuthorizerState {
    scope_requests: Vec<(String, Scope)>,
    token_requests: Vec<(String, Scope)>,
    follow_ups: Vec<ConsentFollowUp>,
}

impl MockAuthorizer {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(AuthorizerState::default())),
        }
    }

    /// Scopes requested through the consent contract, in order
    pub fn scope_requests(&self) -> Vec<Scope> {
        self.state
            .lock()
            .unwrap()
            .scope_requests
            .iter()
            .map(|(_, scope)| *scope)
            .collect()
    }

    /// Scopes requested through the token contract, in order
    pub fn token_requests(&self) -> Vec<Scope> {
        self.state
            .lock()
            .unwrap()
            .token_requests
            .iter()
            .map(|(_, scope)| *scope)
            .collect()
    }

    /// Account names requests were made for, both contracts, in order
    pub fn requested_accounts(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state
            .scope_requests
            .iter()
            .chain(state.token_requests.iter())
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Follow-ups the orchestrator asked to launch
    pub fn follow_ups(&self) -> Vec<ConsentFollowUp> {
        self.state.lock().unwrap().follow_ups.clone()
    }

    /// Total number of requests across both contracts
    pub fn request_count(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.scope_requests.len() + state.token_requests.len()
    }
}

impl Default for MockAuthorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthorizationGateway for MockAuthorizer {
    fn request_scope(&self, account: &Account, scope: Scope) {
        self.state
            .lock()
            .unwrap()
            .scope_requests
            .push((account.name.clone(), scope));
    }

    fn request_token(&self, account: &Account, scope: Scope) {
        self.state
            .lock()
            .unwrap()
            .token_requests
            .push((account.name.clone(), scope));
    }

    fn launch_follow_up(&self, follow_up: &ConsentFollowUp) {
        self.state
            .lock()
            .unwrap()
            .follow_ups
            .push(follow_up.clone());
    }
}

/// One prompt the orchestrator raised
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptRecord {
    ChooseAccount,
    AddEmails {
        track_id: i64,
    },
    ChooseShareTarget,
    Confirm {
        key: ConfirmKey,
        default_suppress: bool,
        message: String,
        track_id: i64,
    },
}

/// Records every prompt and notice without answering any of them
#[derive(Clone)]
pub struct MockDialogs {
    state: Arc<Mutex<DialogState>>,
}

#[derive(Default)]
struct DialogState {
    prompts: Vec<PromptRecord>,
    failure_notices: usize,
}

impl MockDialogs {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(DialogState::default())),
        }
    }

    /// Every prompt raised, in order
    pub fn prompts(&self) -> Vec<PromptRecord> {
        self.state.lock().unwrap().prompts.clone()
    }

    /// The most recent prompt, if any
    pub fn last_prompt(&self) -> Option<PromptRecord> {
        self.state.lock().unwrap().prompts.last().cloned()
    }

    /// Number of account picker prompts raised
    pub fn account_prompts(&self) -> usize {
        self.state
            .lock()
            .unwrap()
            .prompts
            .iter()
            .filter(|prompt| matches!(prompt, PromptRecord::ChooseAccount))
            .count()
    }

    /// Number of permission failure notices shown
    pub fn failure_notices(&self) -> usize {
        self.state.lock().unwrap().failure_notices
    }
}

impl Default for MockDialogs {
    fn default() -> Self {
        Self::new()
    }
}

impl DialogGateway for MockDialogs {
    fn choose_account(&self) {
        self.state
            .lock()
            .unwrap()
            .prompts
            .push(PromptRecord::ChooseAccount);
    }

    fn add_emails(&self, track_id: i64) {
        self.state
            .lock()
            .unwrap()
            .prompts
            .push(PromptRecord::AddEmails { track_id });
    }

    fn choose_share_target(&self) {
        self.state
            .lock()
            .unwrap()
            .prompts
            .push(PromptRecord::ChooseShareTarget);
    }

    fn confirm(&self, key: ConfirmKey, default_suppress: bool, message: &str, track_id: i64) {
        self.state.lock().unwrap().prompts.push(PromptRecord::Confirm {
            key,
            default_suppress,
            message: message.to_string(),
            track_id,
        });
    }

    fn show_permission_failure(&self) {
        self.state.lock().unwrap().failure_notices += 1;
    }
}

/// Records terminal action hand-offs
#[derive(Clone)]
pub struct MockActions {
    state: Arc<Mutex<Vec<(TerminalAction, SendRequest)>>>,
}

impl MockActions {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every hand-off, with the request it carried, in order
    pub fn launches(&self) -> Vec<(TerminalAction, SendRequest)> {
        self.state.lock().unwrap().clone()
    }

    /// Number of hand-offs performed
    pub fn launch_count(&self) -> usize {
        self.state.lock().unwrap().len()
    }
}

impl Default for MockActions {
    fn default() -> Self {
        Self::new()
    }
}

impl ExternalActionGateway for MockActions {
    fn launch(&self, action: TerminalAction, request: &SendRequest) {
        self.state.lock().unwrap().push((action, request.clone()));
    }
}

/// One recorded sync control call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncCall {
    DisableSync,
    SetMasterSync(bool),
    EnableAccountSync(String),
}

/// Records sync control calls in order
#[derive(Clone)]
pub struct MockSyncControl {
    state: Arc<Mutex<Vec<SyncCall>>>,
}

impl MockSyncControl {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every sync control call, in order
    pub fn calls(&self) -> Vec<SyncCall> {
        self.state.lock().unwrap().clone()
    }
}

impl Default for MockSyncControl {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncControlGateway for MockSyncControl {
    fn disable_sync(&self) {
        self.state.lock().unwrap().push(SyncCall::DisableSync);
    }

    fn set_master_sync(&self, enabled: bool) {
        self.state
            .lock()
            .unwrap()
            .push(SyncCall::SetMasterSync(enabled));
    }

    fn enable_account_sync(&self, account: &Account) {
        self.state
            .lock()
            .unwrap()
            .push(SyncCall::EnableAccountSync(account.name.clone()));
    }
}
