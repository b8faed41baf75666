//! Shared harness for flow tests

use std::sync::Arc;

use tracksend_core::{OrchestratorConfig, Result, SendOrchestrator, prefs};
use tracksend_test_utils::{
    MockActions, MockAuthorizer, MockDialogs, MockPreferences, MockSyncControl,
};

/// Orchestrator wired to recording mocks
///
/// Keeps a handle to every mock so tests can assert on the calls the
/// orchestrator made after driving it through a flow.
pub struct TestShell {
    pub prefs: MockPreferences,
    pub auth: MockAuthorizer,
    pub dialogs: MockDialogs,
    pub actions: MockActions,
    pub sync: MockSyncControl,
    pub orchestrator: SendOrchestrator,
}

impl TestShell {
    pub fn new() -> Self {
        Self::with_config(OrchestratorConfig::default())
    }

    pub fn with_config(config: OrchestratorConfig) -> Self {
        let prefs = MockPreferences::new();
        let auth = MockAuthorizer::new();
        let dialogs = MockDialogs::new();
        let actions = MockActions::new();
        let sync = MockSyncControl::new();
        let orchestrator = SendOrchestrator::new(
            Arc::new(prefs.clone()),
            Arc::new(auth.clone()),
            Arc::new(dialogs.clone()),
            Arc::new(actions.clone()),
            Arc::new(sync.clone()),
            config,
        );
        Self {
            prefs,
            auth,
            dialogs,
            actions,
            sync,
            orchestrator,
        }
    }

    /// Answer the account picker the way the shell does: write the
    /// account-name preference, then deliver the callback.
    pub fn choose_account(&mut self, name: &str) -> Result<()> {
        self.prefs.set_string(prefs::ACCOUNT_NAME, name);
        self.orchestrator.on_account_chosen()
    }
}
