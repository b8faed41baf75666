//! Simulated authorization gateway
//!
//! Grants persist in the preference store, so a restored flow resolves
//! scopes it already holds without prompting again. Outcomes are sent
//! from a spawned task through the driver channel, never by calling
//! back into the orchestrator from inside a gateway call.

use std::time::Duration;

use log::debug;
use tokio::sync::mpsc::UnboundedSender;
use tracksend_core::{
    Account, AuthOutcome, AuthorizationGateway, ConsentFollowUp, PreferencesGateway, Scope,
};

use crate::prefs_store::FilePreferences;
use crate::shell::driver::{PromptRequest, ShellEvent};

pub struct SimulatedAuthorizer {
    tx: UnboundedSender<ShellEvent>,
    prefs: FilePreferences,
}

impl SimulatedAuthorizer {
    pub fn new(tx: UnboundedSender<ShellEvent>, prefs: FilePreferences) -> Self {
        Self { tx, prefs }
    }

    fn grant_key(scope: Scope) -> String {
        format!("scope_granted_{scope}")
    }

    fn is_granted(&self, scope: Scope) -> bool {
        self.prefs.get_bool(&Self::grant_key(scope), false)
    }

    fn record_grant(&self, scope: Scope) {
        self.prefs.set_bool(&Self::grant_key(scope), true);
    }

    fn send_later(&self, scope: Scope, outcome: AuthOutcome) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            // Resolutions come back from outside the interaction task
            tokio::time::sleep(Duration::from_millis(50)).await;
            let _ = tx.send(ShellEvent::AuthResolved { scope, outcome });
        });
    }

    /// Deliver the user's decision for a consent follow-up
    pub fn resolve_follow_up(&self, follow_up: &ConsentFollowUp, granted: bool) {
        if granted {
            self.record_grant(follow_up.scope);
            self.send_later(follow_up.scope, AuthOutcome::Granted);
        } else {
            self.send_later(follow_up.scope, AuthOutcome::Denied);
        }
    }

    /// Deliver the user's decision for a token prompt
    pub fn resolve_token(&self, account: &Account, scope: Scope, granted: bool) {
        debug!(
            "Token for {} as {}: {}",
            scope,
            account.name,
            if granted { "granted" } else { "denied" }
        );
        if granted {
            self.record_grant(scope);
            self.send_later(scope, AuthOutcome::Granted);
        } else {
            self.send_later(scope, AuthOutcome::Denied);
        }
    }
}

impl AuthorizationGateway for SimulatedAuthorizer {
    fn request_scope(&self, account: &Account, scope: Scope) {
        if self.is_granted(scope) {
            debug!("Scope {} already granted for {}", scope, account.name);
            self.send_later(scope, AuthOutcome::Granted);
        } else {
            let ticket = format!("consent/{}/{}", scope, account.name);
            self.send_later(scope, AuthOutcome::FollowUp(ConsentFollowUp::new(scope, &ticket)));
        }
    }

    fn request_token(&self, account: &Account, scope: Scope) {
        if self.is_granted(scope) {
            self.send_later(scope, AuthOutcome::Granted);
        } else {
            // Token acquisition prompts inside the gateway; the
            // orchestrator only ever sees a token or nothing
            let _ = self.tx.send(ShellEvent::Prompt(PromptRequest::TokenConsent {
                account: account.clone(),
                scope,
            }));
        }
    }

    fn launch_follow_up(&self, follow_up: &ConsentFollowUp) {
        let _ = self.tx.send(ShellEvent::Prompt(PromptRequest::ScopeConsent {
            follow_up: follow_up.clone(),
        }));
    }
}
