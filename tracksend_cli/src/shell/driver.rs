//! Interaction driver for send and share flows

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use colored::Colorize;
use dialoguer::{Confirm, Input, Select};
use log::debug;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracksend_core::{
    Account, AuthOutcome, ConfirmKey, ConsentFollowUp, Scope, SendOrchestrator, SendRequest, prefs,
};

use crate::config::{AppConfig, ShareApp};
use crate::prefs_store::FilePreferences;
use crate::shell::actions::ManifestActions;
use crate::shell::authorizer::SimulatedAuthorizer;
use crate::shell::prompts::InteractiveDialogs;
use crate::shell::sync_control::LocalSyncControl;

/// Everything the gateways hand back to the interaction task
pub enum ShellEvent {
    /// A prompt a gateway asked the shell to show
    Prompt(PromptRequest),
    /// An authorization outcome resolved outside the interaction task
    AuthResolved { scope: Scope, outcome: AuthOutcome },
}

pub enum PromptRequest {
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
    /// Consent surface for a scope follow-up
    ScopeConsent {
        follow_up: ConsentFollowUp,
    },
    /// In-gateway consent for a token-based scope
    TokenConsent {
        account: Account,
        scope: Scope,
    },
}

enum Flow {
    Continue,
    Stop,
}

/// Owns the orchestrator and drives one flow to its end
///
/// Prompts are rendered inline. Dismissing one (Esc) delivers no
/// callback, so the flow parks; with a state file configured the
/// parked flow is written out for `send --resume`.
pub struct FlowDriver {
    orchestrator: SendOrchestrator,
    prefs: FilePreferences,
    authorizer: Arc<SimulatedAuthorizer>,
    rx: UnboundedReceiver<ShellEvent>,
    accounts: Vec<String>,
    share_apps: Vec<ShareApp>,
    state_file: Option<PathBuf>,
}

impl FlowDriver {
    pub fn new(config: &AppConfig, state_file: Option<PathBuf>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let prefs = FilePreferences::new();
        let authorizer = Arc::new(SimulatedAuthorizer::new(tx.clone(), prefs.clone()));
        let dialogs = Arc::new(InteractiveDialogs::new(tx));
        let actions = Arc::new(ManifestActions::new());
        let sync = Arc::new(LocalSyncControl::new(prefs.clone()));

        let orchestrator = SendOrchestrator::new(
            Arc::new(prefs.clone()),
            authorizer.clone(),
            dialogs,
            actions,
            sync,
            config.flow.clone(),
        );

        Self {
            orchestrator,
            prefs,
            authorizer,
            rx,
            accounts: config.accounts.available.clone(),
            share_apps: config.share.apps.clone(),
            state_file,
        }
    }

    /// Start a send flow and drive it until it finishes or parks
    pub async fn run_send(mut self, request: SendRequest) -> Result<()> {
        self.ensure_accounts()?;
        self.orchestrator
            .begin(request)
            .context("Could not start the send flow")?;
        self.pump().await
    }

    /// Start a share flow from the confirmation step
    pub async fn run_share(mut self, track_id: i64) -> Result<()> {
        self.ensure_accounts()?;
        self.orchestrator
            .confirm_share(track_id)
            .context("Could not start the share flow")?;
        self.pump().await
    }

    /// Restore a parked flow and drive it from where it left off
    pub async fn run_resume(mut self, blob: &str) -> Result<()> {
        self.ensure_accounts()?;
        self.orchestrator
            .restore_state(blob)
            .context("Could not restore the saved flow")?;
        // The account pick already lives in the preference store, so
        // replaying its callback walks the sweep again. Cached grants
        // resolve silently and the flow stops at the open question.
        let result = self.orchestrator.on_account_chosen();
        Self::note_outcome(result);
        self.pump().await
    }

    fn ensure_accounts(&self) -> Result<()> {
        if self.accounts.is_empty() {
            bail!("No accounts configured. Run 'tracksend config init' first.");
        }
        Ok(())
    }

    /// Drain queued prompts, then wait on resolutions while a flow is
    /// in flight
    async fn pump(mut self) -> Result<()> {
        loop {
            match self.rx.try_recv() {
                Ok(event) => {
                    if matches!(self.handle(event)?, Flow::Stop) {
                        break;
                    }
                    continue;
                }
                Err(mpsc::error::TryRecvError::Empty) => {}
                Err(mpsc::error::TryRecvError::Disconnected) => break,
            }

            if !self.orchestrator.in_flow() {
                break;
            }

            match self.rx.recv().await {
                Some(event) => {
                    if matches!(self.handle(event)?, Flow::Stop) {
                        break;
                    }
                }
                None => break,
            }
        }

        // A flow that ran to its end invalidates any parked snapshot
        if !self.orchestrator.in_flow() {
            self.discard_stale_state();
        }

        Ok(())
    }

    fn handle(&mut self, event: ShellEvent) -> Result<Flow> {
        match event {
            ShellEvent::Prompt(request) => self.render_prompt(request),
            ShellEvent::AuthResolved { scope, outcome } => {
                let result = self.orchestrator.on_authorization_result(scope, outcome);
                Self::note_outcome(result);
                Ok(Flow::Continue)
            }
        }
    }

    fn render_prompt(&mut self, request: PromptRequest) -> Result<Flow> {
        match request {
            PromptRequest::ChooseAccount => self.render_account_picker(),
            PromptRequest::AddEmails { track_id } => {
                let emails: String = Input::new()
                    .with_prompt(format!(
                        "Share track {track_id} with (comma separated emails, empty to skip)"
                    ))
                    .allow_empty(true)
                    .interact_text()
                    .context("Failed to read recipients")?;

                let result = self.orchestrator.on_recipients_entered(emails.trim());
                Self::note_outcome(result);
                Ok(Flow::Continue)
            }
            PromptRequest::ChooseShareTarget => self.render_share_target_picker(),
            PromptRequest::Confirm {
                key,
                default_suppress,
                message,
                track_id,
            } => self.render_confirmation(key, default_suppress, &message, track_id),
            PromptRequest::ScopeConsent { follow_up } => self.render_scope_consent(follow_up),
            PromptRequest::TokenConsent { account, scope } => {
                // Token acquisition is all-or-nothing, so a dismissed
                // prompt counts as a refusal rather than a park
                let allowed = Confirm::new()
                    .with_prompt(format!("Allow {} access for {}?", scope, account.name))
                    .default(true)
                    .interact_opt()
                    .context("Failed to read consent")?
                    .unwrap_or(false);

                self.authorizer.resolve_token(&account, scope, allowed);
                Ok(Flow::Continue)
            }
        }
    }

    fn render_account_picker(&mut self) -> Result<Flow> {
        // A single configured account is chosen without a dialog
        if self.accounts.len() == 1 {
            let name = self.accounts[0].clone();
            eprintln!("Sending as {name}");
            self.prefs.set_string(prefs::ACCOUNT_NAME, &name);
            let result = self.orchestrator.on_account_chosen();
            Self::note_outcome(result);
            return Ok(Flow::Continue);
        }

        let remembered = self.prefs.get(prefs::ACCOUNT_NAME).unwrap_or_default();
        let default_index = self
            .accounts
            .iter()
            .position(|name| *name == remembered)
            .unwrap_or(0);

        let selection = Select::new()
            .with_prompt("Send as")
            .items(&self.accounts)
            .default(default_index)
            .interact_opt()
            .context("Failed to read account choice")?;

        match selection {
            Some(index) => {
                let name = self.accounts[index].clone();
                self.prefs.set_string(prefs::ACCOUNT_NAME, &name);
            }
            None => {
                // Closed without a pick; the callback still fires and
                // reads the unset sentinel
                self.prefs
                    .set_string(prefs::ACCOUNT_NAME, prefs::ACCOUNT_NAME_DEFAULT);
            }
        }

        let cancelled = selection.is_none();
        let result = self.orchestrator.on_account_chosen();
        Self::note_outcome(result);

        if cancelled {
            eprintln!("Cancelled.");
            Ok(Flow::Stop)
        } else {
            Ok(Flow::Continue)
        }
    }

    fn render_share_target_picker(&mut self) -> Result<Flow> {
        // An app without a package and class cannot take the hand-off,
        // so it never reaches the picker
        let usable: Vec<ShareApp> = self
            .share_apps
            .iter()
            .filter(|app| !app.package.is_empty() && !app.class.is_empty())
            .cloned()
            .collect();
        if usable.is_empty() {
            eprintln!("{}", "No share apps configured.".yellow());
            return self.park();
        }

        let labels: Vec<&str> = usable.iter().map(|app| app.label.as_str()).collect();

        let selection = Select::new()
            .with_prompt("Share the map through")
            .items(&labels)
            .default(0)
            .interact_opt()
            .context("Failed to read share app choice")?;

        match selection {
            Some(index) => {
                let app = &usable[index];
                let result = self
                    .orchestrator
                    .on_share_target_chosen(&app.package, &app.class);
                Self::note_outcome(result);
                Ok(Flow::Continue)
            }
            None => self.park(),
        }
    }

    fn render_confirmation(
        &mut self,
        key: ConfirmKey,
        default_suppress: bool,
        message: &str,
        track_id: i64,
    ) -> Result<Flow> {
        eprintln!("{message}");

        let confirmed = Confirm::new()
            .with_prompt("Continue?")
            .default(true)
            .interact_opt()
            .context("Failed to read confirmation")?;

        match confirmed {
            Some(true) => {
                let suppress = Confirm::new()
                    .with_prompt("Don't ask again?")
                    .default(default_suppress)
                    .interact()
                    .context("Failed to read confirmation")?;
                if suppress {
                    use tracksend_core::PreferencesGateway;
                    self.prefs.set_bool(key.suppress_key(), true);
                }

                let result = self.orchestrator.on_confirmed(key, track_id);
                Self::note_outcome(result);
                Ok(Flow::Continue)
            }
            Some(false) | None => {
                // Nothing has begun yet, so there is no flow to park
                eprintln!("Cancelled.");
                Ok(Flow::Stop)
            }
        }
    }

    fn render_scope_consent(&mut self, follow_up: ConsentFollowUp) -> Result<Flow> {
        eprintln!(
            "{}",
            format!("Consent surface: {}", follow_up.ticket).yellow()
        );

        let allowed = Confirm::new()
            .with_prompt(format!("Allow {} access?", follow_up.scope))
            .default(true)
            .interact_opt()
            .context("Failed to read consent")?;

        match allowed {
            Some(granted) => {
                self.authorizer.resolve_follow_up(&follow_up, granted);
                Ok(Flow::Continue)
            }
            None => self.park(),
        }
    }

    /// A dismissed prompt leaves the flow in flight with no callback
    /// coming. Persist it if a state file was given, then stop.
    fn park(&self) -> Result<Flow> {
        if let Some(path) = &self.state_file {
            if let Some(blob) = self.orchestrator.save_state() {
                fs::write(path, blob)
                    .with_context(|| format!("Failed to write state to {}", path.display()))?;
                eprintln!(
                    "Flow parked. Resume with: tracksend send --resume --state {}",
                    path.display()
                );
                return Ok(Flow::Stop);
            }
        }
        eprintln!("Flow parked. Start a new flow to replace it.");
        Ok(Flow::Stop)
    }

    fn discard_stale_state(&self) {
        if let Some(path) = &self.state_file {
            if path.exists() {
                if let Err(error) = fs::remove_file(path) {
                    debug!("Could not remove stale state file: {error}");
                }
            }
        }
    }

    // Callback errors are informational here; every user-facing
    // consequence already happened inside the orchestrator.
    fn note_outcome(result: tracksend_core::Result<()>) {
        if let Err(error) = result {
            debug!("Flow ended: {error}");
        }
    }
}
