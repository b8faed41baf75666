//! Send flow orchestration
//!
//! `SendOrchestrator` drives one send or share flow at a time: pick an
//! identity, sweep the authorizations the request needs, then hand off
//! to exactly one terminal action. It runs on the interaction thread
//! and keeps no pending work between callbacks; the only state held
//! between calls is the current request, which is why the request
//! alone is enough to park, snapshot, and resume a flow.

use std::sync::Arc;

use log::{debug, info, warn};

use crate::action::{TerminalAction, TrackFileFormat};
use crate::error::{Result, SendError};
use crate::gateway::{
    AuthorizationGateway, DialogGateway, ExternalActionGateway, PreferencesGateway,
    SyncControlGateway,
};
use crate::prefs::{self, ConfirmKey};
use crate::request::{Account, SendRequest};
use crate::scope::{AuthOutcome, Scope};
use crate::snapshot;
use crate::{MasterSyncPolicy, OrchestratorConfig};

/// Orchestrates the interactive send and share flows
pub struct SendOrchestrator {
    prefs: Arc<dyn PreferencesGateway>,
    auth: Arc<dyn AuthorizationGateway>,
    dialogs: Arc<dyn DialogGateway>,
    actions: Arc<dyn ExternalActionGateway>,
    sync: Arc<dyn SyncControlGateway>,
    config: OrchestratorConfig,
    current: Option<SendRequest>,
}

impl SendOrchestrator {
    /// Create an orchestrator over the shell's gateways
    pub fn new(
        prefs: Arc<dyn PreferencesGateway>,
        auth: Arc<dyn AuthorizationGateway>,
        dialogs: Arc<dyn DialogGateway>,
        actions: Arc<dyn ExternalActionGateway>,
        sync: Arc<dyn SyncControlGateway>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            prefs,
            auth,
            dialogs,
            actions,
            sync,
            config,
            current: None,
        }
    }

    /// Whether a flow is currently in flight
    pub fn in_flow(&self) -> bool {
        self.current.is_some()
    }

    /// Start a send flow for a validated request
    ///
    /// A flow already in flight is abandoned; its prompt, if any, was
    /// dismissed and its callback will never arrive.
    pub fn begin(&mut self, request: SendRequest) -> Result<()> {
        request.validate()?;
        if let Some(stale) = self.current.take() {
            warn!(
                "Abandoning in-flight send flow for track {}",
                stale.track_id()
            );
        }
        info!("Starting send flow for track {}", request.track_id());
        self.current = Some(request);
        self.dialogs.choose_account();
        Ok(())
    }

    /// Snapshot the live request, or `None` when idle
    pub fn save_state(&self) -> Option<String> {
        let request = self.current.as_ref()?;
        match snapshot::encode(request) {
            Ok(blob) => Some(blob),
            Err(error) => {
                warn!("Failed to snapshot send flow: {error}");
                None
            }
        }
    }

    /// Restore a flow from a snapshot
    ///
    /// The restored flow resumes on whatever callback arrives next.
    pub fn restore_state(&mut self, blob: &str) -> Result<()> {
        let request = snapshot::decode(blob)?;
        if let Some(stale) = self.current.take() {
            warn!(
                "Abandoning in-flight send flow for track {}",
                stale.track_id()
            );
        }
        info!("Restored send flow for track {}", request.track_id());
        self.current = Some(request);
        Ok(())
    }

    /// Callback: the account picker closed
    ///
    /// The chosen name is read from the account-name preference the
    /// picker wrote. The unset sentinel ends the flow silently.
    pub fn on_account_chosen(&mut self) -> Result<()> {
        if self.current.is_none() {
            warn!("Ignoring account choice with no flow in flight");
            return Ok(());
        }
        let name = self
            .prefs
            .get_string(prefs::ACCOUNT_NAME, prefs::ACCOUNT_NAME_DEFAULT);
        if name == prefs::ACCOUNT_NAME_DEFAULT {
            debug!("No account selected, ending flow silently");
            self.current = None;
            return Err(SendError::UserCancelled);
        }
        if let Some(request) = self.current.as_mut() {
            request.set_account(Account::new(&name));
        }
        self.advance_sweep(None)
    }

    /// Callback: the authorization gateway resolved `scope`
    pub fn on_authorization_result(&mut self, scope: Scope, outcome: AuthOutcome) -> Result<()> {
        if self.current.is_none() {
            warn!("Ignoring {scope} authorization result with no flow in flight");
            return Ok(());
        }
        match outcome {
            AuthOutcome::Granted => {
                debug!("Authorization granted for {scope}");
                self.advance_sweep(Some(scope))
            }
            AuthOutcome::FollowUp(follow_up) => {
                debug!("Authorization for {scope} needs user consent");
                self.auth.launch_follow_up(&follow_up);
                Ok(())
            }
            AuthOutcome::Denied => {
                info!("Authorization denied for {scope}, ending flow");
                self.dialogs.show_permission_failure();
                self.current = None;
                Err(SendError::permission_denied(scope))
            }
        }
    }

    /// Callback: the share recipients prompt closed
    ///
    /// Empty input ends the flow with nothing surfaced.
    pub fn on_recipients_entered(&mut self, emails: &str) -> Result<()> {
        if self.current.is_none() {
            warn!("Ignoring share recipients with no flow in flight");
            return Ok(());
        }
        if emails.trim().is_empty() {
            debug!("No share recipients entered, ending flow silently");
            self.current = None;
            return Err(SendError::UserCancelled);
        }
        if let Some(request) = self.current.as_mut() {
            request.set_drive_share_emails(emails);
        }
        self.hand_off(TerminalAction::DriveSend)
    }

    /// Callback: the share app picker closed with a target
    pub fn on_share_target_chosen(&mut self, package: &str, class: &str) -> Result<()> {
        if self.current.is_none() {
            warn!("Ignoring share target with no flow in flight");
            return Ok(());
        }
        if package.is_empty() || class.is_empty() {
            warn!("Share target missing package or class, leaving flow parked");
            return Ok(());
        }
        let action = if let Some(request) = self.current.as_mut() {
            request.set_maps_share_target(package, class);
            if request.maps_existing_map() {
                TerminalAction::MapsExisting
            } else {
                TerminalAction::MapsNew
            }
        } else {
            return Ok(());
        };
        self.hand_off(action)
    }

    /// Entry point for the share shortcut
    ///
    /// Reads the share-target preference, then either asks the user to
    /// confirm or, when the confirmation is suppressed, continues as
    /// if they had.
    pub fn confirm_share(&mut self, track_id: i64) -> Result<()> {
        let target = self
            .prefs
            .get_string(prefs::SHARE_TARGET, prefs::SHARE_TARGET_DEFAULT);
        let key = match target.as_str() {
            prefs::SHARE_TARGET_DRIVE => ConfirmKey::Drive,
            prefs::SHARE_TARGET_MAPS => ConfirmKey::Maps,
            _ => ConfirmKey::File,
        };
        if self.prefs.get_bool(key.suppress_key(), key.default_suppress()) {
            debug!("Share confirmation for {key} suppressed, continuing");
            return self.on_confirmed(key, track_id);
        }
        debug!("Asking to confirm a {key} share for track {track_id}");
        self.dialogs
            .confirm(key, key.default_suppress(), key.message(), track_id);
        Ok(())
    }

    /// Callback: the user confirmed a share
    pub fn on_confirmed(&mut self, key: ConfirmKey, track_id: i64) -> Result<()> {
        match key {
            ConfirmKey::Drive => {
                info!(target: "tracksend::telemetry", "page view: /action/share_drive");
                self.begin(SendRequest::new(track_id).with_drive().with_drive_share())
            }
            ConfirmKey::Maps => {
                info!(target: "tracksend::telemetry", "page view: /action/share_maps");
                self.begin(SendRequest::new(track_id).with_maps().with_maps_share())
            }
            ConfirmKey::File => {
                let target = self
                    .prefs
                    .get_string(prefs::SHARE_TARGET, prefs::SHARE_TARGET_DEFAULT);
                let format = TrackFileFormat::from_name(&target);
                info!("Handing off file export ({format}) for track {track_id}");
                self.actions
                    .launch(TerminalAction::FileExport(format), &SendRequest::new(track_id));
                Ok(())
            }
        }
    }

    /// Request the next scope the flow still needs, or dispatch
    ///
    /// Walks the sweep order from the position after `after`; `None`
    /// starts from the beginning.
    fn advance_sweep(&mut self, after: Option<Scope>) -> Result<()> {
        let mut next = match after {
            Some(scope) => scope.next_in_sweep(),
            None => Some(Scope::SWEEP[0]),
        };
        while let Some(scope) = next {
            if self.scope_required(scope) {
                return self.request_scope(scope);
            }
            next = scope.next_in_sweep();
        }
        self.dispatch()
    }

    fn scope_required(&self, scope: Scope) -> bool {
        let request = match self.current.as_ref() {
            Some(request) => request,
            None => return false,
        };
        match scope {
            // Drive also fronts spreadsheet uploads and the table
            // uploads that publish a public KML file.
            Scope::Drive => {
                request.send_drive()
                    || request.send_spreadsheets()
                    || (request.send_fusion_tables()
                        && self.prefs.get_bool(
                            prefs::DEFAULT_TABLE_PUBLIC,
                            prefs::DEFAULT_TABLE_PUBLIC_DEFAULT,
                        ))
            }
            Scope::Maps => request.send_maps(),
            Scope::FusionTables => request.send_fusion_tables(),
            Scope::Spreadsheets => request.send_spreadsheets(),
        }
    }

    fn request_scope(&mut self, scope: Scope) -> Result<()> {
        let account = self
            .current
            .as_ref()
            .and_then(|request| request.account())
            .cloned();
        let account = match account {
            Some(account) => account,
            None => {
                self.current = None;
                return Err(SendError::invariant("sweep started without an account"));
            }
        };
        debug!("Requesting {} authorization for {}", scope, account.name);
        if scope.is_token_based() {
            self.auth.request_token(&account, scope);
        } else {
            self.auth.request_scope(&account, scope);
        }
        Ok(())
    }

    /// Pick the single branch a fully authorized flow ends in
    fn dispatch(&mut self) -> Result<()> {
        let request = match self.current.as_ref() {
            Some(request) => request,
            None => {
                warn!("Dispatch reached with no flow in flight");
                return Ok(());
            }
        };
        debug_assert!(request.validate().is_ok());

        if request.send_drive() && request.drive_enable_sync() {
            return self.enable_drive_sync();
        }
        if request.send_drive() && request.drive_share() {
            debug!("Asking for share recipients for track {}", request.track_id());
            self.dialogs.add_emails(request.track_id());
            return Ok(());
        }
        if request.send_drive() {
            return self.hand_off(TerminalAction::DriveSend);
        }
        if request.send_maps() && request.maps_share() {
            debug!("Asking for a share app for track {}", request.track_id());
            self.dialogs.choose_share_target();
            return Ok(());
        }
        if request.send_maps() {
            let action = if request.maps_existing_map() {
                TerminalAction::MapsExisting
            } else {
                TerminalAction::MapsNew
            };
            return self.hand_off(action);
        }
        if request.send_fusion_tables() {
            return self.hand_off(TerminalAction::FusionTablesSend);
        }
        if request.send_spreadsheets() {
            return self.hand_off(TerminalAction::SpreadsheetsSend);
        }
        self.hand_off(TerminalAction::UploadResult)
    }

    /// Terminal sync-enable branch; ends the flow with no hand-off
    fn enable_drive_sync(&mut self) -> Result<()> {
        let request = match self.current.take() {
            Some(request) => request,
            None => return Ok(()),
        };
        let account = match request.account() {
            Some(account) => account.clone(),
            None => {
                return Err(SendError::invariant("sync enabled without an account"));
            }
        };
        info!("Enabling drive sync as {}", account.name);
        self.prefs.set_bool(prefs::DRIVE_SYNC_ENABLED, true);
        self.sync.disable_sync();
        match self.config.master_sync {
            MasterSyncPolicy::ForceEnable => self.sync.set_master_sync(true),
            MasterSyncPolicy::LeaveUntouched => {
                debug!("Leaving the platform master sync switch untouched");
            }
        }
        self.sync.enable_account_sync(&account);
        Ok(())
    }

    /// Launch the terminal action and end the flow
    fn hand_off(&mut self, action: TerminalAction) -> Result<()> {
        let request = match self.current.take() {
            Some(request) => request,
            None => {
                warn!("Hand-off reached with no flow in flight");
                return Ok(());
            }
        };
        info!("Handing off {} for track {}", action, request.track_id());
        self.actions.launch(action, &request);
        Ok(())
    }
}
