//! Send flow scenario tests
//!
//! These tests drive the orchestrator through complete flows with the
//! recording mocks, delivering each callback the way a shell would
//! after its prompt or authorization request resolves.

use tracksend_core::{
    AuthOutcome, ConsentFollowUp, MasterSyncPolicy, OrchestratorConfig, PreferencesGateway, Scope,
    SendError, SendRequest, TerminalAction, prefs,
};
use tracksend_test_utils::{PromptRecord, SendRequestBuilder, SyncCall};

mod common;
use common::TestShell;

#[cfg(test)]
mod drive_flow_tests {
    use super::*;

    #[test]
    fn test_drive_upload_sweeps_drive_only_and_hands_off() {
        let mut shell = TestShell::new();

        shell
            .orchestrator
            .begin(SendRequest::new(11).with_drive())
            .unwrap();
        assert_eq!(shell.dialogs.account_prompts(), 1);

        shell.choose_account("alice@example.com").unwrap();
        assert_eq!(shell.auth.scope_requests(), vec![Scope::Drive]);

        shell
            .orchestrator
            .on_authorization_result(Scope::Drive, AuthOutcome::Granted)
            .unwrap();

        let launches = shell.actions.launches();
        assert_eq!(launches.len(), 1);
        assert_eq!(launches[0].0, TerminalAction::DriveSend);
        assert_eq!(launches[0].1.track_id(), 11);
        assert_eq!(launches[0].1.account().unwrap().name, "alice@example.com");
        assert_eq!(shell.auth.request_count(), 1);
        assert!(!shell.orchestrator.in_flow());
    }

    #[test]
    fn test_drive_share_collects_recipients_before_hand_off() {
        let mut shell = TestShell::new();

        shell
            .orchestrator
            .begin(SendRequest::new(12).with_drive().with_drive_share())
            .unwrap();
        shell.choose_account("alice@example.com").unwrap();
        shell
            .orchestrator
            .on_authorization_result(Scope::Drive, AuthOutcome::Granted)
            .unwrap();

        assert_eq!(
            shell.dialogs.last_prompt(),
            Some(PromptRecord::AddEmails { track_id: 12 })
        );
        assert_eq!(shell.actions.launch_count(), 0);

        shell
            .orchestrator
            .on_recipients_entered("bob@example.com, carol@example.com")
            .unwrap();

        let launches = shell.actions.launches();
        assert_eq!(launches.len(), 1);
        assert_eq!(launches[0].0, TerminalAction::DriveSend);
        assert_eq!(
            launches[0].1.drive_share_emails(),
            Some("bob@example.com, carol@example.com")
        );
    }

    #[test]
    fn test_empty_recipients_end_the_flow_with_nothing_surfaced() {
        let mut shell = TestShell::new();

        shell
            .orchestrator
            .begin(SendRequest::new(13).with_drive().with_drive_share())
            .unwrap();
        shell.choose_account("alice@example.com").unwrap();
        shell
            .orchestrator
            .on_authorization_result(Scope::Drive, AuthOutcome::Granted)
            .unwrap();

        let error = shell.orchestrator.on_recipients_entered("   ").unwrap_err();

        assert!(matches!(error, SendError::UserCancelled));
        assert_eq!(shell.actions.launch_count(), 0);
        assert_eq!(shell.dialogs.failure_notices(), 0);
        assert!(!shell.orchestrator.in_flow());
    }

    #[test]
    fn test_consent_follow_up_is_launched_and_flow_continues_on_grant() {
        let mut shell = TestShell::new();

        shell
            .orchestrator
            .begin(SendRequest::new(14).with_drive())
            .unwrap();
        shell.choose_account("alice@example.com").unwrap();

        let follow_up = ConsentFollowUp::new(Scope::Drive, "consent/drive/alice");
        shell
            .orchestrator
            .on_authorization_result(Scope::Drive, AuthOutcome::FollowUp(follow_up.clone()))
            .unwrap();

        assert_eq!(shell.auth.follow_ups(), vec![follow_up]);
        assert!(shell.orchestrator.in_flow());
        assert_eq!(shell.actions.launch_count(), 0);

        shell
            .orchestrator
            .on_authorization_result(Scope::Drive, AuthOutcome::Granted)
            .unwrap();

        assert_eq!(shell.actions.launches()[0].0, TerminalAction::DriveSend);
    }
}

#[cfg(test)]
mod sync_flow_tests {
    use super::*;

    #[test]
    fn test_enable_sync_writes_the_preference_and_drives_sync_control() {
        let mut shell = TestShell::new();

        shell
            .orchestrator
            .begin(SendRequest::new(15).with_drive().with_drive_sync())
            .unwrap();
        shell.choose_account("alice@example.com").unwrap();
        shell
            .orchestrator
            .on_authorization_result(Scope::Drive, AuthOutcome::Granted)
            .unwrap();

        assert_eq!(
            shell.prefs.bool_writes(),
            vec![(prefs::DRIVE_SYNC_ENABLED.to_string(), true)]
        );
        assert_eq!(
            shell.sync.calls(),
            vec![
                SyncCall::DisableSync,
                SyncCall::EnableAccountSync("alice@example.com".to_string()),
            ]
        );
        assert_eq!(shell.actions.launch_count(), 0);
        assert!(!shell.orchestrator.in_flow());
    }

    #[test]
    fn test_force_enable_policy_flips_the_master_switch() {
        let mut shell = TestShell::with_config(OrchestratorConfig {
            master_sync: MasterSyncPolicy::ForceEnable,
        });

        shell
            .orchestrator
            .begin(SendRequestBuilder::new(16).with_drive_sync().build())
            .unwrap();
        shell.choose_account("alice@example.com").unwrap();
        shell
            .orchestrator
            .on_authorization_result(Scope::Drive, AuthOutcome::Granted)
            .unwrap();

        assert_eq!(
            shell.sync.calls(),
            vec![
                SyncCall::DisableSync,
                SyncCall::SetMasterSync(true),
                SyncCall::EnableAccountSync("alice@example.com".to_string()),
            ]
        );
        assert!(shell.prefs.wrote_bool(prefs::DRIVE_SYNC_ENABLED, true));
    }
}

#[cfg(test)]
mod maps_flow_tests {
    use super::*;

    #[test]
    fn test_maps_uses_the_token_contract() {
        let mut shell = TestShell::new();

        shell
            .orchestrator
            .begin(SendRequest::new(17).with_maps())
            .unwrap();
        shell.choose_account("alice@example.com").unwrap();

        assert_eq!(shell.auth.token_requests(), vec![Scope::Maps]);
        assert!(shell.auth.scope_requests().is_empty());

        shell
            .orchestrator
            .on_authorization_result(Scope::Maps, AuthOutcome::Granted)
            .unwrap();

        assert_eq!(shell.actions.launches()[0].0, TerminalAction::MapsNew);
    }

    #[test]
    fn test_existing_map_flag_picks_the_existing_map_hand_off() {
        let mut shell = TestShell::new();

        shell
            .orchestrator
            .begin(SendRequest::new(18).with_maps().with_existing_map())
            .unwrap();
        shell.choose_account("alice@example.com").unwrap();
        shell
            .orchestrator
            .on_authorization_result(Scope::Maps, AuthOutcome::Granted)
            .unwrap();

        assert_eq!(shell.actions.launches()[0].0, TerminalAction::MapsExisting);
    }

    #[test]
    fn test_maps_share_asks_for_an_app_and_records_it() {
        let mut shell = TestShell::new();

        shell
            .orchestrator
            .begin(SendRequest::new(19).with_maps().with_maps_share())
            .unwrap();
        shell.choose_account("alice@example.com").unwrap();
        shell
            .orchestrator
            .on_authorization_result(Scope::Maps, AuthOutcome::Granted)
            .unwrap();

        assert_eq!(
            shell.dialogs.last_prompt(),
            Some(PromptRecord::ChooseShareTarget)
        );

        shell
            .orchestrator
            .on_share_target_chosen("com.example.app", "com.example.app.Share")
            .unwrap();

        let launches = shell.actions.launches();
        assert_eq!(launches[0].0, TerminalAction::MapsNew);
        assert_eq!(
            launches[0].1.maps_share_target(),
            Some(("com.example.app", "com.example.app.Share"))
        );
    }

    #[test]
    fn test_unusable_share_target_leaves_the_flow_parked() {
        let mut shell = TestShell::new();

        shell
            .orchestrator
            .begin(SendRequest::new(20).with_maps().with_maps_share())
            .unwrap();
        shell.choose_account("alice@example.com").unwrap();
        shell
            .orchestrator
            .on_authorization_result(Scope::Maps, AuthOutcome::Granted)
            .unwrap();

        shell.orchestrator.on_share_target_chosen("", "").unwrap();

        assert!(shell.orchestrator.in_flow());
        assert_eq!(shell.actions.launch_count(), 0);
    }
}

#[cfg(test)]
mod sweep_order_tests {
    use super::*;

    #[test]
    fn test_public_fusion_tables_need_drive_before_fusion_tables() {
        let mut shell = TestShell::new();

        shell
            .orchestrator
            .begin(SendRequest::new(31).with_fusion_tables())
            .unwrap();
        shell.choose_account("alice@example.com").unwrap();

        // default_table_public defaults on, so Drive fronts the upload
        assert_eq!(shell.auth.scope_requests(), vec![Scope::Drive]);

        shell
            .orchestrator
            .on_authorization_result(Scope::Drive, AuthOutcome::Granted)
            .unwrap();
        assert_eq!(
            shell.auth.scope_requests(),
            vec![Scope::Drive, Scope::FusionTables]
        );

        shell
            .orchestrator
            .on_authorization_result(Scope::FusionTables, AuthOutcome::Granted)
            .unwrap();
        assert_eq!(
            shell.actions.launches()[0].0,
            TerminalAction::FusionTablesSend
        );
    }

    #[test]
    fn test_private_fusion_tables_skip_the_drive_scope() {
        let mut shell = TestShell::new();
        shell.prefs.set_bool(prefs::DEFAULT_TABLE_PUBLIC, false);

        shell
            .orchestrator
            .begin(SendRequest::new(32).with_fusion_tables())
            .unwrap();
        shell.choose_account("alice@example.com").unwrap();

        assert_eq!(shell.auth.scope_requests(), vec![Scope::FusionTables]);
    }

    #[test]
    fn test_full_request_sweeps_in_order_and_ends_in_one_branch() {
        let mut shell = TestShell::new();

        shell
            .orchestrator
            .begin(
                SendRequest::new(33)
                    .with_drive()
                    .with_maps()
                    .with_fusion_tables()
                    .with_spreadsheets(),
            )
            .unwrap();
        shell.choose_account("alice@example.com").unwrap();

        shell
            .orchestrator
            .on_authorization_result(Scope::Drive, AuthOutcome::Granted)
            .unwrap();
        shell
            .orchestrator
            .on_authorization_result(Scope::Maps, AuthOutcome::Granted)
            .unwrap();
        shell
            .orchestrator
            .on_authorization_result(Scope::FusionTables, AuthOutcome::Granted)
            .unwrap();
        shell
            .orchestrator
            .on_authorization_result(Scope::Spreadsheets, AuthOutcome::Granted)
            .unwrap();

        assert_eq!(
            shell.auth.scope_requests(),
            vec![Scope::Drive, Scope::FusionTables, Scope::Spreadsheets]
        );
        assert_eq!(shell.auth.token_requests(), vec![Scope::Maps]);
        assert_eq!(shell.auth.request_count(), 4);
        assert_eq!(
            shell.auth.requested_accounts(),
            vec!["alice@example.com"; 4]
        );

        // drive outranks every other destination in dispatch
        let launches = shell.actions.launches();
        assert_eq!(launches.len(), 1);
        assert_eq!(launches[0].0, TerminalAction::DriveSend);
    }

    #[test]
    fn test_request_with_no_destination_shows_the_upload_result() {
        let mut shell = TestShell::new();

        shell.orchestrator.begin(SendRequest::new(34)).unwrap();
        shell.choose_account("alice@example.com").unwrap();

        assert_eq!(shell.auth.request_count(), 0);
        assert_eq!(shell.actions.launches()[0].0, TerminalAction::UploadResult);
    }
}

#[cfg(test)]
mod abort_and_resume_tests {
    use super::*;

    #[test]
    fn test_denial_shows_one_notice_and_aborts() {
        let mut shell = TestShell::new();

        shell
            .orchestrator
            .begin(SendRequest::new(41).with_drive().with_maps())
            .unwrap();
        shell.choose_account("alice@example.com").unwrap();

        let error = shell
            .orchestrator
            .on_authorization_result(Scope::Drive, AuthOutcome::Denied)
            .unwrap_err();

        assert!(matches!(
            error,
            SendError::PermissionDenied { scope: Scope::Drive }
        ));
        assert_eq!(shell.dialogs.failure_notices(), 1);
        assert_eq!(shell.actions.launch_count(), 0);
        assert!(!shell.orchestrator.in_flow());

        // a late resolution for the dead flow changes nothing
        shell
            .orchestrator
            .on_authorization_result(Scope::Maps, AuthOutcome::Denied)
            .unwrap();
        assert_eq!(shell.dialogs.failure_notices(), 1);
    }

    #[test]
    fn test_unset_account_ends_the_flow_silently() {
        let mut shell = TestShell::new();

        shell
            .orchestrator
            .begin(SendRequest::new(42).with_drive())
            .unwrap();

        let error = shell.orchestrator.on_account_chosen().unwrap_err();

        assert!(matches!(error, SendError::UserCancelled));
        assert_eq!(shell.auth.request_count(), 0);
        assert_eq!(shell.dialogs.failure_notices(), 0);
        assert!(!shell.orchestrator.in_flow());
    }

    #[test]
    fn test_a_new_begin_replaces_an_abandoned_flow() {
        let mut shell = TestShell::new();

        shell
            .orchestrator
            .begin(SendRequest::new(1).with_maps())
            .unwrap();
        // the maps prompt was dismissed; its callback never arrives
        shell
            .orchestrator
            .begin(SendRequest::new(2).with_drive())
            .unwrap();
        shell.choose_account("alice@example.com").unwrap();
        shell
            .orchestrator
            .on_authorization_result(Scope::Drive, AuthOutcome::Granted)
            .unwrap();

        let launches = shell.actions.launches();
        assert_eq!(launches.len(), 1);
        assert_eq!(launches[0].1.track_id(), 2);
        assert_eq!(shell.dialogs.account_prompts(), 2);
    }

    #[test]
    fn test_snapshot_from_another_session_restores_and_finishes() {
        // A parked snapshot can come from a different process with the
        // account already recorded in it.
        let request = SendRequestBuilder::new(22)
            .with_spreadsheets()
            .with_account("alice@example.com")
            .build();
        let blob = tracksend_core::snapshot::encode(&request).unwrap();

        let mut shell = TestShell::new();
        shell.orchestrator.restore_state(&blob).unwrap();
        shell
            .orchestrator
            .on_authorization_result(Scope::Spreadsheets, AuthOutcome::Granted)
            .unwrap();

        let launches = shell.actions.launches();
        assert_eq!(launches[0].0, TerminalAction::SpreadsheetsSend);
        assert_eq!(launches[0].1.account().unwrap().name, "alice@example.com");
    }

    #[test]
    fn test_restored_flow_finishes_without_new_prompts() {
        let mut first = TestShell::new();
        first
            .orchestrator
            .begin(
                SendRequestBuilder::new(21)
                    .with_drive()
                    .with_spreadsheets()
                    .build(),
            )
            .unwrap();
        first.choose_account("alice@example.com").unwrap();
        first
            .orchestrator
            .on_authorization_result(Scope::Drive, AuthOutcome::Granted)
            .unwrap();
        assert_eq!(
            first.auth.scope_requests(),
            vec![Scope::Drive, Scope::Spreadsheets]
        );

        // the process goes away while the spreadsheets request is in
        // flight; only the snapshot survives
        let blob = first.orchestrator.save_state().unwrap();

        let mut second = TestShell::new();
        second.orchestrator.restore_state(&blob).unwrap();
        assert!(second.orchestrator.in_flow());

        second
            .orchestrator
            .on_authorization_result(Scope::Spreadsheets, AuthOutcome::Granted)
            .unwrap();

        assert_eq!(second.auth.request_count(), 0);
        assert_eq!(second.dialogs.account_prompts(), 0);
        let launches = second.actions.launches();
        assert_eq!(launches.len(), 1);
        assert_eq!(launches[0].0, TerminalAction::DriveSend);
        assert_eq!(launches[0].1.account().unwrap().name, "alice@example.com");
    }
}
