//! Dialog gateway that forwards prompts to the driver
//!
//! Prompt calls arrive while an orchestrator callback is still on the
//! stack, so nothing is rendered here. Each request is queued and the
//! driver shows it once the callback returns.

use colored::Colorize;
use tokio::sync::mpsc::UnboundedSender;
use tracksend_core::{ConfirmKey, DialogGateway};

use crate::shell::driver::{PromptRequest, ShellEvent};

pub struct InteractiveDialogs {
    tx: UnboundedSender<ShellEvent>,
}

impl InteractiveDialogs {
    pub fn new(tx: UnboundedSender<ShellEvent>) -> Self {
        Self { tx }
    }

    fn queue(&self, request: PromptRequest) {
        let _ = self.tx.send(ShellEvent::Prompt(request));
    }
}

impl DialogGateway for InteractiveDialogs {
    fn choose_account(&self) {
        self.queue(PromptRequest::ChooseAccount);
    }

    fn add_emails(&self, track_id: i64) {
        self.queue(PromptRequest::AddEmails { track_id });
    }

    fn choose_share_target(&self) {
        self.queue(PromptRequest::ChooseShareTarget);
    }

    fn confirm(&self, key: ConfirmKey, default_suppress: bool, message: &str, track_id: i64) {
        self.queue(PromptRequest::Confirm {
            key,
            default_suppress,
            message: message.to_string(),
            track_id,
        });
    }

    fn show_permission_failure(&self) {
        // Fire-and-forget notice, shown right away
        eprintln!(
            "{}",
            "Permission was not granted. The track was not sent.".red()
        );
    }
}
