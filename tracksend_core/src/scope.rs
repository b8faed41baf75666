//! Authorization scopes for send destinations
//!
//! One scope per destination service. A flow acquires the scopes it needs
//! in a fixed order; the orchestrator walks `SWEEP` and requests the
//! first scope the request still requires.

use std::fmt;

/// Destination service scope requested from the authorization gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Drive,
    Maps,
    FusionTables,
    Spreadsheets,
}

impl Scope {
    /// Fixed acquisition order for the authorization sweep
    pub const SWEEP: [Scope; 4] = [
        Scope::Drive,
        Scope::Maps,
        Scope::FusionTables,
        Scope::Spreadsheets,
    ];

    /// Short stable name used in logs and preference keys
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Drive => "drive",
            Scope::Maps => "maps",
            Scope::FusionTables => "fusiontables",
            Scope::Spreadsheets => "spreadsheets",
        }
    }

    /// The scope evaluated after this one in the sweep
    pub fn next_in_sweep(&self) -> Option<Scope> {
        match self {
            Scope::Drive => Some(Scope::Maps),
            Scope::Maps => Some(Scope::FusionTables),
            Scope::FusionTables => Some(Scope::Spreadsheets),
            Scope::Spreadsheets => None,
        }
    }

    /// Whether this scope resolves through the token contract
    ///
    /// Token-based authorization returns a token or nothing; a missing
    /// token is a denial and no consent follow-up is possible. Maps is
    /// the one scope that works this way.
    pub fn is_token_based(&self) -> bool {
        matches!(self, Scope::Maps)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a scope request, delivered back as an orchestrator callback
///
/// Gateways report transient trouble as `Denied` after logging the
/// cause; the orchestrator treats every denial the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// The scope is available for the account
    Granted,
    /// The user must be taken through a consent surface first
    FollowUp(ConsentFollowUp),
    /// The user or the service refused the scope
    Denied,
}

/// Opaque handle to a consent surface the shell can present
///
/// The orchestrator never inspects the ticket. It hands the follow-up
/// back to the authorization gateway and waits for the final outcome to
/// arrive through `on_authorization_result`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsentFollowUp {
    pub scope: Scope,
    pub ticket: String,
}

impl ConsentFollowUp {
    /// Create a follow-up handle for a scope
    pub fn new(scope: Scope, ticket: &str) -> Self {
        Self {
            scope,
            ticket: ticket.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_starts_with_drive_and_visits_every_scope() {
        assert_eq!(Scope::SWEEP[0], Scope::Drive);
        assert_eq!(Scope::SWEEP.len(), 4);

        let mut seen = vec![Scope::SWEEP[0]];
        let mut current = Scope::SWEEP[0];
        while let Some(next) = current.next_in_sweep() {
            seen.push(next);
            current = next;
        }
        assert_eq!(seen, Scope::SWEEP);
    }

    #[test]
    fn test_sweep_ends_after_spreadsheets() {
        assert_eq!(Scope::Spreadsheets.next_in_sweep(), None);
    }

    #[test]
    fn test_only_maps_is_token_based() {
        assert!(Scope::Maps.is_token_based());
        assert!(!Scope::Drive.is_token_based());
        assert!(!Scope::FusionTables.is_token_based());
        assert!(!Scope::Spreadsheets.is_token_based());
    }

    #[test]
    fn test_scope_display_matches_as_str() {
        for scope in Scope::SWEEP {
            assert_eq!(scope.to_string(), scope.as_str());
        }
    }

    #[test]
    fn test_follow_up_keeps_scope_and_ticket() {
        let follow_up = ConsentFollowUp::new(Scope::Drive, "consent/drive/alice");

        assert_eq!(follow_up.scope, Scope::Drive);
        assert_eq!(follow_up.ticket, "consent/drive/alice");
    }
}
