//! Mock gateway implementations for testing

mod gateways;

pub use gateways::{
    MockActions, MockAuthorizer, MockDialogs, MockPreferences, MockSyncControl, PromptRecord,
    SyncCall,
};
