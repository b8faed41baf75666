//! Test utilities for the track send orchestrator
//!
//! This crate provides mock gateway implementations and request
//! builders for testing send and share flows without a real shell.

pub mod builders;
pub mod mocks;

// Re-export commonly used types
pub use builders::SendRequestBuilder;
pub use mocks::{
    MockActions, MockAuthorizer, MockDialogs, MockPreferences, MockSyncControl, PromptRecord,
    SyncCall,
};
