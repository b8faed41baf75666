//! Shell gateway implementations and the interaction driver
//!
//! The orchestrator only dispatches work through its gateways. Here
//! every gateway forwards onto one channel, and [`FlowDriver`] drains
//! that channel on the interaction task, rendering each prompt and
//! delivering its callback until the flow finishes or a dismissed
//! prompt parks it.

pub mod actions;
pub mod authorizer;
pub mod driver;
pub mod prompts;
pub mod sync_control;

pub use driver::FlowDriver;
