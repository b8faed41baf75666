//! Builders for flow test scenarios

mod requests;

pub use requests::SendRequestBuilder;
