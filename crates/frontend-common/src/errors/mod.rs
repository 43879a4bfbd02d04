//! Error handling wiring for Yew applications

pub mod provider;
pub mod render_failure;

pub use provider::{ErrorHandlerProvider, SharedCoordinator, use_error_coordinator};
