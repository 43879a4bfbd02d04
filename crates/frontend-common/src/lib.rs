//! Yew components and browser glue for the Travollo error pipeline

pub mod components;
pub mod config;
pub mod errors;
pub mod logging;
pub mod navigator;
pub mod services;

pub use components::{Toast, ToastProvider};
pub use config::ToastConfig;
pub use errors::{ErrorHandlerProvider, SharedCoordinator, use_error_coordinator};
pub use navigator::BrowserNavigator;
pub use services::{fetch_json, with_error_handling};
