//! Travollo error normalization
//!
//! Turns failures from the transport layer, rejected operations and render
//! panics into one [`CanonicalError`] with a safe Vietnamese message, and
//! dispatches the configured reactions through an [`ErrorCoordinator`].

pub mod classify;
pub mod context;
pub mod coordinator;
pub mod error;
pub mod redirect;
pub mod settings;
pub mod taxonomy;
pub mod translate;

#[cfg(feature = "client")]
pub mod transport;

pub use classify::{BackendShape, RawFailure, TransportFailure, classify};
pub use context::{ErrorContext, RenderInfo};
pub use coordinator::{
    AuthErrorHook, ConfigPatch, ErrorCoordinator, ErrorHook, HandlerConfig, ToastKind, ToastSink,
    is_containing_panics, normalize,
};
pub use error::{CoreError, CoreResult};
pub use redirect::{LoginRedirect, Navigator};
pub use settings::HandlerSettings;
pub use taxonomy::{CanonicalError, ErrorCode};
pub use translate::translate;
