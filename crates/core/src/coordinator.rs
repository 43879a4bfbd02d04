//! Error coordinator
//!
//! The coordinator owns the handler configuration and is the single entry
//! point every part of the application calls with a failure. It runs
//! classification and translation, dispatches side effects in a fixed order
//! (log, authentication hook, generic hook, toast) and hands the canonical
//! error back to the caller.
//!
//! It is built once by the composition root and shared by reference. The
//! state sits behind `RefCell`s, so the coordinator is `!Sync` and meant for
//! the single UI thread; borrows are always released before a hook runs so
//! hooks may call back into the coordinator.

use std::cell::{Cell, RefCell};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::classify::{RawFailure, recognize};
use crate::context::{ErrorContext, RenderInfo};
use crate::settings::HandlerSettings;
use crate::taxonomy::CanonicalError;
use crate::translate::translate;

/// Called for every authentication failure
pub type AuthErrorHook = Rc<dyn Fn(&CanonicalError)>;

/// Called for every handled failure
pub type ErrorHook = Rc<dyn Fn(&CanonicalError, Option<&ErrorContext>)>;

/// Displays a transient notice to the user
pub type ToastSink = Rc<dyn Fn(&str, ToastKind)>;

/// Operation label passed to the generic hook for render failures
pub const RENDER_FAILURE_OPERATION: &str = "error_boundary";

/// Visual category of a toast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Error,
    Warning,
    Info,
    Success,
}

/// Active handler configuration
#[derive(Clone)]
pub struct HandlerConfig {
    pub on_authentication_error: Option<AuthErrorHook>,
    pub on_error: Option<ErrorHook>,
    pub enable_console_logging: bool,
    pub enable_toast_notifications: bool,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            on_authentication_error: None,
            on_error: None,
            enable_console_logging: false,
            enable_toast_notifications: true,
        }
    }
}

impl std::fmt::Debug for HandlerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerConfig")
            .field(
                "on_authentication_error",
                &self.on_authentication_error.is_some(),
            )
            .field("on_error", &self.on_error.is_some())
            .field("enable_console_logging", &self.enable_console_logging)
            .field(
                "enable_toast_notifications",
                &self.enable_toast_notifications,
            )
            .finish()
    }
}

impl HandlerConfig {
    /// Shallow merge: fields present in the patch overwrite, the rest stay
    pub fn apply(&mut self, patch: ConfigPatch) {
        if let Some(hook) = patch.on_authentication_error {
            self.on_authentication_error = Some(hook);
        }
        if let Some(hook) = patch.on_error {
            self.on_error = Some(hook);
        }
        if let Some(enabled) = patch.enable_console_logging {
            self.enable_console_logging = enabled;
        }
        if let Some(enabled) = patch.enable_toast_notifications {
            self.enable_toast_notifications = enabled;
        }
    }
}

/// Partial configuration update
#[derive(Clone, Default)]
pub struct ConfigPatch {
    pub on_authentication_error: Option<AuthErrorHook>,
    pub on_error: Option<ErrorHook>,
    pub enable_console_logging: Option<bool>,
    pub enable_toast_notifications: Option<bool>,
}

impl ConfigPatch {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn on_authentication_error(self, hook: impl Fn(&CanonicalError) + 'static) -> Self {
        self.on_authentication_error_hook(Rc::new(hook))
    }

    /// Set an already shared authentication hook
    #[must_use]
    pub fn on_authentication_error_hook(mut self, hook: AuthErrorHook) -> Self {
        self.on_authentication_error = Some(hook);
        self
    }

    #[must_use]
    pub fn on_error(
        mut self,
        hook: impl Fn(&CanonicalError, Option<&ErrorContext>) + 'static,
    ) -> Self {
        self.on_error = Some(Rc::new(hook));
        self
    }

    #[must_use]
    pub const fn console_logging(mut self, enabled: bool) -> Self {
        self.enable_console_logging = Some(enabled);
        self
    }

    #[must_use]
    pub const fn toast_notifications(mut self, enabled: bool) -> Self {
        self.enable_toast_notifications = Some(enabled);
        self
    }
}

impl From<&HandlerSettings> for ConfigPatch {
    fn from(settings: &HandlerSettings) -> Self {
        Self::new()
            .console_logging(settings.enable_console_logging)
            .toast_notifications(settings.enable_toast_notifications)
    }
}

thread_local! {
    /// Nesting depth of panic-contained sections on this thread
    static CONTAINED_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Whether a panic raised right now would be caught by the coordinator
///
/// Panic hooks run before unwinding reaches `catch_unwind`; a hook that
/// reports panics should skip the ones the coordinator already contains.
pub fn is_containing_panics() -> bool {
    CONTAINED_DEPTH.try_with(|depth| depth.get() > 0).unwrap_or(false)
}

fn contained<R>(f: impl FnOnce() -> R) -> std::thread::Result<R> {
    CONTAINED_DEPTH.with(|depth| depth.set(depth.get() + 1));
    let result = catch_unwind(AssertUnwindSafe(f));
    CONTAINED_DEPTH.with(|depth| depth.set(depth.get() - 1));
    result
}

/// Classify and translate a failure
///
/// The message of the result is never empty: a blank backend message is
/// replaced by the default message of its code.
pub fn normalize(raw: &RawFailure) -> CanonicalError {
    contained(|| {
        let Some(mut error) = recognize(raw) else {
            return CanonicalError::server_error();
        };
        error.message = translate(&error.message);
        if error.message.trim().is_empty() {
            error.message = error.fallback_message().to_string();
        }
        error
    })
    .unwrap_or_else(|_| {
        warn!("Failure classification panicked; using server error");
        CanonicalError::server_error()
    })
}

/// Run one side effect, containing any panic it raises
fn guarded(label: &'static str, effect: impl FnOnce()) {
    if contained(effect).is_err() {
        warn!(hook = label, "Error handler side effect panicked");
    }
}

fn log_failure(error: &CanonicalError, raw: &RawFailure, context: Option<&ErrorContext>) {
    error!(
        status_code = error.status_code,
        error_message = %error.message,
        request_id = error.request_id.as_deref(),
        operation = context.and_then(|c| c.operation.as_deref()),
        component = context.and_then(|c| c.component.as_deref()),
        "Application error"
    );
    if let Some(stack) = raw.stack() {
        error!(stack = %stack, "Original error stack");
    }
}

/// Normalizes failures and dispatches the configured reactions
pub struct ErrorCoordinator {
    config: RefCell<HandlerConfig>,
    toast_sink: RefCell<Option<ToastSink>>,
}

impl Default for ErrorCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ErrorCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorCoordinator")
            .field("config", &*self.config.borrow())
            .field("toast_sink", &self.has_toast_sink())
            .finish()
    }
}

impl ErrorCoordinator {
    /// Coordinator with default configuration and no hooks
    pub fn new() -> Self {
        Self::with_config(HandlerConfig::default())
    }

    pub fn with_config(config: HandlerConfig) -> Self {
        Self {
            config: RefCell::new(config),
            toast_sink: RefCell::new(None),
        }
    }

    /// Coordinator configured from loaded settings
    pub fn from_settings(settings: &HandlerSettings) -> Self {
        let coordinator = Self::new();
        coordinator.configure(settings.into());
        coordinator
    }

    /// Merge a partial configuration into the current one
    pub fn configure(&self, patch: ConfigPatch) {
        let mut config = self.config.borrow_mut();
        config.apply(patch);
        debug!(
            console_logging = config.enable_console_logging,
            toast_notifications = config.enable_toast_notifications,
            auth_hook = config.on_authentication_error.is_some(),
            error_hook = config.on_error.is_some(),
            "Error handler configured"
        );
    }

    /// Register (or replace) the toast sink
    pub fn set_toast_sink(&self, sink: impl Fn(&str, ToastKind) + 'static) {
        *self.toast_sink.borrow_mut() = Some(Rc::new(sink));
        debug!("Toast sink registered");
    }

    pub fn has_toast_sink(&self) -> bool {
        self.toast_sink.borrow().is_some()
    }

    /// Snapshot of the current configuration
    pub fn config(&self) -> HandlerConfig {
        self.config.borrow().clone()
    }

    /// Handle a failure and return its canonical form
    ///
    /// Side effects run in order: log (when enabled), authentication hook
    /// (401 only), generic hook, toast (when enabled and a sink is set).
    /// Each one is isolated; a panicking hook does not stop the others.
    pub fn handle(&self, raw: &RawFailure, context: Option<&ErrorContext>) -> CanonicalError {
        let error = normalize(raw);
        let config = self.config();

        if config.enable_console_logging {
            guarded("console_log", || log_failure(&error, raw, context));
        }

        if error.is_authentication_error() {
            if let Some(hook) = &config.on_authentication_error {
                guarded("on_authentication_error", || hook(&error));
            }
        }

        if let Some(hook) = &config.on_error {
            guarded("on_error", || hook(&error, context));
        }

        if config.enable_toast_notifications {
            let sink = self.toast_sink.borrow().clone();
            if let Some(sink) = sink {
                guarded("toast_sink", || sink(&error.message, ToastKind::Error));
            }
        }

        error
    }

    /// Handle a failure raised while rendering the UI
    ///
    /// Always logged together with the component stack. Only the generic hook
    /// runs; render failures are never treated as authentication failures.
    pub fn handle_render_failure(&self, raw: &RawFailure, info: &RenderInfo) {
        let error = normalize(raw);

        guarded("console_log", || {
            error!(
                status_code = error.status_code,
                error_message = %error.message,
                component_stack = info.component_stack.as_deref(),
                stack = raw.stack(),
                "Render failure"
            );
        });

        let on_error = self.config.borrow().on_error.clone();
        if let Some(hook) = on_error {
            let context = ErrorContext::operation(RENDER_FAILURE_OPERATION);
            guarded("on_error", || hook(&error, Some(&context)));
        }
    }

    /// Pass successes through and handle failures
    ///
    /// # Errors
    ///
    /// Returns the canonical form of the failure when `result` is an error
    pub fn intercept<T>(
        &self,
        result: Result<T, RawFailure>,
        context: Option<&ErrorContext>,
    ) -> Result<T, CanonicalError> {
        result.map_err(|raw| self.handle(&raw, context))
    }
}
