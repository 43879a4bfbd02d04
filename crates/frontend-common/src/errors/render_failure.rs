//! Render failure reporting
//!
//! A panic while rendering cannot be caught by the component that caused it.
//! The panic hook installed here reports it to the active coordinator after
//! the default console output, so the application still gets a log entry and
//! its generic error callback. Panics raised inside the coordinator's own
//! contained hooks are not reported.

use std::cell::{Cell, RefCell};
use std::panic::PanicHookInfo;
use std::rc::Rc;
use std::sync::Once;
use travollo_core::{ErrorCoordinator, RawFailure, RenderInfo, is_containing_panics};

thread_local! {
    /// Coordinator receiving render failures
    static COORDINATOR: RefCell<Option<Rc<ErrorCoordinator>>> = const { RefCell::new(None) };

    /// Set while a failure is being reported
    static REPORTING: Cell<bool> = const { Cell::new(false) };
}

static PANIC_HOOK: Once = Once::new();

/// Route panics on this thread to `coordinator`
///
/// The panic hook is process wide and registered once; later calls only swap
/// the coordinator.
pub fn install(coordinator: Rc<ErrorCoordinator>) {
    COORDINATOR.with(|slot| {
        *slot.borrow_mut() = Some(coordinator);
    });

    PANIC_HOOK.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            console_error_panic_hook::hook(info);
            report(info);
        }));
    });
}

/// Stop forwarding panics
pub fn uninstall() {
    let _ = COORDINATOR.try_with(|slot| {
        if let Ok(mut slot) = slot.try_borrow_mut() {
            slot.take();
        }
    });
}

fn report(info: &PanicHookInfo<'_>) {
    // Already caught and handled by the coordinator
    if is_containing_panics() {
        return;
    }

    let Ok(coordinator) = COORDINATOR.try_with(|slot| {
        slot.try_borrow()
            .ok()
            .and_then(|coordinator| coordinator.clone())
    }) else {
        return;
    };
    let Some(coordinator) = coordinator else {
        return;
    };

    // A panic inside the coordinator's own hooks must not report itself
    if REPORTING.try_with(|flag| flag.replace(true)).unwrap_or(true) {
        return;
    }

    let raw = RawFailure::Native {
        message: panic_message(info.payload()),
        stack: None,
    };
    let render_info = info.location().map_or_else(RenderInfo::default, |location| {
        RenderInfo::new(format!(
            "at {}:{}:{}",
            location.file(),
            location.line(),
            location.column()
        ))
    });
    coordinator.handle_render_failure(&raw, &render_info);

    let _ = REPORTING.try_with(|flag| flag.set(false));
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "Box<dyn Any>".to_string())
}
