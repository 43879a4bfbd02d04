//! Transient notifications fed by the error coordinator

use gloo::timers::callback::Timeout;
use std::cell::Cell;
use std::rc::Rc;
use travollo_core::ToastKind;
use yew::prelude::*;

use crate::config::ToastConfig;
use crate::errors::use_error_coordinator;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub id: u32,
    pub message: String,
    pub kind: ToastKind,
}

/// Toasts currently on screen, oldest first
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToastState {
    pub toasts: Vec<Toast>,
}

pub enum ToastAction {
    Push(Toast),
    Dismiss(u32),
}

impl Reducible for ToastState {
    type Action = ToastAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        match action {
            ToastAction::Push(toast) => {
                let mut toasts = self.toasts.clone();
                toasts.push(toast);
                let overflow = toasts.len().saturating_sub(ToastConfig::MAX_VISIBLE);
                toasts.drain(..overflow);
                Rc::new(Self { toasts })
            }
            ToastAction::Dismiss(id) => {
                if !self.toasts.iter().any(|toast| toast.id == id) {
                    return self;
                }
                Rc::new(Self {
                    toasts: self
                        .toasts
                        .iter()
                        .filter(|toast| toast.id != id)
                        .cloned()
                        .collect(),
                })
            }
        }
    }
}

const fn kind_class(kind: ToastKind) -> &'static str {
    match kind {
        ToastKind::Error => "bg-red-50 border-red-500 text-red-800",
        ToastKind::Warning => "bg-yellow-50 border-yellow-500 text-yellow-800",
        ToastKind::Info => "bg-blue-50 border-blue-500 text-blue-800",
        ToastKind::Success => "bg-green-50 border-green-500 text-green-800",
    }
}

#[derive(Properties, PartialEq)]
pub struct ToastProviderProps {
    pub children: Children,
}

/// Renders toasts and registers itself as the coordinator's toast sink
///
/// Must be placed inside an `ErrorHandlerProvider`. Failures handled before
/// this component mounts produce no toast.
#[function_component(ToastProvider)]
pub fn toast_provider(props: &ToastProviderProps) -> Html {
    let state = use_reducer(ToastState::default);
    let coordinator = use_error_coordinator();

    {
        let dispatcher = state.dispatcher();
        use_effect_with(coordinator, move |coordinator| {
            let next_id = Rc::new(Cell::new(0_u32));
            coordinator.set_toast_sink(move |message: &str, kind: ToastKind| {
                let id = next_id.get();
                next_id.set(id.wrapping_add(1));
                dispatcher.dispatch(ToastAction::Push(Toast {
                    id,
                    message: message.to_string(),
                    kind,
                }));

                let dispatcher = dispatcher.clone();
                Timeout::new(ToastConfig::DISPLAY_DURATION_MS, move || {
                    dispatcher.dispatch(ToastAction::Dismiss(id));
                })
                .forget();
            });
        });
    }

    let toasts = state.toasts.iter().map(|toast| {
        let onclick = {
            let dispatcher = state.dispatcher();
            let id = toast.id;
            Callback::from(move |_| dispatcher.dispatch(ToastAction::Dismiss(id)))
        };
        html! {
            <div
                key={toast.id}
                role="alert"
                class={classes!("border-l-4", "rounded", "px-4", "py-3", "shadow", "cursor-pointer", kind_class(toast.kind))}
                {onclick}
            >
                {&toast.message}
            </div>
        }
    });

    html! {
        <>
            {props.children.clone()}
            <div class="fixed top-4 right-4 z-50 flex flex-col gap-2 max-w-sm">
                {for toasts}
            </div>
        </>
    }
}
