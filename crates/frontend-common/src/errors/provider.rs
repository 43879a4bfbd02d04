//! Error coordinator context

use std::ops::Deref;
use std::rc::Rc;
use travollo_core::{ConfigPatch, ErrorCoordinator, HandlerSettings, LoginRedirect};
use yew::prelude::*;

use super::render_failure;
use crate::navigator::BrowserNavigator;

/// Coordinator handle shared through the component tree
///
/// Two handles are equal when they point at the same coordinator, so effects
/// keyed on a handle only rerun when the coordinator is replaced.
#[derive(Clone)]
pub struct SharedCoordinator(Rc<ErrorCoordinator>);

impl SharedCoordinator {
    pub fn new(coordinator: ErrorCoordinator) -> Self {
        Self(Rc::new(coordinator))
    }

    /// Coordinator wired for the browser: login redirect through
    /// `window.location` on authentication failures
    pub fn for_browser(settings: &HandlerSettings) -> Self {
        let coordinator = ErrorCoordinator::from_settings(settings);
        let redirect = LoginRedirect::from_settings(settings);
        coordinator.configure(
            ConfigPatch::new()
                .on_authentication_error_hook(redirect.into_hook(Rc::new(BrowserNavigator))),
        );
        Self::new(coordinator)
    }

    pub fn rc(&self) -> Rc<ErrorCoordinator> {
        Rc::clone(&self.0)
    }
}

impl Deref for SharedCoordinator {
    type Target = ErrorCoordinator;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl PartialEq for SharedCoordinator {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Properties, PartialEq)]
pub struct ErrorHandlerProviderProps {
    /// Handler settings; defaults apply when absent
    #[prop_or_default]
    pub settings: Option<HandlerSettings>,

    /// Forward panics to the coordinator as render failures
    #[prop_or(true)]
    pub report_render_failures: bool,

    pub children: Children,
}

/// Provides the error coordinator to its children
#[function_component(ErrorHandlerProvider)]
pub fn error_handler_provider(props: &ErrorHandlerProviderProps) -> Html {
    let coordinator = use_memo(props.settings.clone(), |settings| {
        SharedCoordinator::for_browser(&settings.clone().unwrap_or_default())
    });

    {
        let coordinator = (*coordinator).clone();
        use_effect_with(
            (coordinator, props.report_render_failures),
            |(coordinator, enabled)| {
                if *enabled {
                    render_failure::install(coordinator.rc());
                }
                render_failure::uninstall
            },
        );
    }

    html! {
        <ContextProvider<SharedCoordinator> context={(*coordinator).clone()}>
            {props.children.clone()}
        </ContextProvider<SharedCoordinator>>
    }
}

/// Hook to reach the error coordinator
#[hook]
pub fn use_error_coordinator() -> SharedCoordinator {
    use_context::<SharedCoordinator>().expect(
        "SharedCoordinator not found. Make sure to wrap your component with ErrorHandlerProvider",
    )
}
