//! `window.location` backed navigation

use travollo_core::Navigator;

/// Navigator over the current browser window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BrowserNavigator;

impl BrowserNavigator {
    fn location() -> Option<web_sys::Location> {
        web_sys::window().map(|window| window.location())
    }
}

impl Navigator for BrowserNavigator {
    fn pathname(&self) -> String {
        Self::location()
            .and_then(|location| location.pathname().ok())
            .unwrap_or_default()
    }

    fn href(&self) -> String {
        Self::location()
            .and_then(|location| location.href().ok())
            .unwrap_or_default()
    }

    fn assign(&self, url: &str) {
        let Some(location) = Self::location() else {
            tracing::warn!("No window available, cannot navigate to {url}");
            return;
        };
        if let Err(e) = location.set_href(url) {
            tracing::warn!("Failed to navigate to {url}: {e:?}");
        }
    }
}
