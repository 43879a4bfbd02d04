//! Default reaction to authentication failures: send the user to login
//!
//! The redirect carries the current location so the login screen can bring
//! the user back once they have signed in again.

use std::rc::Rc;

use tracing::info;
use url::form_urlencoded;

use crate::coordinator::AuthErrorHook;
use crate::settings::HandlerSettings;
use crate::taxonomy::CanonicalError;

/// Access to the current location
#[cfg_attr(test, mockall::automock)]
pub trait Navigator {
    /// Path of the current page, e.g. `/tours/42`
    fn pathname(&self) -> String;

    /// Full URL of the current page
    fn href(&self) -> String;

    /// Navigate to another URL
    fn assign(&self, url: &str);
}

/// Redirect-to-login policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRedirect {
    login_path: String,
    redirect_param: String,
    auth_path_markers: Vec<String>,
}

impl Default for LoginRedirect {
    fn default() -> Self {
        Self::from_settings(&HandlerSettings::default())
    }
}

impl LoginRedirect {
    pub fn from_settings(settings: &HandlerSettings) -> Self {
        Self {
            login_path: settings.login_path.clone(),
            redirect_param: settings.redirect_param.clone(),
            auth_path_markers: settings.auth_path_markers.clone(),
        }
    }

    /// Whether a path already belongs to the login flow
    pub fn is_auth_path(&self, pathname: &str) -> bool {
        self.auth_path_markers
            .iter()
            .any(|marker| pathname.contains(marker.as_str()))
    }

    /// Login URL that returns the user to `href` afterwards
    pub fn target_for(&self, href: &str) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair(&self.redirect_param, href)
            .finish();
        format!("{}?{query}", self.login_path)
    }

    /// Navigate to login unless already there; returns whether it navigated
    pub fn redirect<N: Navigator + ?Sized>(&self, navigator: &N) -> bool {
        let pathname = navigator.pathname();
        if self.is_auth_path(&pathname) {
            return false;
        }

        let target = self.target_for(&navigator.href());
        info!(from = %pathname, to = %target, "Redirecting to login");
        navigator.assign(&target);
        true
    }

    /// Wrap the policy as an authentication hook
    pub fn into_hook(self, navigator: Rc<dyn Navigator>) -> AuthErrorHook {
        Rc::new(move |_: &CanonicalError| {
            self.redirect(navigator.as_ref());
        })
    }
}
