//! Handler settings loaded from files and the environment
//!
//! Only the plain-data part of the handler configuration lives here. Hooks
//! and the toast sink are attached in code by the composition root.

use std::path::Path;

use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Prefix for environment overrides, e.g. `TRAVOLLO_ENABLE_CONSOLE_LOGGING=true`
pub const ENV_PREFIX: &str = "TRAVOLLO";

/// Settings for the error handler and the default login redirect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerSettings {
    /// Log every handled error
    pub enable_console_logging: bool,

    /// Show a toast for every handled error once a toast sink is registered
    pub enable_toast_notifications: bool,

    /// Path of the login screen
    pub login_path: String,

    /// Query parameter carrying the page to return to after login
    pub redirect_param: String,

    /// Path fragments that mark a page as part of the login flow
    pub auth_path_markers: Vec<String>,
}

impl Default for HandlerSettings {
    fn default() -> Self {
        Self {
            enable_console_logging: false,
            enable_toast_notifications: true,
            login_path: "/login".to_string(),
            redirect_param: "redirect".to_string(),
            auth_path_markers: vec!["/login".to_string(), "/auth".to_string()],
        }
    }
}

impl HandlerSettings {
    /// Load settings from a file, with environment overrides
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// resulting settings are invalid
    pub fn from_file<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        let builder = Self::defaults()?.add_source(File::from(path.as_ref()));
        Self::finish(builder.add_source(environment()))
    }

    /// Load settings from defaults and environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables cannot be parsed
    pub fn from_env() -> CoreResult<Self> {
        Self::finish(Self::defaults()?.add_source(environment()))
    }

    /// Parse settings from an embedded TOML document
    ///
    /// Used by the browser build, which has no file system or environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be parsed or is invalid
    pub fn from_toml_str(source: &str) -> CoreResult<Self> {
        Self::finish(Self::defaults()?.add_source(File::from_str(source, FileFormat::Toml)))
    }

    /// Render the settings as TOML
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn to_toml_string(&self) -> CoreResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check the invariants the redirect policy relies on
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] describing the first violation
    pub fn validate(&self) -> CoreResult<()> {
        if !self.login_path.starts_with('/') {
            return Err(CoreError::invalid_config(format!(
                "login_path must start with '/', got '{}'",
                self.login_path
            )));
        }
        if self.redirect_param.trim().is_empty() {
            return Err(CoreError::invalid_config("redirect_param must not be empty"));
        }
        if self.auth_path_markers.iter().any(|m| m.trim().is_empty()) {
            return Err(CoreError::invalid_config(
                "auth_path_markers must not contain empty entries",
            ));
        }
        Ok(())
    }

    fn defaults() -> CoreResult<ConfigBuilder<DefaultState>> {
        let defaults = Self::default();
        Ok(Config::builder()
            .set_default("enable_console_logging", defaults.enable_console_logging)?
            .set_default(
                "enable_toast_notifications",
                defaults.enable_toast_notifications,
            )?
            .set_default("login_path", defaults.login_path)?
            .set_default("redirect_param", defaults.redirect_param)?
            .set_default("auth_path_markers", defaults.auth_path_markers)?)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> CoreResult<Self> {
        let settings: Self = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    #[cfg(test)]
    fn from_env_map(vars: config::Map<String, String>) -> CoreResult<Self> {
        Self::finish(Self::defaults()?.add_source(environment().source(Some(vars))))
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("auth_path_markers")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn vars(pairs: &[(&str, &str)]) -> config::Map<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_default_settings() {
        let settings = HandlerSettings::default();
        assert!(!settings.enable_console_logging);
        assert!(settings.enable_toast_notifications);
        assert_eq!(settings.login_path, "/login");
        assert_eq!(settings.redirect_param, "redirect");
        assert_eq!(settings.auth_path_markers, vec!["/login", "/auth"]);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_from_toml_str_merges_with_defaults() {
        let settings = HandlerSettings::from_toml_str(
            r#"
            enable_console_logging = true
            login_path = "/dang-nhap"
            "#,
        )
        .unwrap();

        assert!(settings.enable_console_logging);
        assert!(settings.enable_toast_notifications);
        assert_eq!(settings.login_path, "/dang-nhap");
        assert_eq!(settings.redirect_param, "redirect");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "enable_toast_notifications = false").unwrap();
        writeln!(file, "auth_path_markers = [\"/login\", \"/auth\", \"/verify\"]").unwrap();

        let settings = HandlerSettings::from_file(file.path()).unwrap();
        assert!(!settings.enable_toast_notifications);
        assert_eq!(settings.auth_path_markers, vec!["/login", "/auth", "/verify"]);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = HandlerSettings::from_file("/nonexistent/travollo.toml");
        assert!(matches!(result, Err(CoreError::InvalidConfig { .. })));
    }

    #[test]
    fn test_environment_overrides() {
        let settings = HandlerSettings::from_env_map(vars(&[
            ("TRAVOLLO_ENABLE_CONSOLE_LOGGING", "true"),
            ("TRAVOLLO_AUTH_PATH_MARKERS", "/login,/auth,/otp"),
        ]))
        .unwrap();

        assert!(settings.enable_console_logging);
        assert_eq!(settings.auth_path_markers, vec!["/login", "/auth", "/otp"]);
    }

    #[test]
    fn test_invalid_login_path_rejected() {
        let result = HandlerSettings::from_toml_str(r#"login_path = "login""#);
        assert!(matches!(result, Err(CoreError::InvalidConfig { .. })));
    }

    #[test]
    fn test_empty_redirect_param_rejected() {
        let settings = HandlerSettings {
            redirect_param: "  ".to_string(),
            ..HandlerSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_toml_output_parses_back() {
        let settings = HandlerSettings {
            enable_console_logging: true,
            ..HandlerSettings::default()
        };
        let rendered = settings.to_toml_string().unwrap();
        assert!(rendered.contains("enable_console_logging = true"));
        assert_eq!(HandlerSettings::from_toml_str(&rendered).unwrap(), settings);
    }
}
