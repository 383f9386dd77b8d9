use thiserror::Error;

/// Default name of the query parameter carrying the originally requested URL.
pub const DEFAULT_REDIRECT_PARAMETER: &str = "redirect";

/// Base session key the serialized rights map is stored under.
const SESSION_KEY_BASE: &str = "user_rights";

/// Configuration problem caught by the pre-flight check.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("error page URL must not be empty")]
    EmptyErrorPage,

    #[error("error page URL must be relative to the application root (no leading '/'): {0}")]
    LeadingSlash(String),

    #[error("error page URL must not end with '/': {0}")]
    TrailingSlash(String),

    #[error("redirect parameter name must not be empty")]
    EmptyRedirectParameter,
}

/// Where denied users are sent, and how the session cache is keyed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RightsConfig {
    error_page_url: String,
    redirect_parameter: String,
    session_prefix: String,
}

impl RightsConfig {
    /// Configuration pointing denied users at `error_page_url`.
    ///
    /// The URL is relative to the root of the application and should lead
    /// to a 403-style page. It must not start or end with a "/".
    pub fn new(error_page_url: impl Into<String>) -> Self {
        Self {
            error_page_url: error_page_url.into(),
            redirect_parameter: DEFAULT_REDIRECT_PARAMETER.to_string(),
            session_prefix: String::new(),
        }
    }

    /// Customize the query parameter carrying the originally requested URL.
    ///
    /// With a parameter of `"redir"` a denied request for `/my/page` ends
    /// up at `403.php?redir=%2Fmy%2Fpage`.
    pub fn with_redirect_parameter(mut self, name: impl Into<String>) -> Self {
        self.redirect_parameter = name.into();
        self
    }

    /// Prefix for the session key.
    ///
    /// When several applications share one session domain, give each a
    /// distinct prefix so their cached rights cannot collide.
    pub fn with_session_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.session_prefix = prefix.into();
        self
    }

    pub fn error_page_url(&self) -> &str {
        &self.error_page_url
    }

    pub fn redirect_parameter(&self) -> &str {
        &self.redirect_parameter
    }

    pub fn session_prefix(&self) -> &str {
        &self.session_prefix
    }

    /// Session key the serialized rights map is stored under.
    pub fn session_key(&self) -> String {
        format!("{}{}", self.session_prefix, SESSION_KEY_BASE)
    }

    /// Pre-flight validation, run once at engine construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.error_page_url.is_empty() {
            return Err(ConfigError::EmptyErrorPage);
        }
        if self.error_page_url.starts_with('/') {
            return Err(ConfigError::LeadingSlash(self.error_page_url.clone()));
        }
        if self.error_page_url.ends_with('/') {
            return Err(ConfigError::TrailingSlash(self.error_page_url.clone()));
        }
        if self.redirect_parameter.is_empty() {
            return Err(ConfigError::EmptyRedirectParameter);
        }
        Ok(())
    }
}
