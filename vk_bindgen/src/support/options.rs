//! Cross-cutting options accepted by every binding.

/// One wire key/value applied after a request's own fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiOption {
    name: String,
    value: String,
}

/// Language the API uses for localized data such as country and city names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Russian = 0,
    Ukrainian = 1,
    Belorussian = 2,
    English = 3,
    Spanish = 4,
    Finnish = 5,
    Deutsch = 6,
    Italian = 7,
}

impl ApiOption {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    #[must_use]
    pub fn lang(language: Language) -> Self {
        Self::new("lang", (language as i64).to_string())
    }

    /// Executes the request from an app that is not enabled for all users.
    #[must_use]
    pub fn test_mode() -> Self {
        Self::new("test_mode", "1")
    }

    /// Identifier of a received captcha challenge.
    #[must_use]
    pub fn captcha_sid(sid: impl Into<String>) -> Self {
        Self::new("captcha_sid", sid)
    }

    /// User's answer to a captcha challenge.
    #[must_use]
    pub fn captcha_key(key: impl Into<String>) -> Self {
        Self::new("captcha_key", key)
    }

    #[must_use]
    pub fn version(version: impl Into<String>) -> Self {
        Self::new("v", version)
    }

    #[must_use]
    pub fn access_token(token: impl Into<String>) -> Self {
        Self::new("access_token", token)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}
