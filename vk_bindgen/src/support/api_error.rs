use std::fmt;

use serde::{Deserialize, Serialize};

/// Error envelope returned by the API instead of a response payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub error_code: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_subcode: Option<i64>,
    #[serde(default)]
    pub error_msg: String,
    #[serde(default)]
    pub error_text: String,
    #[serde(default)]
    pub request_params: Vec<RequestParam>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captcha_sid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captcha_img: Option<String>,
}

/// One request parameter echoed back in an [`ApiError`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestParam {
    pub key: String,
    pub value: String,
}

/// Captcha challenge attached to an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captcha {
    pub sid: String,
    pub img: String,
}

impl ApiError {
    #[must_use]
    pub fn code(&self) -> i64 {
        self.error_code
    }

    #[must_use]
    pub fn subcode(&self) -> Option<i64> {
        self.error_subcode
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.error_msg
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.error_text
    }

    #[must_use]
    pub fn request_params(&self) -> &[RequestParam] {
        &self.request_params
    }

    #[must_use]
    pub fn redirect_uri(&self) -> Option<&str> {
        self.redirect_uri.as_deref()
    }

    #[must_use]
    pub fn confirmation_text(&self) -> Option<&str> {
        self.confirmation_text.as_deref()
    }

    #[must_use]
    pub fn is(&self, code: i64) -> bool {
        self.error_code == code
    }

    /// Returns the captcha challenge if either captcha field is present.
    #[must_use]
    pub fn captcha(&self) -> Option<Captcha> {
        if self.captcha_sid.is_none() && self.captcha_img.is_none() {
            return None;
        }
        Some(Captcha {
            sid: self.captcha_sid.clone().unwrap_or_default(),
            img: self.captcha_img.clone().unwrap_or_default(),
        })
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "api error {}", self.error_code)?;
        if let Some(subcode) = self.error_subcode {
            write!(f, " (subcode {subcode})")?;
        }
        write!(f, ": {}", self.error_msg)
    }
}

impl std::error::Error for ApiError {}
