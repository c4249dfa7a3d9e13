use crate::domain::model::ContactRecord;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_email, validate_optional, validate_required, validate_url, FieldErrors, Validate,
};
use serde::{Deserialize, Serialize};

pub const INVALID_URL_MESSAGE: &str = "Please enter a valid URL.";
pub const EMPTY_TEXT_MESSAGE: &str = "Text cannot be empty.";
pub const FIRST_NAME_REQUIRED_MESSAGE: &str = "First name is required";
pub const PHONE_REQUIRED_MESSAGE: &str = "Phone number is required";
pub const INVALID_EMAIL_MESSAGE: &str = "Invalid email address";
pub const INVALID_WEBSITE_MESSAGE: &str = "Invalid URL";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlForm {
    pub url: String,
}

impl UrlForm {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl Validate for UrlForm {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.check(validate_url("url", &self.url, INVALID_URL_MESSAGE));
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextForm {
    pub text: String,
}

impl TextForm {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Validate for TextForm {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.check(validate_required("text", &self.text, EMPTY_TEXT_MESSAGE));
        errors.into_result()
    }
}

// 欄位名稱沿用表單上的 camelCase
impl Validate for ContactRecord {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.check(validate_required(
            "firstName",
            &self.first_name,
            FIRST_NAME_REQUIRED_MESSAGE,
        ));
        errors.check(validate_optional(self.email.as_deref(), |v| {
            validate_email("email", v, INVALID_EMAIL_MESSAGE)
        }));
        errors.check(validate_required(
            "phone",
            &self.phone,
            PHONE_REQUIRED_MESSAGE,
        ));
        errors.check(validate_optional(self.website.as_deref(), |v| {
            validate_url("website", v, INVALID_WEBSITE_MESSAGE)
        }));
        errors.into_result()
    }
}
