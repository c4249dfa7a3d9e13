use crate::utils::error::{QrForgeError, Result};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

// 與前端 email 規則相同，但 Rust regex 不支援 lookahead，開頭的 '.' 與 '..' 另外檢查
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z0-9_'+\-.]*[A-Z0-9_+\-]@(?:[A-Z0-9][A-Z0-9\-]*\.)+[A-Z]{2,}$")
        .expect("email pattern is a valid regex")
});

/// A single inline error attached to one form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub type FieldResult = std::result::Result<(), FieldError>;

/// Every failing field of one submission, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, result: FieldResult) {
        if let Err(e) = result {
            self.0.push(e);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field == field)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.field.as_str()).collect()
    }

    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(QrForgeError::Validation(self))
        }
    }
}

impl From<Vec<FieldError>> for FieldErrors {
    fn from(errors: Vec<FieldError>) -> Self {
        Self(errors)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join("; "))
    }
}

/// Non-empty check. Whitespace counts as content, as in the browser form.
pub fn validate_required(field: &str, value: &str, message: &str) -> FieldResult {
    if value.is_empty() {
        return Err(FieldError::new(field, message));
    }
    Ok(())
}

/// Absolute URL of any scheme (`mailto:`, `tel:` and friends included).
pub fn validate_url(field: &str, value: &str, message: &str) -> FieldResult {
    match Url::parse(value) {
        Ok(_) => Ok(()),
        Err(e) => {
            tracing::debug!("URL rejected for {}: {}", field, e);
            Err(FieldError::new(field, message))
        }
    }
}

pub fn validate_email(field: &str, value: &str, message: &str) -> FieldResult {
    if value.starts_with('.') || value.contains("..") || !EMAIL_RE.is_match(value) {
        return Err(FieldError::new(field, message));
    }
    Ok(())
}

/// Runs `check` only when the optional field carries a non-empty value.
pub fn validate_optional(
    value: Option<&str>,
    check: impl FnOnce(&str) -> FieldResult,
) -> FieldResult {
    match value {
        Some(v) if !v.is_empty() => check(v),
        _ => Ok(()),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(QrForgeError::InvalidConfigValue {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(QrForgeError::InvalidConfigValue {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_range<T: PartialOrd + fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(QrForgeError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}
