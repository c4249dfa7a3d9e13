use crate::utils::validation::FieldErrors;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QrForgeError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("QR encoding failed: {message}")]
    Encoding { message: String },

    #[error("No QR code has been generated yet")]
    NothingGenerated,

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "render")]
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Encoding,
    State,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl QrForgeError {
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_) => ErrorCategory::Input,
            Self::Encoding { .. } => ErrorCategory::Encoding,
            Self::NothingGenerated => ErrorCategory::State,
            Self::Config { .. } | Self::InvalidConfigValue { .. } | Self::Toml(_) => {
                ErrorCategory::Configuration
            }
            Self::Json(_) => ErrorCategory::Input,
            Self::Io(_) => ErrorCategory::System,
            #[cfg(feature = "render")]
            Self::Image(_) => ErrorCategory::System,
        }
    }

    /// 嚴重程度決定 CLI 的退出碼
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::State => ErrorSeverity::Low,
            ErrorCategory::Input | ErrorCategory::Encoding => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Validation and encoding failures leave any previous result untouched.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Input | ErrorCategory::Encoding | ErrorCategory::State
        )
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::Validation(errors) => format!(
                "Fix the highlighted field(s): {}",
                errors.field_names().join(", ")
            ),
            Self::Encoding { .. } => {
                "Shorten the content or choose a lower error-correction level (L, M or Q)"
                    .to_string()
            }
            Self::NothingGenerated => "Submit a URL, text or contact first".to_string(),
            Self::Config { .. } | Self::InvalidConfigValue { .. } | Self::Toml(_) => {
                "Check the configuration file and command-line flags".to_string()
            }
            Self::Json(_) => "Make sure the contact file is valid JSON".to_string(),
            Self::Io(_) => "Check that the output directory exists and is writable".to_string(),
            #[cfg(feature = "render")]
            Self::Image(_) => "Try a different output format or size".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Validation(errors) => {
                let lines: Vec<String> = errors
                    .iter()
                    .map(|e| format!("  {}: {}", e.field, e.message))
                    .collect();
                format!("Please correct the following:\n{}", lines.join("\n"))
            }
            Self::Encoding { .. } => {
                "QR Generation Failed: could not generate QR code. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, QrForgeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validation::FieldError;

    #[test]
    fn test_severity_mapping() {
        let validation = QrForgeError::Validation(FieldErrors::from(vec![FieldError::new(
            "url",
            "Please enter a valid URL.",
        )]));
        assert_eq!(validation.severity(), ErrorSeverity::Medium);
        assert!(validation.is_recoverable());

        assert_eq!(QrForgeError::encoding("too long").severity(), ErrorSeverity::Medium);
        assert_eq!(QrForgeError::config("bad").severity(), ErrorSeverity::High);
        assert_eq!(QrForgeError::NothingGenerated.severity(), ErrorSeverity::Low);

        let io = QrForgeError::from(std::io::Error::other("disk full"));
        assert_eq!(io.severity(), ErrorSeverity::Critical);
        assert!(!io.is_recoverable());
    }

    #[test]
    fn test_user_friendly_message_lists_fields() {
        let err = QrForgeError::Validation(FieldErrors::from(vec![
            FieldError::new("firstName", "First name is required"),
            FieldError::new("phone", "Phone number is required"),
        ]));
        let message = err.user_friendly_message();
        assert!(message.contains("firstName: First name is required"));
        assert!(message.contains("phone: Phone number is required"));
        assert!(err.recovery_suggestion().contains("firstName, phone"));
    }
}
