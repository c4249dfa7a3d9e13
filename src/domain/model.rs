use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Structured contact fields collected by the contact form.
///
/// Optional fields holding `Some("")` behave exactly like `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactRecord {
    pub prefix: Option<String>,
    #[serde(alias = "first_name")]
    pub first_name: String,
    #[serde(alias = "last_name")]
    pub last_name: Option<String>,
    pub phone: String,
    pub email: Option<String>,
    #[serde(alias = "organization")]
    pub company: Option<String>,
    #[serde(alias = "job_title")]
    pub job_title: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
    pub website: Option<String>,
}

impl ContactRecord {
    pub fn new(first_name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            phone: phone.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Url,
    Text,
    Contact,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Url => "url",
            Mode::Text => "text",
            Mode::Contact => "contact",
        };
        f.write_str(name)
    }
}

/// The text handed to the QR encoder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QrPayload(String);

impl QrPayload {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for QrPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ErrorCorrection {
    #[serde(rename = "L", alias = "low")]
    Low,
    #[serde(rename = "M", alias = "medium")]
    Medium,
    #[serde(rename = "Q", alias = "quartile")]
    Quartile,
    #[default]
    #[serde(rename = "H", alias = "high")]
    High,
}

impl FromStr for ErrorCorrection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "l" | "low" => Ok(Self::Low),
            "m" | "medium" => Ok(Self::Medium),
            "q" | "quartile" => Ok(Self::Quartile),
            "h" | "high" => Ok(Self::High),
            other => Err(format!(
                "unknown error-correction level '{}', expected one of L, M, Q, H",
                other
            )),
        }
    }
}

impl fmt::Display for ErrorCorrection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Self::Low => "L",
            Self::Medium => "M",
            Self::Quartile => "Q",
            Self::High => "H",
        };
        f.write_str(letter)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Svg,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Svg => "image/svg+xml",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "svg" => Ok(Self::Svg),
            other => Err(format!("unknown output format '{}', expected png or svg", other)),
        }
    }
}

pub const DEFAULT_WIDTH: u32 = 512;
pub const DEFAULT_MARGIN: u32 = 2;
pub const MIN_WIDTH: u32 = 21;
pub const MAX_WIDTH: u32 = 8192;
pub const MAX_MARGIN: u32 = 64;

/// Options passed alongside the payload to the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeOptions {
    pub error_correction: ErrorCorrection,
    /// Target image size in pixels.
    pub width: u32,
    /// Quiet-zone size in modules.
    pub margin: u32,
    pub format: OutputFormat,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            error_correction: ErrorCorrection::High,
            width: DEFAULT_WIDTH,
            margin: DEFAULT_MARGIN,
            format: OutputFormat::Png,
        }
    }
}

/// Encoded image returned by a [`crate::domain::ports::QrEncoder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrImage {
    pub format: OutputFormat,
    /// Edge length in pixels (PNG) or user units (SVG).
    pub width: u32,
    pub bytes: Vec<u8>,
}

impl QrImage {
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.mime_type(),
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

/// Last successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedQr {
    pub mode: Mode,
    pub payload: QrPayload,
    pub image: QrImage,
}
