use crate::core::vcard::Escaping;
use crate::domain::model::{
    EncodeOptions, ErrorCorrection, OutputFormat, DEFAULT_MARGIN, DEFAULT_WIDTH,
};
pub use crate::domain::model::{MAX_MARGIN, MAX_WIDTH, MIN_WIDTH};
use crate::utils::error::{QrForgeError, Result};
use crate::utils::validation::{validate_path, validate_range, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

pub const DEFAULT_OUTPUT_DIR: &str = "./output";

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env placeholder pattern is valid"));

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub encoder: EncoderConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub vcard: VcardConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    pub error_correction: ErrorCorrection,
    pub width: u32,
    pub margin: u32,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            error_correction: ErrorCorrection::High,
            width: DEFAULT_WIDTH,
            margin: DEFAULT_MARGIN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: String,
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: DEFAULT_OUTPUT_DIR.to_string(),
            format: OutputFormat::Png,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VcardConfig {
    /// Backslash-escape reserved characters in property values.
    pub escape: bool,
}

impl Default for VcardConfig {
    fn default() -> Self {
        Self { escape: true }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content)
            .map_err(|e| QrForgeError::config(format!("TOML parsing error: {}", e)))
    }

    /// 替換環境變數 (例如 ${OUTPUT_DIR})，找不到的變數保留原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn encode_options(&self) -> EncodeOptions {
        EncodeOptions {
            error_correction: self.encoder.error_correction,
            width: self.encoder.width,
            margin: self.encoder.margin,
            format: self.output.format,
        }
    }

    pub fn escaping(&self) -> Escaping {
        if self.vcard.escape {
            Escaping::Rfc2426
        } else {
            Escaping::Raw
        }
    }

    pub fn output_dir(&self) -> &str {
        &self.output.directory
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_range("encoder.width", self.encoder.width, MIN_WIDTH, MAX_WIDTH)?;
        validate_range("encoder.margin", self.encoder.margin, 0, MAX_MARGIN)?;
        validate_path("output.directory", &self.output.directory)?;
        Ok(())
    }
}
