use crate::config::toml_config::TomlConfig;
use crate::core::forms::{TextForm, UrlForm};
use crate::core::mode::InputForm;
use crate::domain::model::{ContactRecord, ErrorCorrection, OutputFormat};
use crate::utils::error::Result;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Parser)]
#[command(name = "qr-forge", version)]
#[command(about = "Generate QR codes for URLs, free text and vCard contacts")]
pub struct CliConfig {
    #[command(subcommand)]
    pub input: InputCommand,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Directory the image is saved to
    #[arg(short, long, global = true)]
    pub output_dir: Option<String>,

    /// Image format: png or svg
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    /// Error-correction level: L, M, Q or H
    #[arg(long = "ecc", global = true)]
    pub error_correction: Option<ErrorCorrection>,

    /// Target image size in pixels
    #[arg(long, global = true)]
    pub width: Option<u32>,

    /// Quiet zone in modules
    #[arg(long, global = true)]
    pub margin: Option<u32>,

    /// Write vCard values without escaping reserved characters
    #[arg(long, global = true)]
    pub raw_vcard: bool,

    /// Print the QR code to the terminal
    #[arg(long, global = true)]
    pub preview: bool,

    /// Print the encoded payload
    #[arg(long, global = true)]
    pub print_payload: bool,

    /// Print the image as a data: URL
    #[arg(long, global = true)]
    pub data_url: bool,

    /// Validate and build the payload without encoding or saving
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum InputCommand {
    /// Encode a website URL
    Url { url: String },
    /// Encode free text
    Text { text: String },
    /// Encode a contact card (vCard 3.0)
    Contact(ContactArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct ContactArgs {
    /// JSON or TOML file with contact fields; flags override its values
    #[arg(long)]
    pub file: Option<PathBuf>,
    #[arg(long)]
    pub prefix: Option<String>,
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long, alias = "organization")]
    pub company: Option<String>,
    #[arg(long)]
    pub job_title: Option<String>,
    #[arg(long)]
    pub street: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub region: Option<String>,
    #[arg(long)]
    pub postcode: Option<String>,
    #[arg(long)]
    pub country: Option<String>,
    #[arg(long)]
    pub website: Option<String>,
}

fn load_contact_file(path: &Path) -> Result<ContactRecord> {
    let content = std::fs::read_to_string(path)?;
    let record = match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => toml::from_str(&content)?,
        _ => serde_json::from_str(&content)?,
    };
    Ok(record)
}

impl ContactArgs {
    pub fn to_record(&self) -> Result<ContactRecord> {
        let mut record = match &self.file {
            Some(path) => {
                tracing::debug!("Loading contact from {}", path.display());
                load_contact_file(path)?
            }
            None => ContactRecord::default(),
        };

        if let Some(v) = &self.first_name {
            record.first_name = v.clone();
        }
        if let Some(v) = &self.phone {
            record.phone = v.clone();
        }

        let optional = [
            (&self.prefix, &mut record.prefix),
            (&self.last_name, &mut record.last_name),
            (&self.email, &mut record.email),
            (&self.company, &mut record.company),
            (&self.job_title, &mut record.job_title),
            (&self.street, &mut record.street),
            (&self.city, &mut record.city),
            (&self.region, &mut record.region),
            (&self.postcode, &mut record.postcode),
            (&self.country, &mut record.country),
            (&self.website, &mut record.website),
        ];
        for (flag, field) in optional {
            if flag.is_some() {
                field.clone_from(flag);
            }
        }

        Ok(record)
    }
}

impl InputCommand {
    pub fn to_form(&self) -> Result<InputForm> {
        Ok(match self {
            Self::Url { url } => InputForm::Url(UrlForm::new(url.as_str())),
            Self::Text { text } => InputForm::Text(TextForm::new(text.as_str())),
            Self::Contact(args) => InputForm::Contact(args.to_record()?),
        })
    }
}

impl CliConfig {
    /// Loads the TOML file (or defaults) and applies command-line overrides.
    pub fn load_config(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        if let Some(dir) = &self.output_dir {
            config.output.directory = dir.clone();
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if let Some(level) = self.error_correction {
            config.encoder.error_correction = level;
        }
        if let Some(width) = self.width {
            config.encoder.width = width;
        }
        if let Some(margin) = self.margin {
            config.encoder.margin = margin;
        }
        if self.raw_vcard {
            config.vcard.escape = false;
        }

        Ok(config)
    }
}
