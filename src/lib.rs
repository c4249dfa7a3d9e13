//! Build QR codes for a URL, free text or a vCard contact.
//!
//! Input is validated per mode, turned into a single payload string, and
//! handed to an injected [`QrEncoder`]. The bundled [`QrCodeEncoder`] (feature
//! `render`) produces PNG or SVG images.

pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

#[cfg(feature = "render")]
pub use adapters::encoder::QrCodeEncoder;
pub use adapters::storage::LocalStorage;
pub use crate::core::{
    filename::{derive_file_stem, derive_filename},
    forms::{TextForm, UrlForm},
    generator::QrGenerator,
    mode::{FormState, InputForm},
    vcard::{to_vcard, to_vcard_with, Escaping},
};
pub use domain::model::{
    ContactRecord, EncodeOptions, ErrorCorrection, GeneratedQr, Mode, OutputFormat, QrImage,
    QrPayload,
};
pub use domain::ports::{QrEncoder, Storage};
pub use utils::error::{QrForgeError, Result};
