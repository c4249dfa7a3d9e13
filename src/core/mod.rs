pub mod filename;
pub mod forms;
pub mod generator;
pub mod mode;
pub mod vcard;

pub use crate::domain::model::{ContactRecord, EncodeOptions, GeneratedQr, QrImage, QrPayload};
pub use crate::domain::ports::{QrEncoder, Storage};
pub use crate::utils::error::Result;
