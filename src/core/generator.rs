use crate::core::filename::derive_filename;
use crate::core::mode::InputForm;
use crate::core::vcard::Escaping;
use crate::domain::model::{EncodeOptions, GeneratedQr};
use crate::domain::ports::{QrEncoder, Storage};
use crate::utils::error::{QrForgeError, Result};

/// Drives one submission from form input to a stored image.
///
/// The generator keeps only the last successful result. A later success
/// replaces it; a failed submission leaves it untouched.
pub struct QrGenerator<E: QrEncoder> {
    encoder: E,
    options: EncodeOptions,
    escaping: Escaping,
    current: Option<GeneratedQr>,
}

impl<E: QrEncoder> QrGenerator<E> {
    pub fn new(encoder: E) -> Self {
        Self {
            encoder,
            options: EncodeOptions::default(),
            escaping: Escaping::default(),
            current: None,
        }
    }

    pub fn with_options(mut self, options: EncodeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_escaping(mut self, escaping: Escaping) -> Self {
        self.escaping = escaping;
        self
    }

    pub fn options(&self) -> &EncodeOptions {
        &self.options
    }

    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    pub fn current(&self) -> Option<&GeneratedQr> {
        self.current.as_ref()
    }

    pub async fn submit(&mut self, form: &InputForm) -> Result<&GeneratedQr> {
        let mode = form.mode();
        let payload = match form.to_payload(self.escaping) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("Rejected {} submission: {}", mode, e);
                return Err(e);
            }
        };

        tracing::debug!(
            "Encoding {} payload (ecc: {}, width: {}, margin: {})",
            mode,
            self.options.error_correction,
            self.options.width,
            self.options.margin
        );

        let image = match self.encoder.encode(&payload, &self.options).await {
            Ok(image) => image,
            Err(e) => {
                tracing::warn!("Encoding failed, keeping previous result: {}", e);
                return Err(e);
            }
        };

        tracing::info!(
            "Generated {} QR code ({}px {})",
            mode,
            image.width,
            image.format.extension()
        );

        Ok(&*self.current.insert(GeneratedQr {
            mode,
            payload,
            image,
        }))
    }

    pub fn suggested_filename(&self) -> Option<String> {
        self.current
            .as_ref()
            .map(|qr| derive_filename(qr.payload.as_str(), qr.image.format))
    }

    /// Writes the current image through `storage` and returns its location.
    pub async fn download<S: Storage>(&self, storage: &S) -> Result<String> {
        let qr = self.current.as_ref().ok_or(QrForgeError::NothingGenerated)?;
        let filename = derive_filename(qr.payload.as_str(), qr.image.format);
        let location = storage.write_file(&filename, &qr.image.bytes).await?;
        tracing::info!("Saved QR code to {}", location);
        Ok(location)
    }
}
