use crate::domain::model::{EncodeOptions, QrImage, QrPayload};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Turns a finished payload into an image.
///
/// Implementations must fail with [`crate::QrForgeError::Encoding`] when the
/// payload is empty or does not fit the requested error-correction level.
#[async_trait]
pub trait QrEncoder: Send + Sync {
    async fn encode(&self, payload: &QrPayload, options: &EncodeOptions) -> Result<QrImage>;
}

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}
