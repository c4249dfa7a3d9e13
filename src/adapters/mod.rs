// Adapters layer: concrete implementations of the domain ports.

#[cfg(feature = "render")]
pub mod encoder;
pub mod storage;
