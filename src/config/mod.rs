#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, ContactArgs, InputCommand};
pub use toml_config::TomlConfig;
