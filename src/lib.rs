pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::OpenAiGenerator;
pub use app::TerminalApp;
pub use config::toml_config::TomlConfig;
pub use core::flow::{StoryFlow, View, GENERIC_ERROR_MESSAGE};
pub use utils::error::{Result, StoryError};
