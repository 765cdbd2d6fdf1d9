pub mod toml_config;

use crate::core::prompt::PromptBuilder;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_required_string, validate_positive_number, validate_range, validate_url,
};

#[cfg(feature = "cli")]
use crate::core::prompt::{DEFAULT_STORY_TEMPLATE, DEFAULT_SYSTEM_PROMPT};
#[cfg(feature = "cli")]
use crate::domain::model::{FormField, PlayerForm};
#[cfg(feature = "cli")]
use crate::utils::validation::Validate;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TITLE: &str = "Player Story";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_MAX_TOKENS: u32 = 300;
pub const DEFAULT_TEMPERATURE: f32 = 0.8;

/// CLI 與 TOML 共用的產生器設定檢查，`prefix` 用來組出欄位名稱
pub fn validate_generator_settings<C: ConfigProvider + ?Sized>(
    config: &C,
    prefix: &str,
) -> Result<()> {
    validate_url(&format!("{}endpoint", prefix), config.endpoint())?;
    validate_required_string(&format!("{}model", prefix), config.model())?;
    validate_positive_number(
        &format!("{}timeout_seconds", prefix),
        config.timeout_seconds(),
        1,
    )?;
    validate_positive_number(
        &format!("{}max_tokens", prefix),
        u64::from(config.max_tokens()),
        1,
    )?;
    validate_range(
        &format!("{}temperature", prefix),
        config.temperature(),
        0.0,
        2.0,
    )?;
    PromptBuilder::validate_template("prompt.system", config.system_prompt())?;
    PromptBuilder::validate_template("prompt.template", config.story_template())?;

    if config.api_key().is_none() {
        tracing::warn!("⚠️ No API key configured; requests will be sent without authorization");
    }
    Ok(())
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "player-story")]
#[command(about = "Tell us about your game and get a short story back")]
pub struct CliConfig {
    /// Path to a TOML configuration file (overrides the generator flags)
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    pub timeout_seconds: u64,

    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
    pub max_tokens: u32,

    #[arg(long, default_value_t = DEFAULT_TEMPERATURE)]
    pub temperature: f32,

    #[arg(long, default_value = DEFAULT_TITLE)]
    pub title: String,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Write logs as JSON")]
    pub log_json: bool,

    /// One-shot mode: player name
    #[arg(long)]
    pub name: Option<String>,

    /// One-shot mode: optional motto
    #[arg(long)]
    pub motto: Option<String>,

    /// One-shot mode: years played
    #[arg(long)]
    pub years_played: Option<String>,

    /// One-shot mode: why they play
    #[arg(long)]
    pub reason: Option<String>,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 有任何表單參數時回傳對應的表單，否則進入互動模式
    pub fn form_input(&self) -> Option<PlayerForm> {
        let values = [
            (FormField::Name, &self.name),
            (FormField::Motto, &self.motto),
            (FormField::YearsPlayed, &self.years_played),
            (FormField::Reason, &self.reason),
        ];

        if values.iter().all(|(_, value)| value.is_none()) {
            return None;
        }

        let mut form = PlayerForm::new();
        for (field, value) in values {
            if let Some(value) = value {
                form.set(field, value.as_str());
            }
        }
        Some(form)
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.trim().is_empty())
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    fn temperature(&self) -> f32 {
        self.temperature
    }

    fn system_prompt(&self) -> &str {
        DEFAULT_SYSTEM_PROMPT
    }

    fn story_template(&self) -> &str {
        DEFAULT_STORY_TEMPLATE
    }

    fn title(&self) -> &str {
        &self.title
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_generator_settings(self, "--")
    }
}
