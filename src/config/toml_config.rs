use crate::config::{
    validate_generator_settings, DEFAULT_ENDPOINT, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE,
    DEFAULT_TIMEOUT_SECONDS, DEFAULT_TITLE,
};
use crate::core::prompt::{DEFAULT_STORY_TEMPLATE, DEFAULT_SYSTEM_PROMPT};
use crate::core::ConfigProvider;
use crate::utils::error::{Result, StoryError};
use crate::utils::validation::{is_unresolved_placeholder, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub app: Option<AppConfig>,
    pub generator: GeneratorConfig,
    pub prompt: Option<PromptConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub endpoint: Option<String>,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    pub system: Option<String>,
    pub template: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| StoryError::ConfigError {
                message: format!("cannot read {}: {}", path.display(), e),
            })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| StoryError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${OPENAI_API_KEY})，找不到的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// TOML 沒有可用的 API key 時改用命令列或環境變數提供的
    pub fn apply_api_key_fallback(&mut self, fallback: Option<String>) {
        if self.api_key().is_none() {
            if let Some(key) = fallback.filter(|k| !k.trim().is_empty()) {
                tracing::debug!("Using API key from command line / environment");
                self.generator.api_key = Some(key);
            }
        }
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(key) = &self.generator.api_key {
            if is_unresolved_placeholder(key) {
                tracing::warn!("⚠️ generator.api_key references an unset variable: {}", key);
            }
        }
        validate_generator_settings(self, "generator.")
    }
}

impl ConfigProvider for TomlConfig {
    fn endpoint(&self) -> &str {
        self.generator.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    fn model(&self) -> &str {
        &self.generator.model
    }

    fn api_key(&self) -> Option<&str> {
        self.generator
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty() && !is_unresolved_placeholder(key))
    }

    fn timeout_seconds(&self) -> u64 {
        self.generator
            .timeout_seconds
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    fn max_tokens(&self) -> u32 {
        self.generator.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)
    }

    fn temperature(&self) -> f32 {
        self.generator.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    fn system_prompt(&self) -> &str {
        self.prompt
            .as_ref()
            .and_then(|p| p.system.as_deref())
            .unwrap_or(DEFAULT_SYSTEM_PROMPT)
    }

    fn story_template(&self) -> &str {
        self.prompt
            .as_ref()
            .and_then(|p| p.template.as_deref())
            .unwrap_or(DEFAULT_STORY_TEMPLATE)
    }

    fn title(&self) -> &str {
        self.app
            .as_ref()
            .and_then(|a| a.title.as_deref())
            .unwrap_or(DEFAULT_TITLE)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_minimal_toml_config() {
        let toml_content = r#"
[generator]
model = "gpt-4o-mini"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(config.model(), "gpt-4o-mini");
        assert_eq!(config.api_key(), None);
        assert_eq!(config.max_tokens(), DEFAULT_MAX_TOKENS);
        assert_eq!(config.title(), DEFAULT_TITLE);
        assert_eq!(config.story_template(), DEFAULT_STORY_TEMPLATE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[app]
title = "Club Legends"

[generator]
endpoint = "http://localhost:11434/v1/chat/completions"
model = "llama3"
api_key = "local-key"
timeout_seconds = 60
max_tokens = 150
temperature = 1.1

[prompt]
system = "You write club newsletters."
template = "Profile {name}, {years} in."
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.title(), "Club Legends");
        assert_eq!(config.endpoint(), "http://localhost:11434/v1/chat/completions");
        assert_eq!(config.api_key(), Some("local-key"));
        assert_eq!(config.timeout_seconds(), 60);
        assert_eq!(config.temperature(), 1.1);
        assert_eq!(config.story_template(), "Profile {name}, {years} in.");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PLAYER_STORY_TEST_KEY", "sk-from-env");

        let toml_content = r#"
[generator]
model = "gpt-4o-mini"
api_key = "${PLAYER_STORY_TEST_KEY}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api_key(), Some("sk-from-env"));

        std::env::remove_var("PLAYER_STORY_TEST_KEY");
    }

    #[test]
    fn test_unresolved_api_key_falls_back() {
        let toml_content = r#"
[generator]
model = "gpt-4o-mini"
api_key = "${PLAYER_STORY_SURELY_UNSET_VAR}"
"#;

        let mut config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api_key(), None);
        assert!(config.validate().is_ok());

        config.apply_api_key_fallback(Some("sk-cli".to_string()));
        assert_eq!(config.api_key(), Some("sk-cli"));
    }

    #[test]
    fn test_fallback_does_not_override_configured_key() {
        let toml_content = r#"
[generator]
model = "gpt-4o-mini"
api_key = "sk-toml"
"#;

        let mut config = TomlConfig::from_toml_str(toml_content).unwrap();
        config.apply_api_key_fallback(Some("sk-cli".to_string()));

        assert_eq!(config.api_key(), Some("sk-toml"));
    }

    #[test]
    fn test_config_validation() {
        let invalid_endpoint = r#"
[generator]
endpoint = "invalid-url"
model = "gpt-4o-mini"
"#;
        let config = TomlConfig::from_toml_str(invalid_endpoint).unwrap();
        assert!(config.validate().is_err());

        let unknown_placeholder = r#"
[generator]
model = "gpt-4o-mini"

[prompt]
template = "Tell me about {team}"
"#;
        let config = TomlConfig::from_toml_str(unknown_placeholder).unwrap();
        assert!(matches!(
            config.validate(),
            Err(StoryError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_missing_model_is_parse_error() {
        let toml_content = r#"
[generator]
endpoint = "https://api.example.com"
"#;

        assert!(TomlConfig::from_toml_str(toml_content).is_err());
    }

    #[test]
    fn test_config_from_missing_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.toml");

        match TomlConfig::from_file(&path) {
            Err(StoryError::ConfigError { message }) => {
                assert!(message.contains("missing.toml"));
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_model_is_missing_config() {
        let toml_content = r#"
[generator]
model = "  "
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        match config.validate() {
            Err(StoryError::MissingConfigError { field }) => {
                assert_eq!(field, "generator.model");
            }
            other => panic!("expected MissingConfigError, got {:?}", other),
        }
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[app]
title = "File Test"

[generator]
model = "gpt-4o-mini"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.title(), "File Test");
    }
}
