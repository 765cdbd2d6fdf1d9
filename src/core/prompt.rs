use crate::domain::model::StoryRequest;
use crate::utils::error::{Result, StoryError};
use regex::{Captures, Regex};
use std::sync::LazyLock;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a warm, witty sportswriter. \
You write short, uplifting narratives about everyday players. \
Keep it under 200 words and never invent facts that contradict what the player told you.";

pub const DEFAULT_STORY_TEMPLATE: &str = "Write a short story about a player named {name}. \
They have been playing for {years}. {motto_line}\
In their own words, this is why they play: {reason}";

pub const PLACEHOLDERS: [&str; 6] = [
    "name",
    "motto",
    "motto_line",
    "years_played",
    "years",
    "reason",
];

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z_]+)\}").expect("placeholder pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptMessages {
    pub system: String,
    pub user: String,
}

#[derive(Debug, Clone)]
pub struct PromptBuilder {
    system: String,
    template: String,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_PROMPT, DEFAULT_STORY_TEMPLATE)
    }
}

impl PromptBuilder {
    pub fn new(system: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            template: template.into(),
        }
    }

    /// 檢查樣板中只出現已知的佔位符
    pub fn validate_template(field_name: &str, template: &str) -> Result<()> {
        for caps in PLACEHOLDER_RE.captures_iter(template) {
            let key = &caps[1];
            if !PLACEHOLDERS.contains(&key) {
                return Err(StoryError::ConfigValidationError {
                    field: field_name.to_string(),
                    message: format!(
                        "Unknown placeholder '{{{}}}'. Supported: {}",
                        key,
                        PLACEHOLDERS.join(", ")
                    ),
                });
            }
        }
        Ok(())
    }

    pub fn build(&self, request: &StoryRequest) -> PromptMessages {
        PromptMessages {
            system: render(&self.system, request),
            user: render(&self.template, request),
        }
    }
}

fn years_phrase(years: u32) -> String {
    if years == 1 {
        "1 year".to_string()
    } else {
        format!("{} years", years)
    }
}

fn render(template: &str, request: &StoryRequest) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures| match &caps[1] {
            "name" => request.name.clone(),
            "motto" => request.motto.clone().unwrap_or_default(),
            "motto_line" => request
                .motto
                .as_ref()
                .map(|m| format!("Their motto is \"{}\". ", m))
                .unwrap_or_default(),
            "years_played" => request.years_played.to_string(),
            "years" => years_phrase(request.years_played),
            "reason" => request.reason.clone(),
            // 未知的佔位符原樣保留
            _ => caps[0].to_string(),
        })
        .into_owned()
}
