use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Name,
    Motto,
    YearsPlayed,
    Reason,
}

impl FormField {
    /// 表單顯示順序
    pub const ALL: [FormField; 4] = [
        FormField::Name,
        FormField::Motto,
        FormField::YearsPlayed,
        FormField::Reason,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Motto => "motto",
            FormField::YearsPlayed => "years",
            FormField::Reason => "reason",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Motto => "Motto",
            FormField::YearsPlayed => "Years played",
            FormField::Reason => "Why you play",
        }
    }

    pub fn is_required(&self) -> bool {
        !matches!(self, FormField::Motto)
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FormField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(FormField::Name),
            "motto" => Ok(FormField::Motto),
            "years" | "years_played" | "years-played" => Ok(FormField::YearsPlayed),
            "reason" => Ok(FormField::Reason),
            other => Err(format!("unknown field '{}'", other)),
        }
    }
}

/// 使用者輸入中的表單，欄位保留原始字串
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerForm {
    pub name: String,
    pub motto: String,
    pub years_played: String,
    pub reason: String,
}

/// 已驗證、準備送出的請求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryRequest {
    pub name: String,
    pub motto: Option<String>,
    pub years_played: u32,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub text: String,
    pub model: String,
    pub generated_at: DateTime<Utc>,
}

impl Story {
    pub fn new(text: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            model: model.into(),
            generated_at: Utc::now(),
        }
    }
}
