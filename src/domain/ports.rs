use crate::domain::model::{Story, StoryRequest};
use crate::utils::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait StoryGenerator: Send + Sync {
    async fn generate(&self, request: &StoryRequest) -> Result<Story>;
}

pub trait ConfigProvider: Send + Sync {
    fn endpoint(&self) -> &str;
    fn model(&self) -> &str;
    fn api_key(&self) -> Option<&str>;
    fn timeout_seconds(&self) -> u64;
    fn max_tokens(&self) -> u32;
    fn temperature(&self) -> f32;
    fn system_prompt(&self) -> &str;
    fn story_template(&self) -> &str;
    fn title(&self) -> &str;
}
