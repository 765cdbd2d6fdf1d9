pub mod flow;
pub mod form;
pub mod prompt;

pub use crate::domain::model::{FormField, PlayerForm, Story, StoryRequest};
pub use crate::domain::ports::{ConfigProvider, StoryGenerator};
pub use crate::utils::error::Result;
