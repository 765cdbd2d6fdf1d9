use crate::domain::model::{FormField, PlayerForm, Story, StoryRequest};
use crate::domain::ports::StoryGenerator;
use crate::utils::error::{Result, StoryError};

/// 任何生成失敗都只顯示這段訊息，細節寫入日誌
pub const GENERIC_ERROR_MESSAGE: &str =
    "Sorry, something went wrong while writing your story. Please try again.";

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Form,
    Loading,
    Result(Story),
    Error(String),
}

impl View {
    pub fn name(&self) -> &'static str {
        match self {
            View::Form => "form",
            View::Loading => "loading",
            View::Result(_) => "result",
            View::Error(_) => "error",
        }
    }
}

/// 表單 → 結果 兩個畫面的狀態機
#[derive(Debug, Clone)]
pub struct StoryFlow {
    form: PlayerForm,
    view: View,
}

impl Default for StoryFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl StoryFlow {
    pub fn new() -> Self {
        Self {
            form: PlayerForm::new(),
            view: View::Form,
        }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn form(&self) -> &PlayerForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> Result<&mut PlayerForm> {
        self.require_form_view("edit the form")?;
        Ok(&mut self.form)
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) -> Result<()> {
        self.form_mut()?.set(field, value);
        Ok(())
    }

    pub fn can_submit(&self) -> bool {
        self.view == View::Form && self.form.can_submit()
    }

    fn require_form_view(&self, action: &str) -> Result<()> {
        if self.view != View::Form {
            return Err(StoryError::InvalidState {
                message: format!("cannot {} while on the {} screen", action, self.view.name()),
            });
        }
        Ok(())
    }

    /// Form → Loading。表單不完整或已有請求進行中時不改變狀態
    pub fn begin_submit(&mut self) -> Result<StoryRequest> {
        self.require_form_view("submit")?;
        let request = self.form.to_request()?;
        self.view = View::Loading;
        tracing::debug!("Form submitted for {}", request.name);
        Ok(request)
    }

    pub fn complete(&mut self, outcome: Result<Story>) -> Result<()> {
        if self.view != View::Loading {
            return Err(StoryError::InvalidState {
                message: format!("no request in flight (on the {} screen)", self.view.name()),
            });
        }

        self.view = match outcome {
            Ok(story) => {
                tracing::info!("✅ Story generated ({} chars, model {})", story.text.len(), story.model);
                View::Result(story)
            }
            Err(e) => {
                tracing::error!(
                    "❌ Story generation failed: {} (Category: {:?})",
                    e,
                    e.category()
                );
                View::Error(GENERIC_ERROR_MESSAGE.to_string())
            }
        };
        Ok(())
    }

    pub async fn submit<G: StoryGenerator + ?Sized>(&mut self, generator: &G) -> Result<&View> {
        let request = self.begin_submit()?;
        let outcome = generator.generate(&request).await;
        self.complete(outcome)?;
        Ok(&self.view)
    }

    /// 回到表單並保留已填的內容
    pub fn back_to_form(&mut self) -> Result<()> {
        match self.view {
            View::Result(_) | View::Error(_) => {
                self.view = View::Form;
                Ok(())
            }
            View::Form => Ok(()),
            View::Loading => Err(StoryError::InvalidState {
                message: "cannot leave the loading screen".to_string(),
            }),
        }
    }

    pub fn reset(&mut self) -> Result<()> {
        if self.view == View::Loading {
            return Err(StoryError::InvalidState {
                message: "cannot reset while a story is being generated".to_string(),
            });
        }
        self.form.reset();
        self.view = View::Form;
        Ok(())
    }
}
