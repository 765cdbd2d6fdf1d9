use crate::core::flow::{StoryFlow, View};
use crate::core::{PlayerForm, StoryGenerator};
use crate::utils::error::Result;
use std::io::Write;

pub const EXIT_OK: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_INCOMPLETE: i32 = 2;

/// 非互動模式：送出一次，故事寫到 `out`，錯誤寫到 `err`，回傳結束代碼
pub async fn run_once<G, W, E>(
    form: PlayerForm,
    generator: &G,
    out: &mut W,
    err: &mut E,
) -> Result<i32>
where
    G: StoryGenerator + ?Sized,
    W: Write,
    E: Write,
{
    let mut flow = StoryFlow::new();
    *flow.form_mut()? = form;

    if !flow.can_submit() {
        let missing: Vec<&str> = flow
            .form()
            .missing_fields()
            .iter()
            .map(|f| f.label())
            .collect();
        writeln!(err, "❌ Missing required fields: {}", missing.join(", "))?;
        writeln!(err, "💡 Provide --name, --years-played and --reason")?;
        return Ok(EXIT_INCOMPLETE);
    }

    match flow.submit(generator).await? {
        View::Result(story) => {
            writeln!(out, "{}", story.text)?;
            Ok(EXIT_OK)
        }
        View::Error(message) => {
            writeln!(err, "❌ {}", message)?;
            Ok(EXIT_FAILURE)
        }
        View::Form | View::Loading => Ok(EXIT_FAILURE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::flow::GENERIC_ERROR_MESSAGE;
    use crate::core::{FormField, Story, StoryRequest};
    use crate::utils::error::StoryError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockGenerator {
        fail: bool,
        calls: AtomicUsize,
    }

    impl MockGenerator {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl StoryGenerator for MockGenerator {
        async fn generate(&self, request: &StoryRequest) -> Result<Story> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(StoryError::ApiStatus {
                    status: 429,
                    body: "slow down".to_string(),
                });
            }
            Ok(Story::new(format!("{} keeps showing up.", request.name), "mock-model"))
        }
    }

    fn filled_form() -> PlayerForm {
        let mut form = PlayerForm::new();
        form.set(FormField::Name, "Ada");
        form.set(FormField::YearsPlayed, "6");
        form.set(FormField::Reason, "Saturday mornings");
        form
    }

    #[tokio::test]
    async fn test_run_once_success_prints_story() {
        let generator = MockGenerator::new(false);
        let (mut out, mut err) = (Vec::new(), Vec::new());

        let code = run_once(filled_form(), &generator, &mut out, &mut err)
            .await
            .unwrap();

        assert_eq!(code, EXIT_OK);
        assert_eq!(String::from_utf8(out).unwrap(), "Ada keeps showing up.\n");
        assert!(err.is_empty());
    }

    #[tokio::test]
    async fn test_run_once_failure_prints_generic_message() {
        let generator = MockGenerator::new(true);
        let (mut out, mut err) = (Vec::new(), Vec::new());

        let code = run_once(filled_form(), &generator, &mut out, &mut err)
            .await
            .unwrap();

        let err = String::from_utf8(err).unwrap();
        assert_eq!(code, EXIT_FAILURE);
        assert!(out.is_empty());
        assert!(err.contains(GENERIC_ERROR_MESSAGE));
        assert!(!err.contains("slow down"));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_run_once_incomplete_form_sends_nothing() {
        let generator = MockGenerator::new(false);
        let mut form = filled_form();
        form.clear(FormField::Reason);
        form.set(FormField::YearsPlayed, "six");
        let (mut out, mut err) = (Vec::new(), Vec::new());

        let code = run_once(form, &generator, &mut out, &mut err).await.unwrap();

        let err = String::from_utf8(err).unwrap();
        assert_eq!(code, EXIT_INCOMPLETE);
        assert!(err.contains("Missing required fields: Years played, Why you play"));
        assert!(out.is_empty());
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }
}
