use crate::core::flow::{StoryFlow, View};
use crate::core::{FormField, Story, StoryGenerator};
use crate::utils::error::Result;
use std::io::{BufRead, Write};

const HELP_TEXT: &str = "\
Commands:
  <field>=<value>   set a field (fields: name, motto, years, reason)
  clear <field>     empty a field
  fill              walk through every field again
  submit            send the form (needs name, years and reason)
  reset             clear the form
  edit / back       return to the form from a story or an error
  new               start over with an empty form
  help              show this list
  quit              leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set(FormField, String),
    Clear(FormField),
    Fill,
    Submit,
    Reset,
    Edit,
    New,
    Back,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Command {
        let line = line.trim();

        if let Some((key, value)) = line.split_once('=') {
            return match key.parse::<FormField>() {
                Ok(field) => Command::Set(field, value.trim().to_string()),
                Err(_) => Command::Unknown(line.to_string()),
            };
        }

        let mut parts = line.splitn(2, char::is_whitespace);
        let word = parts.next().unwrap_or_default().to_ascii_lowercase();
        let rest = parts.next().map(str::trim);

        match (word.as_str(), rest) {
            ("clear", Some(field)) => field
                .parse::<FormField>()
                .map(Command::Clear)
                .unwrap_or_else(|_| Command::Unknown(line.to_string())),
            ("fill", None) => Command::Fill,
            ("submit" | "s", None) => Command::Submit,
            ("reset", None) => Command::Reset,
            ("edit", None) => Command::Edit,
            ("new", None) => Command::New,
            ("back", None) => Command::Back,
            ("help" | "?", None) => Command::Help,
            ("quit" | "q" | "exit", None) => Command::Quit,
            _ => Command::Unknown(line.to_string()),
        }
    }
}

/// 以逐行輸入驅動表單流程的終端介面
pub struct TerminalApp<R, W, G> {
    input: R,
    output: W,
    generator: G,
    flow: StoryFlow,
    title: String,
}

impl<R: BufRead, W: Write, G: StoryGenerator> TerminalApp<R, W, G> {
    pub fn new(input: R, output: W, generator: G, title: impl Into<String>) -> Self {
        Self {
            input,
            output,
            generator,
            flow: StoryFlow::new(),
            title: title.into(),
        }
    }

    pub fn flow(&self) -> &StoryFlow {
        &self.flow
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub async fn run(&mut self) -> Result<()> {
        self.render_header()?;
        writeln!(self.output, "Type 'help' at any time for the list of commands.")?;

        if self.guided_fill()? {
            loop {
                let view = self.flow.view().clone();
                let keep_going = match view {
                    View::Form => self.form_step().await?,
                    View::Result(story) => self.result_step(&story)?,
                    View::Error(message) => self.error_step(&message)?,
                    // submit 完成前不會回到這裡
                    View::Loading => false,
                };
                if !keep_going {
                    break;
                }
            }
        }

        writeln!(self.output, "Bye!")?;
        self.output.flush()?;
        Ok(())
    }

    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// 依序詢問每個欄位，空白輸入保留目前的值；讀到 EOF 時回傳 false
    fn guided_fill(&mut self) -> Result<bool> {
        writeln!(self.output, "Tell us about your game. Press Enter to keep a field as it is.")?;

        for field in FormField::ALL {
            let marker = if field.is_required() { "*" } else { " (optional)" };

            // help 之後重新詢問同一欄位
            loop {
                let current = self.flow.form().get(field).to_string();
                let prompt = if current.is_empty() {
                    format!("{}{}: ", field.label(), marker)
                } else {
                    format!("{}{} [{}]: ", field.label(), marker, current)
                };

                let Some(answer) = self.read_line(&prompt)? else {
                    return Ok(false);
                };
                let answer = answer.trim();
                match Command::parse(answer) {
                    Command::Help => {
                        writeln!(self.output, "{}", HELP_TEXT)?;
                        continue;
                    }
                    Command::Quit => return Ok(false),
                    _ => {}
                }
                if !answer.is_empty() {
                    self.flow.set_field(field, answer)?;
                    self.warn_if_bad_years(field)?;
                }
                break;
            }
        }
        Ok(true)
    }

    fn warn_if_bad_years(&mut self, field: FormField) -> Result<()> {
        if field == FormField::YearsPlayed && self.flow.form().years_played().is_none() {
            writeln!(self.output, "  Years played must be a whole number, like 3.")?;
        }
        Ok(())
    }

    async fn form_step(&mut self) -> Result<bool> {
        self.render_form()?;
        let Some(line) = self.read_line("> ")? else {
            return Ok(false);
        };

        match Command::parse(&line) {
            Command::Set(field, value) => {
                self.flow.set_field(field, value)?;
                self.warn_if_bad_years(field)?;
            }
            Command::Clear(field) => self.flow.form_mut()?.clear(field),
            Command::Fill => return self.guided_fill(),
            Command::Submit => self.submit().await?,
            Command::Reset | Command::New => {
                self.flow.reset()?;
                writeln!(self.output, "Form cleared.")?;
            }
            Command::Help => writeln!(self.output, "{}", HELP_TEXT)?,
            Command::Quit => return Ok(false),
            Command::Edit | Command::Back => {
                writeln!(self.output, "You are already on the form.")?;
            }
            Command::Unknown(input) => self.unknown(&input)?,
        }
        Ok(true)
    }

    async fn submit(&mut self) -> Result<()> {
        if !self.flow.can_submit() {
            let missing: Vec<&str> = self
                .flow
                .form()
                .missing_fields()
                .iter()
                .map(|f| f.label())
                .collect();
            writeln!(
                self.output,
                "Submit is disabled until you fill in: {}",
                missing.join(", ")
            )?;
            return Ok(());
        }

        writeln!(self.output, "⏳ Writing your story...")?;
        self.output.flush()?;
        self.flow.submit(&self.generator).await?;
        Ok(())
    }

    fn result_step(&mut self, story: &Story) -> Result<bool> {
        writeln!(self.output)?;
        writeln!(self.output, "📖 Your story")?;
        writeln!(self.output)?;
        writeln!(self.output, "{}", story.text)?;
        writeln!(self.output)?;
        writeln!(
            self.output,
            "({} at {})",
            story.model,
            story.generated_at.format("%Y-%m-%d %H:%M UTC")
        )?;
        writeln!(self.output, "Type 'edit' to change your answers, 'new' to start over or 'quit'.")?;

        self.after_outcome_step()
    }

    fn error_step(&mut self, message: &str) -> Result<bool> {
        writeln!(self.output)?;
        writeln!(self.output, "❌ {}", message)?;
        writeln!(self.output, "Type 'back' to return to your answers, 'new' to start over or 'quit'.")?;

        self.after_outcome_step()
    }

    // 結果畫面與錯誤畫面共用的指令
    fn after_outcome_step(&mut self) -> Result<bool> {
        let Some(line) = self.read_line("> ")? else {
            return Ok(false);
        };

        match Command::parse(&line) {
            Command::Edit | Command::Back => self.flow.back_to_form()?,
            Command::New | Command::Reset => {
                self.flow.reset()?;
                return self.guided_fill();
            }
            Command::Help => writeln!(self.output, "{}", HELP_TEXT)?,
            Command::Quit => return Ok(false),
            Command::Unknown(input) => self.unknown(&input)?,
            _ => writeln!(self.output, "Go back to the form first with 'edit'.")?,
        }
        Ok(true)
    }

    fn unknown(&mut self, input: &str) -> Result<()> {
        if !input.is_empty() {
            writeln!(self.output, "Unknown command '{}'. Type 'help' for options.", input)?;
        }
        Ok(())
    }

    fn render_header(&mut self) -> Result<()> {
        writeln!(self.output, "== {} ==", self.title)?;
        Ok(())
    }

    fn render_form(&mut self) -> Result<()> {
        writeln!(self.output)?;
        for field in FormField::ALL {
            let value = self.flow.form().get(field);
            let label = if field.is_required() {
                format!("{}*", field.label())
            } else {
                field.label().to_string()
            };
            let shown = if value.is_empty() { "(empty)" } else { value };
            writeln!(self.output, "  {:<14} {}", label, shown)?;
        }

        let missing = self.flow.form().missing_fields();
        if missing.is_empty() {
            writeln!(self.output, "Submit: enabled")?;
        } else {
            let names: Vec<&str> = missing.iter().map(|f| f.label()).collect();
            writeln!(self.output, "Submit: disabled (missing: {})", names.join(", "))?;
        }
        Ok(())
    }
}
