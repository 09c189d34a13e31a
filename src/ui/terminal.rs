use super::Prompter;
use crate::cancel::CancelToken;
use crate::error::{Result, TagfixError};
use console::Term;
use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};

/// Interactive prompts on the controlling terminal.
///
/// Ctrl-C while a prompt is reading comes back from dialoguer as an
/// interrupted read; a signal delivered outside a prompt is seen through the
/// cancel token on the next prompt.
pub struct TerminalPrompter {
    theme: ColorfulTheme,
    cancel: CancelToken,
}

impl TerminalPrompter {
    pub fn new(cancel: CancelToken) -> Self {
        Self {
            theme: ColorfulTheme::default(),
            cancel,
        }
    }

    fn finish<T>(&self, result: std::result::Result<T, dialoguer::Error>) -> Result<T> {
        let value = result.map_err(TagfixError::from).inspect_err(|e| {
            if matches!(e, TagfixError::UserInterrupt) {
                // dialoguer hides the cursor while reading keys
                let _ = Term::stdout().show_cursor();
                self.cancel.cancel();
            }
        })?;
        self.cancel.checkpoint()?;
        Ok(value)
    }
}

impl Prompter for TerminalPrompter {
    fn input(&mut self, prompt: &str) -> Result<String> {
        self.cancel.checkpoint()?;
        let result = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text();
        self.finish(result)
    }

    fn select(&mut self, prompt: &str, items: &[String], default: usize) -> Result<usize> {
        self.cancel.checkpoint()?;
        let result = Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(default)
            .interact();
        self.finish(result)
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool> {
        self.cancel.checkpoint()?;
        let result = Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact();
        self.finish(result)
    }
}
