//! User interaction.
//!
//! All input goes through the [`Prompter`] trait so the menu logic can be
//! driven by a real terminal ([`terminal::TerminalPrompter`]) or by a script
//! in tests ([`mock::ScriptedPrompter`]). Output is plain colored printing in
//! [`output`].

use crate::error::Result;

pub mod mock;
pub mod output;
pub mod terminal;

pub use mock::{ScriptedAnswer, ScriptedPrompter};
pub use terminal::TerminalPrompter;

pub trait Prompter {
    /// Free-text input. Empty input is allowed and returned as "".
    fn input(&mut self, prompt: &str) -> Result<String>;

    /// Pick one of `items`, returning its index.
    fn select(&mut self, prompt: &str, items: &[String], default: usize) -> Result<usize>;

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool>;
}
