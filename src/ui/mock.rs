//! Scripted prompter for testing
//!
//! Answers are consumed in order. Running out of answers behaves like a
//! closed input stream.

use super::Prompter;
use crate::error::{Result, TagfixError};
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptedAnswer {
    Text(String),
    Choice(usize),
    Confirm(bool),
    /// Simulate Ctrl-C at this prompt
    Interrupt,
}

impl ScriptedAnswer {
    pub fn text(value: impl Into<String>) -> Self {
        ScriptedAnswer::Text(value.into())
    }
}

#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<ScriptedAnswer>,
    /// Every prompt shown, in order
    pub prompts: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = ScriptedAnswer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            prompts: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next(&mut self, prompt: &str) -> Result<ScriptedAnswer> {
        self.prompts.push(prompt.to_string());
        match self.answers.pop_front() {
            Some(ScriptedAnswer::Interrupt) => Err(TagfixError::UserInterrupt),
            Some(answer) => Ok(answer),
            None => Err(TagfixError::InputClosed),
        }
    }
}

fn unexpected(prompt: &str, answer: &ScriptedAnswer) -> TagfixError {
    TagfixError::InvalidMenuInput(format!(
        "scripted answer {answer:?} does not fit prompt '{prompt}'"
    ))
}

impl Prompter for ScriptedPrompter {
    fn input(&mut self, prompt: &str) -> Result<String> {
        match self.next(prompt)? {
            ScriptedAnswer::Text(text) => Ok(text),
            other => Err(unexpected(prompt, &other)),
        }
    }

    fn select(&mut self, prompt: &str, items: &[String], _default: usize) -> Result<usize> {
        match self.next(prompt)? {
            ScriptedAnswer::Choice(index) if index < items.len() => Ok(index),
            other => Err(unexpected(prompt, &other)),
        }
    }

    fn confirm(&mut self, prompt: &str, _default: bool) -> Result<bool> {
        match self.next(prompt)? {
            ScriptedAnswer::Confirm(value) => Ok(value),
            other => Err(unexpected(prompt, &other)),
        }
    }
}
