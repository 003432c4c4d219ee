//! Prompt service boundary
//!
//! The workflow asks questions and reports progress only through [`Prompter`].
//! The interactive implementation lives in `tui` (cliclack); [`ScriptedPrompter`]
//! answers from a queue and records what was shown, for tests and
//! non-interactive runs.

use std::collections::VecDeque;
use std::io;
use std::sync::Mutex;

/// One entry of a single-select question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice<T> {
    pub name: String,
    pub value: T,
    pub description: String,
}

impl<T> Choice<T> {
    pub fn new(name: impl Into<String>, value: T, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value,
            description: description.into(),
        }
    }
}

/// Blocking, one-question-at-a-time user interaction
pub trait Prompter {
    /// Free text, `default` used when the user just presses enter
    fn text(&self, message: &str, default: &str) -> io::Result<String>;

    /// Pick one of `choices`, returning its value
    fn select<T: Clone + Eq>(&self, message: &str, choices: &[Choice<T>]) -> io::Result<T>;

    fn confirm(&self, message: &str, default: bool) -> io::Result<bool>;

    /// A long-running step started
    fn begin(&self, _message: &str) -> io::Result<()> {
        Ok(())
    }

    /// The step started by [`Prompter::begin`] ended
    fn end(&self, _message: &str, _success: bool) -> io::Result<()> {
        Ok(())
    }

    /// Completion banner with numbered next steps
    fn finish(&self, next_steps: &[String]) -> io::Result<()>;
}

/// Answer queued for a [`ScriptedPrompter`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedAnswer {
    /// Text answer; an empty string takes the default
    Text(String),
    /// Choice name (case-insensitive)
    Select(String),
    Confirm(bool),
    /// Accept whatever default the question offers
    Default,
}

/// Prompter that replays queued answers.
///
/// When the queue runs dry every question takes its default (first choice
/// for selects), which is what `--yes` means for the CLI.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<ScriptedAnswer>>,
    asked: Mutex<Vec<String>>,
    banners: Mutex<Vec<Vec<String>>>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = ScriptedAnswer>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Prompter that takes every default
    pub fn defaults() -> Self {
        Self::default()
    }

    /// Messages of every question asked so far, in order
    pub fn asked(&self) -> Vec<String> {
        lock(&self.asked).clone()
    }

    /// Next-step lists passed to [`Prompter::finish`]
    pub fn banners(&self) -> Vec<Vec<String>> {
        lock(&self.banners).clone()
    }

    fn next(&self, message: &str) -> ScriptedAnswer {
        lock(&self.asked).push(message.to_string());
        lock(&self.answers)
            .pop_front()
            .unwrap_or(ScriptedAnswer::Default)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn mismatch(message: &str, expected: &str, got: &ScriptedAnswer) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("'{}' expects a {} answer, got {:?}", message, expected, got),
    )
}

impl Prompter for ScriptedPrompter {
    fn text(&self, message: &str, default: &str) -> io::Result<String> {
        match self.next(message) {
            ScriptedAnswer::Text(text) if text.is_empty() => Ok(default.to_string()),
            ScriptedAnswer::Text(text) => Ok(text),
            ScriptedAnswer::Default => Ok(default.to_string()),
            other => Err(mismatch(message, "text", &other)),
        }
    }

    fn select<T: Clone + Eq>(&self, message: &str, choices: &[Choice<T>]) -> io::Result<T> {
        let answer = self.next(message);
        let picked = match &answer {
            ScriptedAnswer::Select(name) => choices
                .iter()
                .find(|c| c.name.eq_ignore_ascii_case(name)),
            ScriptedAnswer::Default => choices.first(),
            other => return Err(mismatch(message, "select", other)),
        };
        picked.map(|c| c.value.clone()).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("'{}' has no choice matching {:?}", message, answer),
            )
        })
    }

    fn confirm(&self, message: &str, default: bool) -> io::Result<bool> {
        match self.next(message) {
            ScriptedAnswer::Confirm(value) => Ok(value),
            ScriptedAnswer::Default => Ok(default),
            other => Err(mismatch(message, "confirm", &other)),
        }
    }

    fn finish(&self, next_steps: &[String]) -> io::Result<()> {
        lock(&self.banners).push(next_steps.to_vec());
        Ok(())
    }
}
