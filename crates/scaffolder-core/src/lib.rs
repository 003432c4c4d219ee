//! Scaffolder Core - Shared library for git-template scaffolding CLIs
//!
//! This library provides the core functionality for generating a project by
//! cloning a template repository and personalizing a handful of its files.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - Process execution, template edits, runtime detection
//! - **Layer 2: Workflow Orchestration** - `ProductConfig` trait, answer collection and
//!   the `Scaffolder` pipeline, driven through the `Prompter` boundary
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use scaffolder_core::{AnswerSheet, ProcessExecutor, Scaffolder, ScriptedPrompter, TemplateSource};
//!
//! let source = TemplateSource::from_config(&MyConfig)?;
//! let scaffolder = Scaffolder::new(MyConfig, ScriptedPrompter::defaults(), ProcessExecutor, source, ".");
//! let report = scaffolder.run(AnswerSheet::default()).await?;
//! ```

pub mod answers;
pub mod error;
pub mod exec;
pub mod product;
pub mod project;
pub mod prompt;
pub mod runtime;
pub mod templates;
pub mod workflow;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use answers::{collect_answers, AnswerSheet, ScaffoldAnswers};
pub use error::{ExecError, ScaffoldError};
pub use exec::{execute, CommandRunner, ExecutionOptions, ExecutionRequest, ProcessExecutor};
pub use product::ProductConfig;
pub use project::{Bundler, ProjectType};
pub use prompt::{Choice, Prompter, ScriptedAnswer, ScriptedPrompter};
pub use templates::TemplateSource;
pub use workflow::{ScaffoldReport, Scaffolder, Stage};

#[cfg(feature = "tui")]
pub use tui::run;
