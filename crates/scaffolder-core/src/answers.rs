//! Question sequence and the answers it produces
//!
//! Questions form a linear state machine over an [`AnswerSheet`]. Each
//! [`Question`] knows its successor given the answers so far, so a project type
//! that needs an extra question only touches [`Question::next`].

use crate::error::{Result, ScaffoldError};
use crate::project::{Bundler, ProjectType};
use crate::prompt::{Choice, Prompter};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Project name offered when the user just presses enter
pub const DEFAULT_PROJECT_NAME: &str = "my-app";

/// Answers collected so far. Anything already set is not asked again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnswerSheet {
    pub project_name: Option<String>,
    pub project_type: Option<ProjectType>,
    pub title: Option<String>,
    pub bundler: Option<Bundler>,
    pub use_lint: Option<bool>,
    pub use_formatter: Option<bool>,
}

impl AnswerSheet {
    /// Parse an answers file
    pub fn from_yaml(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Fill unset fields from `other`
    pub fn or(self, other: AnswerSheet) -> Self {
        Self {
            project_name: self.project_name.or(other.project_name),
            project_type: self.project_type.or(other.project_type),
            title: self.title.or(other.title),
            bundler: self.bundler.or(other.bundler),
            use_lint: self.use_lint.or(other.use_lint),
            use_formatter: self.use_formatter.or(other.use_formatter),
        }
    }

    /// Validate and freeze into [`ScaffoldAnswers`]
    pub fn finish(self) -> Result<ScaffoldAnswers> {
        let project_name = self
            .project_name
            .ok_or_else(|| ScaffoldError::invalid_answer("project name", "missing"))?;
        validate_project_name(&project_name)
            .map_err(|message| ScaffoldError::invalid_answer("project name", message))?;
        let project_name = project_name.trim().to_string();

        let project_type = self
            .project_type
            .ok_or_else(|| ScaffoldError::invalid_answer("project type", "missing"))?;

        let title = if project_type.needs_title() {
            let title = self
                .title
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .ok_or_else(|| ScaffoldError::invalid_answer("title", "missing"))?;
            Some(title)
        } else {
            None
        };

        Ok(ScaffoldAnswers {
            project_name,
            project_type,
            title,
            bundler: self
                .bundler
                .ok_or_else(|| ScaffoldError::invalid_answer("bundler", "missing"))?,
            use_lint: self
                .use_lint
                .ok_or_else(|| ScaffoldError::invalid_answer("lint", "missing"))?,
            use_formatter: self
                .use_formatter
                .ok_or_else(|| ScaffoldError::invalid_answer("formatter", "missing"))?,
        })
    }
}

/// Final answers; fixed for the rest of the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScaffoldAnswers {
    pub project_name: String,
    pub project_type: ProjectType,
    /// Present exactly when `project_type.needs_title()`
    pub title: Option<String>,
    pub bundler: Bundler,
    pub use_lint: bool,
    pub use_formatter: bool,
}

/// Project names become a directory under the invocation directory
pub fn validate_project_name(name: &str) -> std::result::Result<(), String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("must not be empty".to_string());
    }
    if name == "." || name == ".." {
        return Err(format!("'{}' is not a valid directory name", name));
    }
    if name.contains(['/', '\\']) {
        return Err("must not contain path separators".to_string());
    }
    // Would be read as a git option
    if name.starts_with('-') {
        return Err("must not start with '-'".to_string());
    }
    Ok(())
}

/// One question of the sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Question {
    ProjectName,
    ProjectType,
    Title,
    Bundler,
    Lint,
    Formatter,
}

impl Question {
    pub const FIRST: Question = Question::ProjectName;

    /// Transition table
    pub fn next(self, sheet: &AnswerSheet) -> Option<Question> {
        match self {
            Question::ProjectName => Some(Question::ProjectType),
            Question::ProjectType => match sheet.project_type {
                Some(t) if t.needs_title() => Some(Question::Title),
                _ => Some(Question::Bundler),
            },
            Question::Title => Some(Question::Bundler),
            Question::Bundler => Some(Question::Lint),
            Question::Lint => Some(Question::Formatter),
            Question::Formatter => None,
        }
    }

    pub fn is_answered(self, sheet: &AnswerSheet) -> bool {
        match self {
            Question::ProjectName => sheet.project_name.is_some(),
            Question::ProjectType => sheet.project_type.is_some(),
            Question::Title => sheet.title.is_some(),
            Question::Bundler => sheet.bundler.is_some(),
            Question::Lint => sheet.use_lint.is_some(),
            Question::Formatter => sheet.use_formatter.is_some(),
        }
    }

    fn ask<P: Prompter>(self, prompter: &P, sheet: &mut AnswerSheet) -> Result<()> {
        match self {
            Question::ProjectName => {
                let name = prompter
                    .text("Project name", DEFAULT_PROJECT_NAME)
                    .map_err(ScaffoldError::Prompt)?;
                validate_project_name(&name)
                    .map_err(|message| ScaffoldError::invalid_answer("project name", message))?;
                sheet.project_name = Some(name.trim().to_string());
            }
            Question::ProjectType => {
                let choices: Vec<_> = ProjectType::ALL
                    .iter()
                    .map(|t| Choice::new(t.display_name(), *t, t.description()))
                    .collect();
                let picked = prompter
                    .select("Project type", &choices)
                    .map_err(ScaffoldError::Prompt)?;
                sheet.project_type = Some(picked);
            }
            Question::Title => {
                let default = sheet.project_name.clone().unwrap_or_default();
                let title = prompter
                    .text("Title", &default)
                    .map_err(ScaffoldError::Prompt)?;
                sheet.title = Some(title);
            }
            Question::Bundler => {
                let choices: Vec<_> = Bundler::ALL
                    .iter()
                    .map(|b| Choice::new(b.display_name(), *b, b.description()))
                    .collect();
                let picked = prompter
                    .select("Bundler", &choices)
                    .map_err(ScaffoldError::Prompt)?;
                sheet.bundler = Some(picked);
            }
            Question::Lint => {
                let yes = prompter
                    .confirm("Use ESLint for linting?", true)
                    .map_err(ScaffoldError::Prompt)?;
                sheet.use_lint = Some(yes);
            }
            Question::Formatter => {
                let yes = prompter
                    .confirm("Use Prettier for formatting?", true)
                    .map_err(ScaffoldError::Prompt)?;
                sheet.use_formatter = Some(yes);
            }
        }
        Ok(())
    }
}

/// Walk the question sequence, asking only what `preset` leaves open
pub fn collect_answers<P: Prompter>(prompter: &P, preset: AnswerSheet) -> Result<ScaffoldAnswers> {
    let mut sheet = preset;
    let mut current = Some(Question::FIRST);

    while let Some(question) = current {
        if question.is_answered(&sheet) {
            debug!(?question, "Answer preset, skipping prompt");
        } else {
            question.ask(prompter, &mut sheet)?;
        }
        current = question.next(&sheet);
    }

    sheet.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::{ScriptedAnswer, ScriptedPrompter};

    #[test]
    fn test_application_skips_title() {
        let prompter = ScriptedPrompter::new([
            ScriptedAnswer::Text("my-app".into()),
            ScriptedAnswer::Select("Application".into()),
            ScriptedAnswer::Select("Vite".into()),
            ScriptedAnswer::Confirm(false),
            ScriptedAnswer::Confirm(true),
        ]);
        let answers = collect_answers(&prompter, AnswerSheet::default()).unwrap();

        assert_eq!(answers.project_name, "my-app");
        assert_eq!(answers.project_type, ProjectType::Application);
        assert_eq!(answers.title, None);
        assert_eq!(answers.bundler, Bundler::Vite);
        assert!(!answers.use_lint);
        assert!(answers.use_formatter);
        assert_eq!(prompter.asked().len(), 5);
        assert!(!prompter.asked().contains(&"Title".to_string()));
    }

    #[test]
    fn test_simulation_asks_title() {
        let prompter = ScriptedPrompter::new([
            ScriptedAnswer::Text("gravity".into()),
            ScriptedAnswer::Select("Simulation".into()),
            ScriptedAnswer::Text("Gravity Lab".into()),
            ScriptedAnswer::Select("Parcel".into()),
            ScriptedAnswer::Confirm(true),
            ScriptedAnswer::Confirm(true),
        ]);
        let answers = collect_answers(&prompter, AnswerSheet::default()).unwrap();

        assert_eq!(answers.title.as_deref(), Some("Gravity Lab"));
        assert_eq!(
            prompter.asked(),
            [
                "Project name",
                "Project type",
                "Title",
                "Bundler",
                "Use ESLint for linting?",
                "Use Prettier for formatting?"
            ]
        );
    }

    #[test]
    fn test_title_defaults_to_project_name() {
        let prompter = ScriptedPrompter::new([
            ScriptedAnswer::Text("orbits".into()),
            ScriptedAnswer::Select("Simulation".into()),
        ]);
        let answers = collect_answers(&prompter, AnswerSheet::default()).unwrap();
        assert_eq!(answers.title.as_deref(), Some("orbits"));
    }

    #[test]
    fn test_preset_answers_are_not_asked() {
        let preset = AnswerSheet {
            project_name: Some("preset".into()),
            project_type: Some(ProjectType::Application),
            bundler: Some(Bundler::Parcel),
            ..AnswerSheet::default()
        };
        let prompter = ScriptedPrompter::defaults();
        let answers = collect_answers(&prompter, preset).unwrap();

        assert_eq!(answers.project_name, "preset");
        assert_eq!(answers.bundler, Bundler::Parcel);
        assert_eq!(
            prompter.asked(),
            ["Use ESLint for linting?", "Use Prettier for formatting?"]
        );
    }

    #[test]
    fn test_title_dropped_for_application() {
        let sheet = AnswerSheet {
            project_name: Some("a".into()),
            project_type: Some(ProjectType::Application),
            title: Some("ignored".into()),
            bundler: Some(Bundler::Vite),
            use_lint: Some(true),
            use_formatter: Some(true),
        };
        assert_eq!(sheet.finish().unwrap().title, None);
    }

    #[test]
    fn test_invalid_project_name_rejected() {
        let prompter = ScriptedPrompter::new([ScriptedAnswer::Text("../escape".into())]);
        let err = collect_answers(&prompter, AnswerSheet::default()).unwrap_err();
        assert!(matches!(err, ScaffoldError::InvalidAnswer { .. }));
    }

    #[test]
    fn test_leading_dash_name_rejected() {
        assert!(validate_project_name("--bare").is_err());
        assert!(validate_project_name(" -x").is_err());
        assert!(validate_project_name("my-app").is_ok());

        let preset = AnswerSheet {
            project_name: Some("--upload-pack=touch pwned".into()),
            ..AnswerSheet::default()
        };
        let err = collect_answers(&ScriptedPrompter::defaults(), preset).unwrap_err();
        assert!(matches!(err, ScaffoldError::InvalidAnswer { .. }));
    }

    #[test]
    fn test_transition_table() {
        let sim = AnswerSheet {
            project_type: Some(ProjectType::Simulation),
            ..AnswerSheet::default()
        };
        let app = AnswerSheet {
            project_type: Some(ProjectType::Application),
            ..AnswerSheet::default()
        };
        assert_eq!(Question::ProjectType.next(&sim), Some(Question::Title));
        assert_eq!(Question::ProjectType.next(&app), Some(Question::Bundler));
        assert_eq!(Question::Formatter.next(&app), None);
    }

    #[test]
    fn test_answer_sheet_from_yaml() {
        let sheet = AnswerSheet::from_yaml(
            "project_name: my-app\nproject_type: scenery\nbundler: vite\nuse_lint: false\n",
        )
        .unwrap();
        assert_eq!(sheet.project_type, Some(ProjectType::Application));
        assert_eq!(sheet.use_lint, Some(false));
        assert_eq!(sheet.use_formatter, None);

        assert!(AnswerSheet::from_yaml("colour: red\n").is_err());
    }

    #[test]
    fn test_sheet_or_prefers_self() {
        let flags = AnswerSheet {
            project_name: Some("from-flags".into()),
            ..AnswerSheet::default()
        };
        let file = AnswerSheet {
            project_name: Some("from-file".into()),
            bundler: Some(Bundler::Vite),
            ..AnswerSheet::default()
        };
        let merged = flags.or(file);
        assert_eq!(merged.project_name.as_deref(), Some("from-flags"));
        assert_eq!(merged.bundler, Some(Bundler::Vite));
    }
}
