//! The scaffolding pipeline
//!
//! Stages run strictly in order; the first failure ends the run and whatever
//! is already on disk stays there.

use crate::answers::{collect_answers, AnswerSheet, ScaffoldAnswers};
use crate::error::{FsOperation, Result, ScaffoldError};
use crate::exec::{CommandRunner, ExecutionRequest};
use crate::product::ProductConfig;
use crate::project::{template_id, Feature, Replacement, MANIFEST_FILE, METADATA_PATHS};
use crate::prompt::Prompter;
use crate::templates::{remove_lines_in_file, remove_tree, replace_in_file, TemplateSource};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    CollectAnswers,
    CloneTemplate,
    StripMetadata,
    ApplyCoreSubstitutions,
    ApplyTypeSpecificSubstitutions,
    ApplyFeatureToggles,
    ReportSuccess,
}

impl Stage {
    pub const ORDER: [Stage; 7] = [
        Stage::CollectAnswers,
        Stage::CloneTemplate,
        Stage::StripMetadata,
        Stage::ApplyCoreSubstitutions,
        Stage::ApplyTypeSpecificSubstitutions,
        Stage::ApplyFeatureToggles,
        Stage::ReportSuccess,
    ];
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::CollectAnswers => "collect-answers",
            Stage::CloneTemplate => "clone-template",
            Stage::StripMetadata => "strip-metadata",
            Stage::ApplyCoreSubstitutions => "core-substitutions",
            Stage::ApplyTypeSpecificSubstitutions => "type-substitutions",
            Stage::ApplyFeatureToggles => "feature-toggles",
            Stage::ReportSuccess => "report-success",
        };
        f.write_str(name)
    }
}

/// What a finished run produced
#[derive(Debug, Clone)]
pub struct ScaffoldReport {
    pub answers: ScaffoldAnswers,
    pub project_dir: PathBuf,
    pub file_count: usize,
    pub next_steps: Vec<String>,
}

/// Runs the scaffolding pipeline for one product
pub struct Scaffolder<C, P, R> {
    config: C,
    prompter: P,
    runner: R,
    source: TemplateSource,
    invocation_dir: PathBuf,
}

impl<C, P, R> Scaffolder<C, P, R>
where
    C: ProductConfig,
    P: Prompter,
    R: CommandRunner,
{
    pub fn new(
        config: C,
        prompter: P,
        runner: R,
        source: TemplateSource,
        invocation_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            config,
            prompter,
            runner,
            source,
            invocation_dir: invocation_dir.into(),
        }
    }

    pub fn prompter(&self) -> &P {
        &self.prompter
    }

    /// Run every stage, asking only the questions `preset` leaves open
    pub async fn run(&self, preset: AnswerSheet) -> Result<ScaffoldReport> {
        enter(Stage::CollectAnswers);
        let answers = collect_answers(&self.prompter, preset)?;

        enter(Stage::CloneTemplate);
        let project_dir = self.clone_template(&answers).await?;

        enter(Stage::StripMetadata);
        strip_metadata(&project_dir).await?;

        enter(Stage::ApplyCoreSubstitutions);
        apply_substitutions(&project_dir, &answers, Replacement::ProjectName).await?;

        enter(Stage::ApplyTypeSpecificSubstitutions);
        apply_substitutions(&project_dir, &answers, Replacement::Title).await?;

        enter(Stage::ApplyFeatureToggles);
        apply_feature_toggles(&project_dir, &answers).await?;

        enter(Stage::ReportSuccess);
        let file_count = count_files(&project_dir);
        let next_steps = self.config.next_steps(&project_dir, &answers);
        // The project exists at this point; a failing banner must not fail the run
        if let Err(e) = self.prompter.finish(&next_steps) {
            debug!(error = %e, "Could not print completion banner");
        }

        info!(dir = %project_dir.display(), files = file_count, "Project created");
        Ok(ScaffoldReport {
            answers,
            project_dir,
            file_count,
            next_steps,
        })
    }

    async fn clone_template(&self, answers: &ScaffoldAnswers) -> Result<PathBuf> {
        let template = template_id(answers.project_type, answers.bundler);
        let url = self.source.clone_url(&template)?;
        let project_dir = self.invocation_dir.join(&answers.project_name);

        ensure_destination_free(&project_dir).await?;

        let request = ExecutionRequest::new(
            self.config.git_program(),
            [
                "clone".to_string(),
                "--depth=1".to_string(),
                "--".to_string(),
                url.clone(),
                answers.project_name.clone(),
            ],
            &self.invocation_dir,
        );

        info!(%template, %url, "Cloning template");
        self.prompter
            .begin(&format!("Cloning {}...", template))
            .map_err(ScaffoldError::Prompt)?;

        match self.runner.run(request).await {
            Ok(result) => {
                debug!(elapsed_ms = result.elapsed.as_millis() as u64, "Clone finished");
                self.prompter
                    .end(&format!("Cloned {}", template), true)
                    .map_err(ScaffoldError::Prompt)?;
            }
            Err(e) => {
                // Report the clone failure, not a secondary spinner error
                let _ = self
                    .prompter
                    .end(&format!("Failed to clone {}", template), false);
                return Err(e.into());
            }
        }

        if !project_dir.is_dir() {
            return Err(ScaffoldError::MissingProjectDir { path: project_dir });
        }
        Ok(project_dir)
    }
}

fn enter(stage: Stage) {
    debug!(%stage, "Entering stage");
}

/// Refuse to clone over a directory that already has content
async fn ensure_destination_free(dir: &Path) -> Result<()> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) if dir.is_file() => {
            debug!(error = %e, "Destination is a file");
            return Err(ScaffoldError::DestinationNotEmpty {
                path: dir.to_path_buf(),
            });
        }
        Err(e) => return Err(ScaffoldError::fs(FsOperation::Inspect, dir, e)),
    };

    let first = entries
        .next_entry()
        .await
        .map_err(|e| ScaffoldError::fs(FsOperation::Inspect, dir, e))?;
    if first.is_some() {
        return Err(ScaffoldError::DestinationNotEmpty {
            path: dir.to_path_buf(),
        });
    }
    Ok(())
}

/// Remove template metadata (`.git`, README, LICENSE). Safe to repeat.
pub async fn strip_metadata(project_dir: &Path) -> Result<()> {
    for entry in METADATA_PATHS {
        remove_tree(&project_dir.join(entry)).await?;
    }
    Ok(())
}

/// Apply the project type's substitutions whose replacement is `which`
pub async fn apply_substitutions(
    project_dir: &Path,
    answers: &ScaffoldAnswers,
    which: Replacement,
) -> Result<()> {
    let value = match which {
        Replacement::ProjectName => answers.project_name.as_str(),
        Replacement::Title => match answers.title.as_deref() {
            Some(title) => title,
            None => return Ok(()),
        },
    };

    for substitution in answers
        .project_type
        .substitutions()
        .iter()
        .filter(|s| s.replacement == which)
    {
        for file in substitution.files {
            let path = project_dir.join(file);
            let count = replace_in_file(&path, substitution.token, value).await?;
            debug!(file, token = substitution.token, count, "Substituted placeholder");
        }
    }
    Ok(())
}

/// Delete config files and manifest lines of declined features
pub async fn apply_feature_toggles(project_dir: &Path, answers: &ScaffoldAnswers) -> Result<()> {
    for feature in Feature::ALL {
        let enabled = match feature {
            Feature::Lint => answers.use_lint,
            Feature::Formatter => answers.use_formatter,
        };
        if enabled {
            continue;
        }

        for file in feature.files() {
            remove_tree(&project_dir.join(file)).await?;
        }
        let removed =
            remove_lines_in_file(&project_dir.join(MANIFEST_FILE), feature.manifest_marker())
                .await?;
        debug!(?feature, removed, "Dropped manifest lines");
    }
    Ok(())
}

fn count_files(dir: &Path) -> usize {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{Bundler, ProjectType};

    fn sim_answers() -> ScaffoldAnswers {
        ScaffoldAnswers {
            project_name: "orbits".to_string(),
            project_type: ProjectType::Simulation,
            title: Some("Orbit Lab".to_string()),
            bundler: Bundler::Vite,
            use_lint: true,
            use_formatter: true,
        }
    }

    #[tokio::test]
    async fn test_strip_metadata_twice_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".git/objects")).unwrap();
        std::fs::write(dir.path().join(".git/HEAD"), "ref").unwrap();
        std::fs::write(dir.path().join("README.md"), "# t").unwrap();
        std::fs::write(dir.path().join("LICENSE"), "MIT").unwrap();
        std::fs::write(dir.path().join("index.html"), "<html>").unwrap();

        strip_metadata(dir.path()).await.unwrap();
        strip_metadata(dir.path()).await.unwrap();

        assert!(!dir.path().join(".git").exists());
        assert!(!dir.path().join("README.md").exists());
        assert!(!dir.path().join("LICENSE").exists());
        assert!(dir.path().join("index.html").exists());
    }

    #[tokio::test]
    async fn test_simulation_substitutions() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("src")).unwrap();
        std::fs::write(dir.path().join("package.json"), "{\"name\": \"simulation-name\"}").unwrap();
        std::fs::write(dir.path().join("src/init.ts"), "name: 'simulation-name'").unwrap();
        std::fs::write(dir.path().join("src/main.ts"), "title: 'Simulation Title'").unwrap();
        std::fs::write(dir.path().join("index.html"), "<title>Simulation Title</title>").unwrap();

        let answers = sim_answers();
        apply_substitutions(dir.path(), &answers, Replacement::ProjectName)
            .await
            .unwrap();
        // Title placeholders untouched by the core stage
        let html = std::fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert_eq!(html, "<title>Simulation Title</title>");

        apply_substitutions(dir.path(), &answers, Replacement::Title)
            .await
            .unwrap();

        let read = |p: &str| std::fs::read_to_string(dir.path().join(p)).unwrap();
        assert_eq!(read("package.json"), "{\"name\": \"orbits\"}");
        assert_eq!(read("src/init.ts"), "name: 'orbits'");
        assert_eq!(read("src/main.ts"), "title: 'Orbit Lab'");
        assert_eq!(read("index.html"), "<title>Orbit Lab</title>");
    }

    #[tokio::test]
    async fn test_missing_file_is_filesystem_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = apply_substitutions(dir.path(), &sim_answers(), Replacement::ProjectName)
            .await
            .unwrap_err();
        match err {
            ScaffoldError::FileSystem {
                operation, path, ..
            } => {
                assert_eq!(operation, FsOperation::Read);
                assert!(path.ends_with("package.json"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_declined_formatter_drops_files_and_lines() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".prettierrc"), "{}").unwrap();
        std::fs::write(dir.path().join(".prettierignore"), "dist").unwrap();
        std::fs::write(dir.path().join("eslint.config.js"), "export default []").unwrap();
        std::fs::write(
            dir.path().join("package.json"),
            "{\n  \"eslint\": \"9\",\n  \"prettier\": \"3\",\n  \"eslint-config-prettier\": \"9\"\n}\n",
        )
        .unwrap();

        let answers = ScaffoldAnswers {
            use_formatter: false,
            ..sim_answers()
        };
        apply_feature_toggles(dir.path(), &answers).await.unwrap();

        assert!(!dir.path().join(".prettierrc").exists());
        assert!(!dir.path().join(".prettierignore").exists());
        assert!(dir.path().join("eslint.config.js").exists());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("package.json")).unwrap(),
            "{\n  \"eslint\": \"9\",\n}\n"
        );
    }

    #[tokio::test]
    async fn test_destination_checks() {
        let dir = tempfile::tempdir().unwrap();
        ensure_destination_free(&dir.path().join("absent")).await.unwrap();

        std::fs::create_dir(dir.path().join("empty")).unwrap();
        ensure_destination_free(&dir.path().join("empty")).await.unwrap();

        std::fs::create_dir(dir.path().join("full")).unwrap();
        std::fs::write(dir.path().join("full/x"), "").unwrap();
        assert!(matches!(
            ensure_destination_free(&dir.path().join("full")).await,
            Err(ScaffoldError::DestinationNotEmpty { .. })
        ));
    }

    #[test]
    fn test_stage_order_starts_and_ends() {
        assert_eq!(Stage::ORDER[0], Stage::CollectAnswers);
        assert_eq!(Stage::ORDER[6], Stage::ReportSuccess);
        assert_eq!(Stage::CloneTemplate.to_string(), "clone-template");
    }
}
