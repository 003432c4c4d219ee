//! Charm-style CLI prompts using cliclack

use crate::answers::AnswerSheet;
use crate::error::ScaffoldError;
use crate::exec::ProcessExecutor;
use crate::product::ProductConfig;
use crate::prompt::{Choice, Prompter};
use crate::runtime::check;
use crate::templates::TemplateSource;
use crate::workflow::Scaffolder;
use anyhow::{Context, Result};
use colored::Colorize;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Local directory holding template checkouts instead of the remote host
    pub template_dir: Option<PathBuf>,

    /// Answers given on the command line
    pub answers: AnswerSheet,

    /// YAML file with answers; command-line answers take precedence
    pub answers_file: Option<PathBuf>,

    /// Skip the git availability check
    pub skip_tool_check: bool,

    /// Accept defaults for every unanswered question (non-interactive mode)
    pub yes: bool,
}

/// [`Prompter`] backed by cliclack
pub struct CliclackPrompter {
    assume_defaults: bool,
    spinner: Mutex<Option<cliclack::ProgressBar>>,
}

impl CliclackPrompter {
    pub fn new(assume_defaults: bool) -> Self {
        Self {
            assume_defaults,
            spinner: Mutex::new(None),
        }
    }

    fn spinner(&self) -> std::sync::MutexGuard<'_, Option<cliclack::ProgressBar>> {
        self.spinner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Prompter for CliclackPrompter {
    fn text(&self, message: &str, default: &str) -> io::Result<String> {
        if self.assume_defaults {
            cliclack::log::info(format!("{}: {}", message, default))?;
            return Ok(default.to_string());
        }
        cliclack::input(message)
            .placeholder(default)
            .default_input(default)
            .interact()
    }

    fn select<T: Clone + Eq>(&self, message: &str, choices: &[Choice<T>]) -> io::Result<T> {
        if self.assume_defaults {
            if let Some(first) = choices.first() {
                cliclack::log::info(format!("{}: {}", message, first.name))?;
                return Ok(first.value.clone());
            }
        }
        let mut select = cliclack::select(message);
        for choice in choices {
            select = select.item(choice.value.clone(), &choice.name, &choice.description);
        }
        select.interact()
    }

    fn confirm(&self, message: &str, default: bool) -> io::Result<bool> {
        if self.assume_defaults {
            cliclack::log::info(format!(
                "{} {}",
                message,
                if default { "yes" } else { "no" }
            ))?;
            return Ok(default);
        }
        cliclack::confirm(message).initial_value(default).interact()
    }

    fn begin(&self, message: &str) -> io::Result<()> {
        let spinner = cliclack::spinner();
        spinner.start(message);
        *self.spinner() = Some(spinner);
        Ok(())
    }

    fn end(&self, message: &str, success: bool) -> io::Result<()> {
        match self.spinner().take() {
            Some(spinner) if success => spinner.stop(message),
            Some(spinner) => spinner.error(message),
            None if success => cliclack::log::success(message)?,
            None => cliclack::log::error(message)?,
        }
        Ok(())
    }

    fn finish(&self, next_steps: &[String]) -> io::Result<()> {
        println!();
        println!("  {}", "Next steps".bold());
        println!();

        for (i, step) in next_steps.iter().enumerate() {
            println!("  {}.  {}", i + 1, step.cyan());
        }
        println!();

        cliclack::outro("Happy coding!")
    }
}

/// Run the CLI with interactive prompts
pub async fn run<C: ProductConfig>(config: &C, args: CreateArgs) -> Result<()> {
    cliclack::intro(config.display_name())?;

    let invocation_dir =
        std::env::current_dir().context("Cannot determine the current directory")?;
    let runner = ProcessExecutor;

    // Step 1: Make sure git is there before asking anything
    if args.skip_tool_check {
        cliclack::log::info("Skipping git check")?;
    } else {
        handle_tool_check(config, &runner, &invocation_dir).await?;
    }

    // Step 2: Resolve the template source
    let source = setup_source(config, &args.template_dir)?;

    // Step 3: Merge command-line answers over the answers file
    let preset = load_preset(&args)?;

    // Step 4: Run the pipeline
    let scaffolder = Scaffolder::new(
        config.clone(),
        CliclackPrompter::new(args.yes),
        runner,
        source,
        invocation_dir,
    );

    match scaffolder.run(preset).await {
        Ok(report) => {
            tracing::debug!(files = report.file_count, "Scaffold complete");
            Ok(())
        }
        Err(ScaffoldError::Prompt(e)) if e.kind() == io::ErrorKind::Interrupted => {
            cliclack::outro_cancel("Setup cancelled.")?;
            anyhow::bail!("Setup cancelled.");
        }
        Err(e) => {
            cliclack::log::error(format!("{}", e))?;
            Err(e.into())
        }
    }
}

async fn handle_tool_check<C: ProductConfig>(
    config: &C,
    runner: &ProcessExecutor,
    cwd: &std::path::Path,
) -> Result<()> {
    let spinner = cliclack::spinner();
    spinner.start("Checking for git...");

    match check::require_git(runner, config.git_program(), cwd).await {
        Ok(info) => {
            spinner.stop(format!(
                "{} installed ({})",
                info.name,
                info.version.as_deref().unwrap_or("unknown")
            ));
            Ok(())
        }
        Err(e) => {
            spinner.error("Git not found");
            Err(e)
        }
    }
}

fn setup_source<C: ProductConfig>(
    config: &C,
    template_dir: &Option<PathBuf>,
) -> Result<TemplateSource> {
    let source = match template_dir {
        Some(path) => {
            cliclack::log::info(format!("Using local templates from {}", path.display()))?;
            TemplateSource::local(path.clone())
        }
        None => TemplateSource::from_config(config)?,
    };

    Ok(source)
}

fn load_preset(args: &CreateArgs) -> Result<AnswerSheet> {
    let Some(path) = &args.answers_file else {
        return Ok(args.answers.clone());
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let from_file = AnswerSheet::from_yaml(&content)
        .with_context(|| format!("Failed to parse answers file {}", path.display()))?;
    cliclack::log::info(format!("Using answers from {}", path.display()))?;

    Ok(args.answers.clone().or(from_file))
}
