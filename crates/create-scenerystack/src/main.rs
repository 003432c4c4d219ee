//! create-scenerystack - Project scaffolding for SceneryStack

use anyhow::Result;
use clap::Parser;
use scaffolder_core::tui::CreateArgs;
use scaffolder_core::{AnswerSheet, Bundler, ProductConfig, ProjectType, ScaffoldAnswers};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// SceneryStack product configuration
#[derive(Clone)]
pub struct SceneryStackConfig;

impl ProductConfig for SceneryStackConfig {
    fn display_name(&self) -> &'static str {
        "SceneryStack"
    }

    fn default_template_url(&self) -> &'static str {
        "https://github.com/scenerystack"
    }

    fn template_url_env(&self) -> &'static str {
        "SCENERYSTACK_TEMPLATE_URL"
    }

    fn next_steps(&self, _dir: &Path, answers: &ScaffoldAnswers) -> Vec<String> {
        vec![
            format!("cd {}", answers.project_name),
            "npm install".to_string(),
            answers.bundler.dev_command().to_string(),
        ]
    }
}

#[derive(Parser, Debug)]
#[command(name = "create-scenerystack")]
#[command(about = "CLI for scaffolding SceneryStack applications and simulations")]
#[command(version)]
pub struct Args {
    /// Project name, also used as the directory to create
    pub name: Option<String>,

    /// Project type (application or simulation)
    #[arg(short = 't', long = "type")]
    pub project_type: Option<ProjectType>,

    /// Simulation title (simulations only)
    #[arg(long)]
    pub title: Option<String>,

    /// Bundler (vite or parcel)
    #[arg(short, long)]
    pub bundler: Option<Bundler>,

    /// Leave out ESLint
    #[arg(long = "no-lint")]
    pub no_lint: bool,

    /// Leave out Prettier
    #[arg(long = "no-formatter")]
    pub no_formatter: bool,

    /// YAML file with answers (flags take precedence)
    #[arg(long = "answers")]
    pub answers_file: Option<PathBuf>,

    /// Local directory of template checkouts to clone from instead of GitHub (for development use)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,

    /// Skip git installation check
    #[arg(long = "skip-git-check")]
    pub skip_git_check: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl From<Args> for CreateArgs {
    fn from(args: Args) -> Self {
        CreateArgs {
            template_dir: args.template_dir,
            answers: AnswerSheet {
                project_name: args.name,
                project_type: args.project_type,
                title: args.title,
                bundler: args.bundler,
                use_lint: args.no_lint.then_some(false),
                use_formatter: args.no_formatter.then_some(false),
            },
            answers_file: args.answers_file,
            skip_tool_check: args.skip_git_check,
            yes: args.yes,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    init_tracing(args.verbose);
    tracing::debug!(?args, "Parsed arguments");

    let config = SceneryStackConfig;
    let result = scaffolder_core::run(&config, args.into()).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result
}

/// Initialize tracing; `RUST_LOG` wins over `-v`
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
