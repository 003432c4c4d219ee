//! Project kinds, bundlers, and the per-kind edit tables
//!
//! Everything the workflow does differently per project type lives in the
//! tables here; the workflow itself only walks them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of project to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    /// Plain scenery application
    #[serde(alias = "scenery")]
    Application,
    /// Simulation with a title shown in the UI
    Simulation,
}

impl ProjectType {
    pub const ALL: [ProjectType; 2] = [ProjectType::Application, ProjectType::Simulation];

    /// Prefix of the template repository name
    pub fn template_prefix(&self) -> &'static str {
        match self {
            ProjectType::Application => "scenery",
            ProjectType::Simulation => "simulation",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProjectType::Application => "Application",
            ProjectType::Simulation => "Simulation",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ProjectType::Application => "A scenery-based web application",
            ProjectType::Simulation => "An interactive simulation with a title screen",
        }
    }

    /// Whether the title question is asked for this kind
    pub fn needs_title(&self) -> bool {
        matches!(self, ProjectType::Simulation)
    }

    /// Placeholder replacements applied after the clone
    pub fn substitutions(&self) -> &'static [Substitution] {
        match self {
            ProjectType::Application => APPLICATION_SUBSTITUTIONS,
            ProjectType::Simulation => SIMULATION_SUBSTITUTIONS,
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for ProjectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "application" | "app" | "scenery" => Ok(ProjectType::Application),
            "simulation" | "sim" => Ok(ProjectType::Simulation),
            other => Err(format!(
                "unknown project type '{}' (expected application or simulation)",
                other
            )),
        }
    }
}

/// Bundler the template is set up for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bundler {
    Vite,
    Parcel,
}

impl Bundler {
    pub const ALL: [Bundler; 2] = [Bundler::Vite, Bundler::Parcel];

    pub fn id(&self) -> &'static str {
        match self {
            Bundler::Vite => "vite",
            Bundler::Parcel => "parcel",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Bundler::Vite => "Vite",
            Bundler::Parcel => "Parcel",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Bundler::Vite => "Fast dev server with hot module replacement",
            Bundler::Parcel => "Zero-configuration bundler",
        }
    }

    /// Command that starts the dev server in the generated project
    pub fn dev_command(&self) -> &'static str {
        match self {
            Bundler::Vite => "npm run dev",
            Bundler::Parcel => "npm start",
        }
    }
}

impl fmt::Display for Bundler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Bundler {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "vite" => Ok(Bundler::Vite),
            "parcel" => Ok(Bundler::Parcel),
            other => Err(format!(
                "unknown bundler '{}' (expected vite or parcel)",
                other
            )),
        }
    }
}

/// Template repository name, e.g. `scenery-template-vite`
pub fn template_id(project_type: ProjectType, bundler: Bundler) -> String {
    format!("{}-template-{}", project_type.template_prefix(), bundler.id())
}

/// Which answer a placeholder is replaced with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replacement {
    ProjectName,
    Title,
}

/// Literal placeholder replaced in a fixed set of files
#[derive(Debug, Clone, Copy)]
pub struct Substitution {
    pub token: &'static str,
    pub replacement: Replacement,
    /// Paths relative to the project directory
    pub files: &'static [&'static str],
}

const APPLICATION_SUBSTITUTIONS: &[Substitution] = &[
    Substitution {
        token: "application-name",
        replacement: Replacement::ProjectName,
        files: &["index.html", "package.json"],
    },
    Substitution {
        token: "Application Title",
        replacement: Replacement::ProjectName,
        files: &["index.html"],
    },
];

const SIMULATION_SUBSTITUTIONS: &[Substitution] = &[
    Substitution {
        token: "simulation-name",
        replacement: Replacement::ProjectName,
        files: &["package.json", "src/init.ts"],
    },
    Substitution {
        token: "Simulation Title",
        replacement: Replacement::Title,
        files: &["src/main.ts", "index.html"],
    },
];

/// Template metadata removed right after cloning
pub const METADATA_PATHS: &[&str] = &[".git", "README.md", "LICENSE"];

/// Package manifest whose lines are filtered by feature toggles
pub const MANIFEST_FILE: &str = "package.json";

/// Optional tooling that can be declined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Lint,
    Formatter,
}

impl Feature {
    pub const ALL: [Feature; 2] = [Feature::Lint, Feature::Formatter];

    /// Config files deleted when the feature is declined
    pub fn files(&self) -> &'static [&'static str] {
        match self {
            Feature::Lint => &["eslint.config.js"],
            Feature::Formatter => &[".prettierignore", ".prettierrc"],
        }
    }

    /// Manifest lines containing this text are dropped when the feature is declined
    pub fn manifest_marker(&self) -> &'static str {
        match self {
            Feature::Lint => "eslint",
            Feature::Formatter => "prettier",
        }
    }
}
