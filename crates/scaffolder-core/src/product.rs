//! Product configuration trait for CLI binaries
//!
//! Each binary implements this trait to say where its templates live and
//! what to tell the user once the project exists.

use crate::answers::ScaffoldAnswers;
use std::path::Path;

/// Configuration trait for different CLI products
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Base URL template repositories are cloned from (one repo per template id)
    fn default_template_url(&self) -> &'static str;

    /// Environment variable name for overriding the template base URL
    fn template_url_env(&self) -> &'static str;

    /// Program used to clone templates
    fn git_program(&self) -> &'static str {
        "git"
    }

    /// Generate the "next steps" instructions after project creation
    fn next_steps(&self, dir: &Path, answers: &ScaffoldAnswers) -> Vec<String>;
}
