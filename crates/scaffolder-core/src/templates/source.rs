//! Where template repositories are cloned from

use crate::error::{Result, ScaffoldError};
use crate::product::ProductConfig;
use std::path::PathBuf;
use url::Url;

/// Template source - either a remote git host or a local directory of checkouts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    Remote(Url),
    Local(PathBuf),
}

impl TemplateSource {
    /// Create a remote template source from a product config
    pub fn from_config<C: ProductConfig>(config: &C) -> Result<Self> {
        let url_str = std::env::var(config.template_url_env())
            .unwrap_or_else(|_| config.default_template_url().to_string());
        Self::remote(&url_str)
    }

    pub fn remote(url_str: &str) -> Result<Self> {
        let url = Url::parse(url_str).map_err(|e| {
            ScaffoldError::TemplateLocation(format!("Invalid template URL {}: {}", url_str, e))
        })?;
        Ok(Self::Remote(url))
    }

    /// Create a local template source from a path
    pub fn local(path: PathBuf) -> Self {
        Self::Local(path)
    }

    /// URL handed to `git clone` for `template_id`.
    ///
    /// Local templates go through `file://` so that `--depth` is honored.
    pub fn clone_url(&self, template_id: &str) -> Result<String> {
        match self {
            TemplateSource::Remote(base) => Ok(build_url(base, template_id)?.to_string()),
            TemplateSource::Local(path) => {
                let dir = path.join(template_id);
                let dir = if dir.is_absolute() {
                    dir
                } else {
                    std::env::current_dir()
                        .map_err(|e| {
                            ScaffoldError::TemplateLocation(format!(
                                "Cannot resolve {}: {}",
                                dir.display(),
                                e
                            ))
                        })?
                        .join(dir)
                };
                Url::from_file_path(&dir)
                    .map(|u| u.to_string())
                    .map_err(|_| {
                        ScaffoldError::TemplateLocation(format!(
                            "Not a usable template path: {}",
                            dir.display()
                        ))
                    })
            }
        }
    }
}

/// Build a URL by appending a path segment, preserving query parameters
fn build_url(base: &Url, path_segment: &str) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| {
            ScaffoldError::TemplateLocation(format!("URL cannot have path segments: {}", base))
        })?
        .pop_if_empty()
        .push(path_segment);
    Ok(url)
}
