//! Template location and in-place template edits
//!
//! This module provides:
//! - Template source (remote git host or local checkout directory)
//! - Whole-file substitution and line filtering
//! - Recursive removal that tolerates missing paths

pub mod edits;
pub mod source;

pub use edits::{
    remove_lines_containing, remove_lines_in_file, remove_tree, replace_all, replace_in_file,
};
pub use source::TemplateSource;
