//! Runtime detection for the tools scaffolding depends on

pub mod check;

pub use check::{check_git, require_git, RuntimeInfo};
