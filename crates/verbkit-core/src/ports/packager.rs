//! Packaging port.

use std::path::PathBuf;

use crate::error::VerbError;

/// Intent to package one or more base commands as runnable programs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageRequest {
    /// Destination directory; the working directory when absent.
    pub output_dir: Option<PathBuf>,
    /// Overwrite existing files without asking.
    pub force: bool,
    /// Base commands to package; the current one when empty.
    pub names: Vec<String>,
}

/// Produces runnable packages.
pub trait Packager {
    /// Returns the paths written.
    fn package(&mut self, request: &PackageRequest) -> Result<Vec<PathBuf>, VerbError>;
}
