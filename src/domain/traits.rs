use anyhow::Result;
use std::fmt::Debug;
use std::path::{Path, PathBuf};

/// Trait for compose-style orchestration under a shared project namespace.
///
/// Every method takes the project name and the compose files explicitly;
/// adapters must never rely on the process working directory.
pub trait ComposeRuntime: Send + Sync + Debug {
    /// Stop and remove everything under the project. Safe to call when
    /// nothing is running.
    fn down(&self, project: &str, files: &[PathBuf]) -> Result<()>;

    /// Start the services defined in `files`, detached.
    fn up_detached(&self, project: &str, files: &[PathBuf]) -> Result<()>;

    /// Names of all services declared in `files`.
    fn declared_services(&self, project: &str, files: &[PathBuf]) -> Result<Vec<String>>;

    /// Names of the declared services currently running.
    fn running_services(&self, project: &str, files: &[PathBuf]) -> Result<Vec<String>>;

    /// Check if the orchestration tool is available on PATH
    fn is_available(&self) -> bool;
}

/// Trait for fetching the dependency's sources.
pub trait SourceControl: Send + Sync + Debug {
    /// Sparse, blob-filtered clone of `repo` into `dest`, restricted to
    /// `sparse_dir`, checked out at `branch`.
    fn sparse_clone(&self, repo: &str, dest: &Path, sparse_dir: &str, branch: &str) -> Result<()>;

    /// Update an existing working copy in place.
    fn update(&self, dest: &Path) -> Result<()>;

    /// Check if the version-control tool is available on PATH
    fn is_available(&self) -> bool;
}
