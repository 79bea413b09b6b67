use crate::domain::{ACCESS_POINTS, ComposeRuntime, SourceControl, StackLayout};
use crate::infra::config::{DependencySection, StackConfig};
use crate::services::provision::{ensure_caddyfile, ensure_shared_dir, materialize_env};
use crate::services::readiness::{RetryPolicy, wait_for_services};
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Runs the fixed bring-up sequence for the stack.
///
/// One project namespace is threaded through every orchestration call so
/// teardown and bring-up always target the same resource set.
pub struct Bootstrapper {
    compose: Arc<dyn ComposeRuntime>,
    source: Arc<dyn SourceControl>,
    layout: StackLayout,
    project: String,
    dependency: DependencySection,
    retry: RetryPolicy,
}

impl Bootstrapper {
    pub fn new(
        compose: Arc<dyn ComposeRuntime>,
        source: Arc<dyn SourceControl>,
        config: &StackConfig,
        root: &Path,
    ) -> Self {
        Self {
            compose,
            source,
            layout: StackLayout::new(
                root,
                &config.dependency.dir,
                &config.dependency.sparse_dir,
                &config.stack.compose_file,
            ),
            project: config.stack.project.clone(),
            dependency: config.dependency.clone(),
            retry: RetryPolicy::from_config(&config.readiness),
        }
    }

    pub fn layout(&self) -> &StackLayout {
        &self.layout
    }

    /// Full bring-up: fetch sources, provision files, restart everything
    /// under the project namespace, dependency services first.
    ///
    /// Fails fast on the first error and leaves whatever already came up
    /// running; there is no rollback.
    pub fn up(&self) -> Result<()> {
        self.acquire_sources()?;
        materialize_env(&self.layout)?;
        ensure_shared_dir(&self.layout)?;
        ensure_caddyfile(&self.layout)?;

        info!(
            "Stopping and removing existing containers of project '{}'...",
            self.project
        );
        self.compose.down(&self.project, &self.all_compose_files())?;

        info!("Starting dependency services...");
        self.compose
            .up_detached(&self.project, &self.dependency_files())?;

        wait_for_services(
            self.compose.as_ref(),
            &self.project,
            &self.dependency_files(),
            &self.retry,
        )?;

        info!("Starting core services...");
        self.compose.up_detached(&self.project, &self.core_files())?;

        self.print_access_points();
        Ok(())
    }

    /// Teardown only. Safe to run when nothing is up.
    pub fn down(&self) -> Result<()> {
        info!(
            "Stopping and removing containers of project '{}'...",
            self.project
        );
        self.compose.down(&self.project, &self.all_compose_files())
    }

    /// Clone-or-pull, keyed on the working copy's existence. Mutually
    /// exclusive paths; a failed clone is left behind for the user to remove.
    fn acquire_sources(&self) -> Result<()> {
        if self.layout.checkout_dir.exists() {
            info!(
                "Working copy {:?} already exists, updating...",
                self.layout.checkout_dir
            );
            return self.source.update(&self.layout.checkout_dir);
        }

        info!("Cloning {}...", self.dependency.repo);
        self.source.sparse_clone(
            &self.dependency.repo,
            &self.layout.checkout_dir,
            &self.dependency.sparse_dir,
            &self.dependency.branch,
        )
    }

    fn all_compose_files(&self) -> Vec<PathBuf> {
        vec![
            self.layout.core_compose.clone(),
            self.layout.dependency_compose.clone(),
        ]
    }

    fn dependency_files(&self) -> Vec<PathBuf> {
        vec![self.layout.dependency_compose.clone()]
    }

    fn core_files(&self) -> Vec<PathBuf> {
        vec![self.layout.core_compose.clone()]
    }

    fn print_access_points(&self) {
        println!("\nServices started successfully!");
        println!("Access points:");
        for point in ACCESS_POINTS {
            println!("- {}: {}", point.name, point.url);
        }
        println!("\nFor HTTPS access, configure your .env file with proper hostnames and restart.");
    }
}
