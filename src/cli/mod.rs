use crate::domain::{ComposeRuntime, SourceControl};
use crate::infra::config::{DEFAULT_STACKUP_TOML_NAME, load_config};
use crate::infra::{DockerComposeAdapter, GitCli};
use crate::services::Bootstrapper;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "stackup",
    about = "Bootstrap the local AI stack: Supabase plus the core services"
)]
pub struct Cli {
    /// Stack root directory (where docker-compose.yml and .env live)
    #[arg(long, env = "STACKUP_DIR", default_value = ".")]
    pub dir: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch sources, provision files, and restart the whole stack (default)
    Up,
    /// Stop and remove everything under the project namespace
    Down,
    /// Check that the required external tools and files are present
    Doctor,
}

pub fn run(cli: Cli) -> Result<()> {
    let root = resolve_root(&cli.dir)?;
    let config = load_config(&root)?;

    let compose: Arc<dyn ComposeRuntime> = Arc::new(DockerComposeAdapter::new());
    let source: Arc<dyn SourceControl> = Arc::new(GitCli::new());

    match cli.command.unwrap_or(Commands::Up) {
        Commands::Up => Bootstrapper::new(compose, source, &config, &root).up(),
        Commands::Down => Bootstrapper::new(compose, source, &config, &root).down(),
        Commands::Doctor => doctor(compose.as_ref(), source.as_ref(), &root),
    }
}

fn resolve_root(dir: &str) -> Result<PathBuf> {
    let expanded = shellexpand::tilde(dir);
    let path = Path::new(expanded.as_ref());

    fs::canonicalize(path).with_context(|| format!("resolving stack root {:?}", path))
}

fn doctor(compose: &dyn ComposeRuntime, source: &dyn SourceControl, root: &Path) -> Result<()> {
    println!("🔍 Checking external tools and stack files...");

    if source.is_available() {
        println!("✅ git available");
    } else {
        println!("⚠️  git not found on PATH");
    }

    if compose.is_available() {
        println!("✅ docker compose available");
    } else {
        println!("⚠️  docker compose not found on PATH");
    }

    for file in [".env", "docker-compose.yml"] {
        if root.join(file).exists() {
            println!("✅ {file} present in {:?}", root);
        } else {
            println!("⚠️  {file} missing in {:?}", root);
        }
    }

    if root.join(DEFAULT_STACKUP_TOML_NAME).exists() {
        println!("✅ {DEFAULT_STACKUP_TOML_NAME} present (overrides defaults)");
    } else {
        println!("ℹ️  no {DEFAULT_STACKUP_TOML_NAME}, using built-in defaults");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bare_invocation_defaults_to_up() {
        let cli = Cli::parse_from(["stackup"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.dir, ".");
    }

    #[test]
    fn dir_flag_is_accepted() {
        let cli = Cli::parse_from(["stackup", "--dir", "/tmp/stack", "down"]);
        assert_eq!(cli.dir, "/tmp/stack");
        assert!(matches!(cli.command, Some(Commands::Down)));
    }

    #[test]
    fn doctor_reports_against_mock_tools() {
        let dir = tempfile::tempdir().unwrap();
        let compose = crate::test_support::MockCompose::new();
        let source = crate::test_support::MockGit::new();

        let result = doctor(&compose, &source, dir.path());
        assert!(result.is_ok());

        assert!(compose.get_commands().contains(&"is_available:compose".to_string()));
        assert!(source.get_commands().contains(&"is_available:git".to_string()));
    }
}
