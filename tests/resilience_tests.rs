use anyhow::Result;
use stackup::infra::config::StackConfig;
use stackup::services::Bootstrapper;
use stackup::test_support::{MockCompose, MockGit};
use std::fs;
use std::path::Path;
use std::sync::Arc;

fn fast_config() -> StackConfig {
    let mut config = StackConfig::default();
    config.readiness.max_attempts = 2;
    config.readiness.initial_delay_ms = 1;
    config.readiness.max_delay_ms = 2;
    config
}

fn seed_root(root: &Path) {
    fs::write(root.join(".env"), "POSTGRES_PASSWORD=dev\n").unwrap();
    fs::write(root.join("docker-compose.yml"), "services: {}\n").unwrap();
}

#[test]
fn test_missing_env_aborts_before_any_compose_command() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let root = temp_dir.path();
    // Deliberately no .env at the root.
    fs::write(root.join("docker-compose.yml"), "services: {}\n")?;

    let compose = Arc::new(MockCompose::new());
    let git = Arc::new(MockGit::new());
    let bootstrapper = Bootstrapper::new(compose.clone(), git.clone(), &fast_config(), root);

    let err = bootstrapper.up().unwrap_err();
    assert!(err.to_string().contains("no env file found"));

    // Sources were fetched, but orchestration never started.
    assert!(git.get_commands().iter().any(|c| c.starts_with("clone:")));
    assert!(
        compose.get_commands().is_empty(),
        "no compose command may run without the env file"
    );

    Ok(())
}

#[test]
fn test_clone_failure_stops_the_run() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let root = temp_dir.path();
    seed_root(root);

    let compose = Arc::new(MockCompose::new());
    let git = Arc::new(MockGit::new());
    git.set_fail_on("clone");

    let bootstrapper = Bootstrapper::new(compose.clone(), git, &fast_config(), root);

    assert!(bootstrapper.up().is_err());
    assert!(compose.get_commands().is_empty());

    Ok(())
}

#[test]
fn test_pull_failure_stops_the_run() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let root = temp_dir.path();
    seed_root(root);
    fs::create_dir_all(root.join("supabase/docker"))?;

    let compose = Arc::new(MockCompose::new());
    let git = Arc::new(MockGit::new());
    git.set_fail_on("pull");

    let bootstrapper = Bootstrapper::new(compose.clone(), git, &fast_config(), root);

    assert!(bootstrapper.up().is_err());
    assert!(compose.get_commands().is_empty());

    Ok(())
}

#[test]
fn test_teardown_failure_prevents_any_bring_up() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let root = temp_dir.path();
    seed_root(root);

    let compose = Arc::new(MockCompose::new());
    let git = Arc::new(MockGit::new());
    compose.set_fail_on("down");

    let bootstrapper = Bootstrapper::new(compose.clone(), git, &fast_config(), root);

    assert!(bootstrapper.up().is_err());

    let commands = compose.get_commands();
    assert!(
        !commands.iter().any(|c| c.starts_with("up:")),
        "no bring-up after a failed teardown"
    );

    Ok(())
}

#[test]
fn test_dependency_up_failure_skips_core_services() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let root = temp_dir.path();
    seed_root(root);

    let compose = Arc::new(MockCompose::new());
    let git = Arc::new(MockGit::new());
    compose.set_fail_on("up");

    let bootstrapper = Bootstrapper::new(compose.clone(), git, &fast_config(), root);

    assert!(bootstrapper.up().is_err());

    let ups: Vec<_> = compose
        .get_commands()
        .into_iter()
        .filter(|c| c.starts_with("up:"))
        .collect();
    assert_eq!(ups.len(), 1, "only the dependency bring-up was attempted");

    Ok(())
}

#[test]
fn test_readiness_exhaustion_leaves_core_services_down() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let root = temp_dir.path();
    seed_root(root);

    let compose = Arc::new(MockCompose::new());
    let git = Arc::new(MockGit::new());
    // Declared services never reach the running state.
    compose.set_declared(&["db", "kong"]);

    let bootstrapper = Bootstrapper::new(compose.clone(), git, &fast_config(), root);

    let err = bootstrapper.up().unwrap_err();
    assert!(err.to_string().contains("not ready after 2 attempts"));

    let commands = compose.get_commands();
    let ups: Vec<_> = commands.iter().filter(|c| c.starts_with("up:")).collect();
    assert_eq!(ups.len(), 1, "core services must not start");
    assert!(ups[0].contains("supabase"), "the single up targeted the dependency");

    // No rollback: the failed run issues no extra teardown.
    let downs: Vec<_> = commands.iter().filter(|c| c.starts_with("down:")).collect();
    assert_eq!(downs.len(), 1);

    Ok(())
}

#[test]
fn test_late_readiness_still_succeeds() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let root = temp_dir.path();
    seed_root(root);

    let compose = Arc::new(MockCompose::new());
    let git = Arc::new(MockGit::new());
    compose.set_declared(&["db"]);
    compose.set_ready_after(2);

    let bootstrapper = Bootstrapper::new(compose.clone(), git, &fast_config(), root);

    bootstrapper.up()?;

    let ups: Vec<_> = compose
        .get_commands()
        .into_iter()
        .filter(|c| c.starts_with("up:"))
        .collect();
    assert_eq!(ups.len(), 2, "both service groups came up");

    Ok(())
}
