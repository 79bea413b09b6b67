use crate::domain::ComposeRuntime;
use anyhow::{Context, Result, bail};
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};

/// Compose runtime backed by the `docker compose` CLI.
///
/// Subprocess stdio is inherited so the tool's own output remains the user's
/// diagnostic stream.
#[derive(Debug)]
pub struct DockerComposeAdapter;

impl DockerComposeAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DockerComposeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ComposeRuntime for DockerComposeAdapter {
    fn down(&self, project: &str, files: &[PathBuf]) -> Result<()> {
        let mut args = compose_args(project, files);
        args.push("down".into());

        docker(args, &format!("stopping project {project}"))
    }

    fn up_detached(&self, project: &str, files: &[PathBuf]) -> Result<()> {
        let mut args = compose_args(project, files);
        args.push("up".into());
        args.push("-d".into());

        docker(args, &format!("starting project {project}"))
    }

    fn declared_services(&self, project: &str, files: &[PathBuf]) -> Result<Vec<String>> {
        let mut args = compose_args(project, files);
        args.push("config".into());
        args.push("--services".into());

        docker_lines(args, &format!("listing services of project {project}"))
    }

    fn running_services(&self, project: &str, files: &[PathBuf]) -> Result<Vec<String>> {
        let mut args = compose_args(project, files);
        args.push("ps".into());
        args.push("--services".into());
        args.push("--status".into());
        args.push("running".into());

        docker_lines(args, &format!("listing running services of project {project}"))
    }

    fn is_available(&self) -> bool {
        Command::new("docker")
            .args(["compose", "version"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

fn compose_args(project: &str, files: &[PathBuf]) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["compose".into(), "-p".into(), project.into()];

    for file in files {
        args.push("-f".into());
        args.push(file.as_os_str().to_os_string());
    }

    args
}

fn docker<I, S>(args: I, context: &str) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let status = docker_status(args, context)?;
    ensure_success(status, context)
}

fn docker_status<I, S>(args: I, context: &str) -> Result<ExitStatus>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    Command::new("docker")
        .args(args.into_iter().map(|item| item.as_ref().to_os_string()))
        .status()
        .with_context(|| context.to_string())
}

fn docker_lines<I, S>(args: I, context: &str) -> Result<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = Command::new("docker")
        .args(args.into_iter().map(|item| item.as_ref().to_os_string()))
        .stdout(Stdio::piped())
        .output()
        .with_context(|| context.to_string())?;

    ensure_success(output.status, context)?;

    Ok(String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

fn ensure_success(status: ExitStatus, context: &str) -> Result<()> {
    if status.success() {
        return Ok(());
    }

    bail!("docker returned status {:?} ({context})", status)
}
