use crate::domain::SourceControl;
use anyhow::{Context, Result, bail};
use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

/// Source fetcher backed by the `git` CLI.
///
/// Every invocation targets the working copy through `-C`; the process
/// working directory is never changed.
#[derive(Debug)]
pub struct GitCli;

impl GitCli {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceControl for GitCli {
    fn sparse_clone(&self, repo: &str, dest: &Path, sparse_dir: &str, branch: &str) -> Result<()> {
        git(
            [
                OsStr::new("clone"),
                OsStr::new("--filter=blob:none"),
                OsStr::new("--no-checkout"),
                OsStr::new(repo),
                dest.as_os_str(),
            ],
            &format!("cloning {repo} into {:?}", dest),
        )?;

        git(
            [
                OsStr::new("-C"),
                dest.as_os_str(),
                OsStr::new("sparse-checkout"),
                OsStr::new("init"),
                OsStr::new("--cone"),
            ],
            &format!("initializing sparse checkout in {:?}", dest),
        )?;

        git(
            [
                OsStr::new("-C"),
                dest.as_os_str(),
                OsStr::new("sparse-checkout"),
                OsStr::new("set"),
                OsStr::new(sparse_dir),
            ],
            &format!("restricting checkout of {:?} to {sparse_dir}", dest),
        )?;

        git(
            [
                OsStr::new("-C"),
                dest.as_os_str(),
                OsStr::new("checkout"),
                OsStr::new(branch),
            ],
            &format!("checking out branch {branch} in {:?}", dest),
        )
    }

    fn update(&self, dest: &Path) -> Result<()> {
        git(
            [OsStr::new("-C"), dest.as_os_str(), OsStr::new("pull")],
            &format!("updating working copy {:?}", dest),
        )
    }

    fn is_available(&self) -> bool {
        Command::new("git")
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

fn git<I, S>(args: I, context: &str) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let status = git_status(args, context)?;
    ensure_success(status, context)
}

fn git_status<I, S>(args: I, context: &str) -> Result<ExitStatus>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    Command::new("git")
        .args(args.into_iter().map(|item| item.as_ref().to_os_string()))
        .status()
        .with_context(|| context.to_string())
}

fn ensure_success(status: ExitStatus, context: &str) -> Result<()> {
    if status.success() {
        return Ok(());
    }

    bail!("git returned status {:?} ({context})", status)
}
