use crate::domain::{ComposeRuntime, SourceControl};
use anyhow::{Result, bail};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

fn join_files(files: &[PathBuf]) -> String {
    files
        .iter()
        .map(|f| f.display().to_string())
        .collect::<Vec<_>>()
        .join("+")
}

/// In-memory compose runtime recording every call, with optional fault
/// injection and delayed readiness.
#[derive(Debug)]
pub struct MockCompose {
    commands: RwLock<Vec<String>>,
    fail_on: RwLock<Option<String>>,
    declared: RwLock<Vec<String>>,
    running: RwLock<Vec<String>>,
    /// When set, `running_services` reports everything declared only from
    /// the nth poll onwards.
    ready_after: RwLock<Option<u32>>,
    polls: RwLock<u32>,
}

impl MockCompose {
    pub fn new() -> Self {
        Self {
            commands: RwLock::new(Vec::new()),
            fail_on: RwLock::new(None),
            declared: RwLock::new(Vec::new()),
            running: RwLock::new(Vec::new()),
            ready_after: RwLock::new(None),
            polls: RwLock::new(0),
        }
    }

    pub fn set_fail_on(&self, operation: &str) {
        *self.fail_on.write().unwrap() = Some(operation.to_string());
    }

    pub fn set_declared(&self, services: &[&str]) {
        *self.declared.write().unwrap() = services.iter().map(|s| s.to_string()).collect();
    }

    pub fn set_running(&self, services: &[&str]) {
        *self.running.write().unwrap() = services.iter().map(|s| s.to_string()).collect();
    }

    pub fn set_ready_after(&self, polls: u32) {
        *self.ready_after.write().unwrap() = Some(polls);
    }

    pub fn get_commands(&self) -> Vec<String> {
        self.commands.read().unwrap().clone()
    }

    /// Index of the first recorded command starting with `prefix`.
    pub fn position_of(&self, prefix: &str) -> Option<usize> {
        self.commands
            .read()
            .unwrap()
            .iter()
            .position(|c| c.starts_with(prefix))
    }

    fn record_command(&self, cmd: &str) {
        self.commands.write().unwrap().push(cmd.to_string());
    }

    fn check_fail(&self, operation: &str) -> Result<()> {
        if let Some(ref fail_on) = *self.fail_on.read().unwrap() {
            if fail_on == operation {
                bail!("Mock failure on: {}", operation);
            }
        }
        Ok(())
    }
}

impl Default for MockCompose {
    fn default() -> Self {
        Self::new()
    }
}

impl ComposeRuntime for MockCompose {
    fn down(&self, project: &str, files: &[PathBuf]) -> Result<()> {
        self.record_command(&format!("down:{}:{}", project, join_files(files)));
        self.check_fail("down")?;

        self.running.write().unwrap().clear();
        Ok(())
    }

    fn up_detached(&self, project: &str, files: &[PathBuf]) -> Result<()> {
        self.record_command(&format!("up:{}:{}", project, join_files(files)));
        self.check_fail("up")?;
        Ok(())
    }

    fn declared_services(&self, project: &str, _files: &[PathBuf]) -> Result<Vec<String>> {
        self.record_command(&format!("config:{}", project));
        self.check_fail("config")?;

        Ok(self.declared.read().unwrap().clone())
    }

    fn running_services(&self, project: &str, _files: &[PathBuf]) -> Result<Vec<String>> {
        self.record_command(&format!("ps:{}", project));
        self.check_fail("ps")?;

        let polls = {
            let mut polls = self.polls.write().unwrap();
            *polls += 1;
            *polls
        };

        if let Some(ready_after) = *self.ready_after.read().unwrap() {
            if polls >= ready_after {
                return Ok(self.declared.read().unwrap().clone());
            }
            return Ok(Vec::new());
        }

        Ok(self.running.read().unwrap().clone())
    }

    fn is_available(&self) -> bool {
        self.record_command("is_available:compose");
        true
    }
}

/// In-memory source fetcher. A clone materializes the sparse subdirectory on
/// disk so later provisioning steps have a real target.
#[derive(Debug)]
pub struct MockGit {
    commands: RwLock<Vec<String>>,
    fail_on: RwLock<Option<String>>,
}

impl MockGit {
    pub fn new() -> Self {
        Self {
            commands: RwLock::new(Vec::new()),
            fail_on: RwLock::new(None),
        }
    }

    pub fn set_fail_on(&self, operation: &str) {
        *self.fail_on.write().unwrap() = Some(operation.to_string());
    }

    pub fn get_commands(&self) -> Vec<String> {
        self.commands.read().unwrap().clone()
    }

    fn record_command(&self, cmd: &str) {
        self.commands.write().unwrap().push(cmd.to_string());
    }

    fn check_fail(&self, operation: &str) -> Result<()> {
        if let Some(ref fail_on) = *self.fail_on.read().unwrap() {
            if fail_on == operation {
                bail!("Mock failure on: {}", operation);
            }
        }
        Ok(())
    }
}

impl Default for MockGit {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceControl for MockGit {
    fn sparse_clone(&self, repo: &str, dest: &Path, sparse_dir: &str, branch: &str) -> Result<()> {
        self.record_command(&format!("clone:{}:{}", repo, branch));
        self.check_fail("clone")?;

        fs::create_dir_all(dest.join(sparse_dir))?;
        Ok(())
    }

    fn update(&self, dest: &Path) -> Result<()> {
        self.record_command(&format!("pull:{}", dest.display()));
        self.check_fail("pull")?;
        Ok(())
    }

    fn is_available(&self) -> bool {
        self.record_command("is_available:git");
        true
    }
}
