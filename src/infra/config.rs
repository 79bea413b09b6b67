use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_STACKUP_TOML_NAME: &str = "stackup.toml";

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct StackSection {
    /// Compose project grouping every managed service for lifecycle
    /// operations. One run must use a single value throughout.
    pub project: String,
    /// Compose file for the core services, relative to the stack root.
    pub compose_file: PathBuf,
}

impl Default for StackSection {
    fn default() -> Self {
        Self {
            project: "localai".to_string(),
            compose_file: PathBuf::from("docker-compose.yml"),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct DependencySection {
    pub repo: String,
    pub branch: String,
    /// Subdirectory fetched by the sparse checkout.
    pub sparse_dir: String,
    /// Working-copy directory, relative to the stack root.
    pub dir: PathBuf,
}

impl Default for DependencySection {
    fn default() -> Self {
        Self {
            repo: "https://github.com/supabase/supabase.git".to_string(),
            branch: "master".to_string(),
            sparse_dir: "docker".to_string(),
            dir: PathBuf::from("supabase"),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ReadinessSection {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for ReadinessSection {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            initial_delay_ms: 500,
            max_delay_ms: 5000,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct StackConfig {
    #[serde(default)]
    pub stack: StackSection,
    #[serde(default)]
    pub dependency: DependencySection,
    #[serde(default)]
    pub readiness: ReadinessSection,
}

/// Loads `stackup.toml` from the stack root. A missing file means defaults.
pub fn load_config(root: &Path) -> Result<StackConfig> {
    let path = root.join(DEFAULT_STACKUP_TOML_NAME);

    if !path.exists() {
        return Ok(StackConfig::default());
    }

    let content = fs::read_to_string(&path).with_context(|| format!("reading {:?}", path))?;
    parse_config(&content, &path)
}

fn parse_config(content: &str, path: &Path) -> Result<StackConfig> {
    let config: StackConfig =
        toml::from_str(content).with_context(|| format!("parsing {:?}", path))?;

    validate_project_name(&config.stack.project)?;

    if config.readiness.max_attempts == 0 {
        bail!("readiness.max_attempts must be at least 1 in {:?}", path);
    }

    Ok(config)
}

fn validate_project_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        bail!("stack.project must not be empty");
    }

    let first_char = name.chars().next().unwrap();
    if !first_char.is_alphanumeric() {
        bail!("stack.project '{}' must start with a letter or digit", name);
    }

    for c in name.chars() {
        if !c.is_alphanumeric() && c != '_' && c != '.' && c != '-' {
            bail!("stack.project '{}' contains invalid character '{}'", name, c);
        }
    }

    Ok(())
}
