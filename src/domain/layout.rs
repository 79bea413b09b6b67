use std::path::{Path, PathBuf};

/// Every path a run touches, computed once from the stack root.
///
/// All external invocations receive these as explicit absolute paths; the
/// process working directory is never changed.
#[derive(Debug, Clone)]
pub struct StackLayout {
    pub root: PathBuf,
    /// `<root>/.env`, must exist before the stack comes up.
    pub env_source: PathBuf,
    /// Working copy of the dependency repository.
    pub checkout_dir: PathBuf,
    /// Where the dependency's compose definition expects its env file.
    pub env_target: PathBuf,
    pub core_compose: PathBuf,
    pub dependency_compose: PathBuf,
    pub shared_dir: PathBuf,
    pub caddyfile: PathBuf,
}

impl StackLayout {
    pub fn new(
        root: &Path,
        dependency_dir: &Path,
        sparse_dir: &str,
        core_compose_file: &Path,
    ) -> Self {
        let checkout_dir = root.join(dependency_dir);
        let compose_dir = checkout_dir.join(sparse_dir);

        Self {
            root: root.to_path_buf(),
            env_source: root.join(".env"),
            env_target: compose_dir.join(".env"),
            core_compose: root.join(core_compose_file),
            dependency_compose: compose_dir.join("docker-compose.yml"),
            shared_dir: root.join("shared"),
            caddyfile: root.join("Caddyfile"),
            checkout_dir,
        }
    }
}

/// A service endpoint printed in the final summary.
#[derive(Debug, Clone, Copy)]
pub struct AccessPoint {
    pub name: &'static str,
    pub url: &'static str,
}

pub const ACCESS_POINTS: [AccessPoint; 3] = [
    AccessPoint {
        name: "n8n",
        url: "http://localhost:5678",
    },
    AccessPoint {
        name: "Supabase",
        url: "http://localhost:3000",
    },
    AccessPoint {
        name: "Evolution API",
        url: "http://localhost:8080",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_derives_all_paths_from_root() {
        let layout = StackLayout::new(
            Path::new("/stack"),
            Path::new("supabase"),
            "docker",
            Path::new("docker-compose.yml"),
        );

        assert_eq!(layout.env_source, Path::new("/stack/.env"));
        assert_eq!(layout.checkout_dir, Path::new("/stack/supabase"));
        assert_eq!(layout.env_target, Path::new("/stack/supabase/docker/.env"));
        assert_eq!(layout.core_compose, Path::new("/stack/docker-compose.yml"));
        assert_eq!(
            layout.dependency_compose,
            Path::new("/stack/supabase/docker/docker-compose.yml")
        );
        assert_eq!(layout.shared_dir, Path::new("/stack/shared"));
        assert_eq!(layout.caddyfile, Path::new("/stack/Caddyfile"));
    }

    #[test]
    fn layout_honors_custom_dependency_location() {
        let layout = StackLayout::new(
            Path::new("/stack"),
            Path::new("vendor/supabase"),
            "deploy",
            Path::new("compose/core.yml"),
        );

        assert_eq!(layout.checkout_dir, Path::new("/stack/vendor/supabase"));
        assert_eq!(
            layout.env_target,
            Path::new("/stack/vendor/supabase/deploy/.env")
        );
        assert_eq!(layout.core_compose, Path::new("/stack/compose/core.yml"));
    }
}
