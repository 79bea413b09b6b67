use crate::domain::StackLayout;
use anyhow::{Context, Result, bail};
use std::fs;
use tracing::{debug, info};

/// Default reverse-proxy configuration. Hostnames come from the environment
/// file; the ports are where the stack's compose definitions publish each
/// service.
pub const CADDYFILE_TEMPLATE: &str = "# Global options
{
\temail {$LETSENCRYPT_EMAIL}
}

# n8n
{$N8N_HOSTNAME} {
\treverse_proxy localhost:5678
}

# Supabase
{$SUPABASE_HOSTNAME} {
\treverse_proxy localhost:3000
}

# Evolution API
{$EVOLUTION_API_HOSTNAME} {
\treverse_proxy localhost:8080
}
";

/// Copies the root env file to where the dependency's compose definition
/// requires it. The contents are opaque to us.
pub fn materialize_env(layout: &StackLayout) -> Result<()> {
    if !layout.env_source.exists() {
        bail!(
            "no env file found at {:?}; create it before bringing the stack up",
            layout.env_source
        );
    }

    info!(
        "Copying {:?} to {:?}...",
        layout.env_source, layout.env_target
    );

    fs::copy(&layout.env_source, &layout.env_target).with_context(|| {
        format!(
            "copying {:?} to {:?}",
            layout.env_source, layout.env_target
        )
    })?;

    Ok(())
}

/// Creates the shared data directory. Idempotent.
pub fn ensure_shared_dir(layout: &StackLayout) -> Result<()> {
    if layout.shared_dir.exists() {
        debug!("Shared directory {:?} already exists", layout.shared_dir);
        return Ok(());
    }

    info!("Creating shared directory at {:?}", layout.shared_dir);
    fs::create_dir_all(&layout.shared_dir)
        .with_context(|| format!("creating {:?}", layout.shared_dir))
}

/// Writes the default Caddyfile only when none exists. An existing file is
/// never touched.
pub fn ensure_caddyfile(layout: &StackLayout) -> Result<()> {
    if layout.caddyfile.exists() {
        info!("Caddyfile already exists at {:?}", layout.caddyfile);
        return Ok(());
    }

    info!("Creating Caddyfile template at {:?}", layout.caddyfile);
    fs::write(&layout.caddyfile, CADDYFILE_TEMPLATE)
        .with_context(|| format!("writing {:?}", layout.caddyfile))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn layout_in(root: &Path) -> StackLayout {
        StackLayout::new(
            root,
            Path::new("supabase"),
            "docker",
            Path::new("docker-compose.yml"),
        )
    }

    #[test]
    fn materialize_env_copies_contents() {
        let dir = tempfile::tempdir().unwrap();
        let layout = layout_in(dir.path());

        fs::write(&layout.env_source, "POSTGRES_PASSWORD=dev\n").unwrap();
        fs::create_dir_all(layout.env_target.parent().unwrap()).unwrap();

        materialize_env(&layout).unwrap();

        let copied = fs::read_to_string(&layout.env_target).unwrap();
        assert_eq!(copied, "POSTGRES_PASSWORD=dev\n");
    }

    #[test]
    fn materialize_env_fails_on_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let layout = layout_in(dir.path());

        let err = materialize_env(&layout).unwrap_err();
        assert!(err.to_string().contains("no env file found"));
    }

    #[test]
    fn shared_dir_creation_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let layout = layout_in(dir.path());

        ensure_shared_dir(&layout).unwrap();
        assert!(layout.shared_dir.is_dir());

        ensure_shared_dir(&layout).unwrap();
        assert!(layout.shared_dir.is_dir());
    }

    #[test]
    fn caddyfile_created_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let layout = layout_in(dir.path());

        ensure_caddyfile(&layout).unwrap();

        let written = fs::read_to_string(&layout.caddyfile).unwrap();
        assert_eq!(written, CADDYFILE_TEMPLATE);
        assert!(written.contains("reverse_proxy localhost:5678"));
        assert!(written.contains("reverse_proxy localhost:3000"));
        assert!(written.contains("reverse_proxy localhost:8080"));
    }

    #[test]
    fn existing_caddyfile_left_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let layout = layout_in(dir.path());

        let custom = "mycustom.example.com {\n\treverse_proxy localhost:9999\n}\n";
        fs::write(&layout.caddyfile, custom).unwrap();

        ensure_caddyfile(&layout).unwrap();

        let after = fs::read_to_string(&layout.caddyfile).unwrap();
        assert_eq!(after, custom);
    }
}
