use crate::domain::ComposeRuntime;
use crate::infra::config::ReadinessSection;
use anyhow::{Result, bail};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Bounded retry schedule for the readiness gate: exponential backoff from
/// `initial_delay`, capped at `max_delay`.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(section: &ReadinessSection) -> Self {
        Self {
            max_attempts: section.max_attempts.max(1),
            initial_delay: Duration::from_millis(section.initial_delay_ms),
            max_delay: Duration::from_millis(section.max_delay_ms),
        }
    }

    fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(10);
        self.initial_delay
            .saturating_mul(1u32 << exponent)
            .min(self.max_delay)
    }
}

/// Polls the runtime until every service declared in `files` is running, or
/// the attempt budget runs out.
pub fn wait_for_services(
    runtime: &dyn ComposeRuntime,
    project: &str,
    files: &[PathBuf],
    policy: &RetryPolicy,
) -> Result<()> {
    let declared = runtime.declared_services(project, files)?;

    if declared.is_empty() {
        warn!("No services declared for project {project}; nothing to wait for");
        return Ok(());
    }

    info!(
        "Waiting for {} service(s) of project {project} to come up...",
        declared.len()
    );

    let mut missing = declared.clone();

    for attempt in 1..=policy.max_attempts {
        match runtime.running_services(project, files) {
            Ok(running) => {
                missing = declared
                    .iter()
                    .filter(|svc| !running.contains(svc))
                    .cloned()
                    .collect();

                if missing.is_empty() {
                    info!("All {} service(s) are running", declared.len());
                    return Ok(());
                }

                debug!(
                    "Attempt {attempt}/{}: still waiting for {}",
                    policy.max_attempts,
                    missing.join(", ")
                );
            }

            Err(e) => {
                warn!("Attempt {attempt}/{}: poll failed: {e}", policy.max_attempts);
            }
        }

        if attempt < policy.max_attempts {
            thread::sleep(policy.delay_for(attempt));
        }
    }

    bail!(
        "services of project {project} not ready after {} attempts (still down: {})",
        policy.max_attempts,
        missing.join(", ")
    )
}
