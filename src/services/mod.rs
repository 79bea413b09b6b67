mod bootstrap;
mod provision;
mod readiness;

pub use bootstrap::Bootstrapper;
pub use provision::{CADDYFILE_TEMPLATE, ensure_caddyfile, ensure_shared_dir, materialize_env};
pub use readiness::{RetryPolicy, wait_for_services};
