pub mod cli;
pub mod domain;
pub mod infra;
pub mod services;

// Make test_support available for integration tests
// In a real production crate, we might use a feature flag "test-utils"
pub mod test_support;

pub use domain::{AccessPoint, ComposeRuntime, SourceControl, StackLayout};
pub use infra::{DockerComposeAdapter, GitCli, StackConfig};
pub use services::{Bootstrapper, RetryPolicy};
