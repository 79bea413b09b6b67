mod compose_adapter;
pub mod config;
mod git_adapter;

pub use compose_adapter::DockerComposeAdapter;
pub use config::StackConfig;
pub use git_adapter::GitCli;
