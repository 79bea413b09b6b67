mod layout;
pub mod traits;

pub use layout::{ACCESS_POINTS, AccessPoint, StackLayout};
pub use traits::{ComposeRuntime, SourceControl};
