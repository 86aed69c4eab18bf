//! Navigation plumbing for the session guard.
//!
//! The guard decides *where* to go; the host decides what going there means.
//! A router, a CLI, or a test registers a `Navigator` and receives every
//! redirect the guard issues.

pub mod navigator;
pub mod public_paths;
pub mod target;

pub use navigator::{Navigator, RecordingNavigator};
pub use public_paths::PublicPaths;
pub use target::{NavigationTarget, LOGIN_PATH};

/// Outcome of checking a path against the guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationDecision {
    Allow,
    Redirect(NavigationTarget),
}

impl NavigationDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, NavigationDecision::Allow)
    }
}
