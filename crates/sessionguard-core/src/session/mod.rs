//! Session guard: the single point that reads and clears session state.
//!
//! A `SessionGuard` owns no state of its own. Token and user live in the
//! injected `SessionStorage`; redirects go to the injected `Navigator`.
//! Register it on an `ApiClient` to get bearer headers and 401 handling,
//! and call `guard_navigation` from the host's router on every page load.

pub mod guard;

pub use guard::SessionGuard;
