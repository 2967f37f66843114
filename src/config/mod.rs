//! Configuration document system.
//!
//! Two-tier overlay: compiled-in defaults (lowest) and the user's config
//! file (highest). The merged document is owned by the event loop for the
//! whole run, mutated in place through bindings, and written back on exit
//! with its formatting intact.

mod defaults;
mod document;
mod merge;

pub use defaults::{DEFAULT_CONFIG, default_document};
pub use document::ConfigDocument;
pub use merge::merge;

/// Config key strings, defined once so the compiler catches misspellings
/// and any use of removed keys.
pub mod keys {
    pub const ENABLE_ALPHA: &str = "enableAlpha";
    pub const ALPHA: &str = "alpha";
    pub const BETA: &str = "beta";
    pub const GAMMA: &str = "gamma";
    pub const EXAMPLE_STRING: &str = "exampleString";
    pub const MAIN_WINDOW_WIDTH: &str = "mainWindowWidth";
    pub const MAIN_WINDOW_HEIGHT: &str = "mainWindowHeight";
}
