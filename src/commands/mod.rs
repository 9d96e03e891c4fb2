//! Built-in shell commands.

pub mod add_version;

pub use add_version::{AddVersion, AddVersionOutcome};
