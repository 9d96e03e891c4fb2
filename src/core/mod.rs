pub mod error;
pub mod types;

pub use error::{Result, ShellError};
pub use types::{ItemId, ItemReference, Language, TemplateId, VersionNumber, template_ids};
