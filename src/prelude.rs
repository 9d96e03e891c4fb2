//! Everything needed to host the shell and drive its commands.
//!
//! ```ignore
//! use contentshell::prelude::*;
//! ```

pub use crate::commands::{AddVersion, AddVersionOutcome};
pub use crate::content::{ContentDatabase, InMemoryContentDatabase, Item, ItemRecord};
pub use crate::core::{ItemId, ItemReference, Language, Result, ShellError, VersionNumber, template_ids};
pub use crate::gate::CommandState;
pub use crate::security::{AccessRight, Actor};
pub use crate::shell::{
    AuditLog, BufferedClientPage, ClientPage, Command, CommandContext, LogAuditLog, MemoryAuditLog,
    Session, Shell, ShellConfig,
};
