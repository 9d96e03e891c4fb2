// ============================================================================
// contentshell Library
// ============================================================================

pub mod core;
pub mod security;
pub mod gate;
pub mod content;
pub mod shell;
pub mod commands;
pub mod prelude;

// Re-export main types for convenience
pub use core::{ItemId, ItemReference, Language, Result, ShellError, TemplateId, VersionNumber};
pub use gate::{CommandState, ItemFacts};
pub use security::{AccessRight, AccessRule, Actor};
pub use content::{ContentDatabase, InMemoryContentDatabase, Item, ItemRecord};
pub use commands::{AddVersion, AddVersionOutcome};

// Re-export shell API
pub use shell::{
    AuditLog, BufferedClientPage, ClientPage, ClientPipelineArgs, Command, CommandContext,
    MemoryAuditLog, Session, Shell, ShellConfig,
};
