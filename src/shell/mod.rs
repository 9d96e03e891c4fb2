pub mod args;
pub mod audit;
pub mod client;
pub mod command;
pub mod config;
pub mod registry;
pub mod session;

pub use args::ClientPipelineArgs;
pub use audit::{AuditEntry, AuditLog, LogAuditLog, MemoryAuditLog, format_item};
pub use client::{BufferedClientPage, ClientMessage, ClientPage, PendingCall};
pub use command::{Command, CommandContext};
pub use config::ShellConfig;
pub use registry::CommandRegistry;
pub use session::Session;

use crate::commands::AddVersion;
use crate::content::ContentDatabase;
use crate::core::{Result, ShellError};
use crate::gate::CommandState;
use crate::security::Actor;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{Instrument, Level, event, info_span};

/// Hosting shell: command dispatch, content databases and the client round trip
pub struct Shell {
    config: ShellConfig,
    registry: CommandRegistry,
    databases: HashMap<String, Arc<dyn ContentDatabase>>,
}

impl Shell {
    /// Creates a shell with the built-in commands registered
    pub fn new(config: ShellConfig) -> Result<Self> {
        config.validate()?;

        let mut registry = CommandRegistry::new();
        registry.register(Arc::new(AddVersion::from_config(&config)));

        Ok(Self {
            config,
            registry,
            databases: HashMap::new(),
        })
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn register(&mut self, command: Arc<dyn Command>) {
        self.registry.register(command);
    }

    /// Makes a content database available under its own name
    pub fn add_database(&mut self, database: Arc<dyn ContentDatabase>) {
        self.databases.insert(database.name().to_string(), database);
    }

    pub fn database(&self, name: &str) -> Result<Arc<dyn ContentDatabase>> {
        self.databases
            .get(name)
            .cloned()
            .ok_or_else(|| ShellError::Config(format!("content database '{}' is not registered", name)))
    }

    /// The configured content database
    pub fn content_database(&self) -> Result<Arc<dyn ContentDatabase>> {
        self.database(&self.config.content_database)
    }

    pub fn open_session(
        &self,
        actor: Actor,
        client: Arc<dyn ClientPage>,
        audit: Arc<dyn AuditLog>,
    ) -> Result<Session> {
        Ok(Session::new(actor, self.content_database()?, client, audit))
    }

    pub async fn query_state(
        &self,
        command: &str,
        session: &Session,
        context: &CommandContext,
    ) -> Result<CommandState> {
        self.registry.query_state(command, session, context).await
    }

    pub async fn execute(&self, command: &str, session: &Session, context: &CommandContext) -> Result<()> {
        let span = info_span!(
            "shell.execute",
            command = %command,
            user = %session.actor().username(),
            selected = context.items.len()
        );

        self.registry
            .execute(command, session, context)
            .instrument(span)
            .await
    }

    /// Resumes every continuation the page has queued, including ones queued
    /// while resuming. Returns how many ran.
    pub async fn round_trip(&self, session: &Session, page: &BufferedClientPage) -> Result<usize> {
        let mut resumed = 0;
        loop {
            let pending = page.take_pending().await;
            if pending.is_empty() {
                return Ok(resumed);
            }

            for call in pending {
                event!(
                    Level::DEBUG,
                    command = %call.command,
                    method = %call.method,
                    "resuming client continuation"
                );
                self.registry
                    .resume(&call.command, &call.method, session, &call.args)
                    .await?;
                resumed += 1;
            }
        }
    }
}
