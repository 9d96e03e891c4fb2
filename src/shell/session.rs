use super::{AuditLog, ClientPage};
use crate::content::ContentDatabase;
use crate::security::Actor;
use std::sync::Arc;

/// Per-request context a command runs in
///
/// Nothing in a session survives a client round trip; each phase of a
/// command gets its own.
#[derive(Clone)]
pub struct Session {
    actor: Actor,
    content_database: Arc<dyn ContentDatabase>,
    client: Arc<dyn ClientPage>,
    audit: Arc<dyn AuditLog>,
}

impl Session {
    pub fn new(
        actor: Actor,
        content_database: Arc<dyn ContentDatabase>,
        client: Arc<dyn ClientPage>,
        audit: Arc<dyn AuditLog>,
    ) -> Self {
        Self {
            actor,
            content_database,
            client,
            audit,
        }
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    #[inline]
    pub fn is_administrator(&self) -> bool {
        self.actor.is_administrator()
    }

    pub fn content_database(&self) -> &Arc<dyn ContentDatabase> {
        &self.content_database
    }

    pub fn client(&self) -> &Arc<dyn ClientPage> {
        &self.client
    }

    pub fn audit(&self) -> &Arc<dyn AuditLog> {
        &self.audit
    }

    /// Same session, pointed at another content database
    pub fn with_content_database(mut self, database: Arc<dyn ContentDatabase>) -> Self {
        self.content_database = database;
        self
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("actor", &self.actor)
            .field("content_database", &self.content_database.name())
            .finish_non_exhaustive()
    }
}
