use crate::content::Item;
use crate::security::Actor;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Mutex;

/// Formats an item for audit messages:
/// `master:/sitecore/content/Home, language: en, version: 2, id: {...}`
pub fn format_item(item: &Item) -> String {
    format!(
        "{}:{}, language: {}, version: {}, id: {}",
        item.database, item.path, item.language, item.version, item.id
    )
}

/// Sink for audit records of privileged actions.
///
/// Appending never fails from the caller's point of view.
pub trait AuditLog: Send + Sync {
    fn audit(&self, actor: &Actor, message: &str);
}

/// Writes audit records through the `log` facade under the `audit` target
#[derive(Debug, Default)]
pub struct LogAuditLog;

impl AuditLog for LogAuditLog {
    fn audit(&self, actor: &Actor, message: &str) {
        log::info!(target: "audit", "({}) {}", actor.username(), message);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub username: String,
    pub message: String,
}

/// Keeps audit records in memory, in append order
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    entries: Mutex<Vec<AuditEntry>>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AuditLog for MemoryAuditLog {
    fn audit(&self, actor: &Actor, message: &str) {
        let entry = AuditEntry {
            timestamp: Utc::now(),
            username: actor.username().to_string(),
            message: message.to_string(),
        };

        match self.entries.lock() {
            Ok(mut entries) => entries.push(entry),
            Err(err) => log::warn!("audit entry dropped: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ItemId, VersionNumber};

    fn home() -> Item {
        Item {
            id: ItemId::from_u128(0x110D559F_DEA5_42EA_9C1C_8A5DF7E70EF9),
            language: "en".parse().unwrap(),
            version: VersionNumber::new(2),
            template_id: ItemId::from_u128(0x76036F5E_CBCE_46D1_AF0A_4143F9B557AA),
            name: "Home".into(),
            path: "/sitecore/content/Home".into(),
            is_fallback: false,
            database: "master".into(),
        }
    }

    #[test]
    fn test_format_item() {
        assert_eq!(
            format_item(&home()),
            "master:/sitecore/content/Home, language: en, version: 2, id: {110D559F-DEA5-42EA-9C1C-8A5DF7E70EF9}"
        );
    }

    #[test]
    fn test_memory_log_keeps_order() {
        let log = MemoryAuditLog::new();
        assert!(log.is_empty());

        let actor = Actor::new("alice", vec![]);
        log.audit(&actor, "first");
        log.audit(&actor, "second");

        let entries = log.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, "first");
        assert_eq!(entries[1].username, "alice");
        assert!(entries[0].timestamp <= entries[1].timestamp);
    }
}
