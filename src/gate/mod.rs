//! Authorization gate for versioning commands.
//!
//! Everything here is a pure function of the actor's administrator flag and
//! the [`ItemFacts`] resolved for the selected item. The same lock/fallback
//! core backs both the three-way render gate ([`evaluate`]) and the binary
//! re-check performed right before a mutation ([`may_execute`]).

use crate::core::{TemplateId, VersionNumber, template_ids};
use serde::{Deserialize, Serialize};

/// Visibility of a command in the shell UI, most restrictive first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandState {
    Hidden,
    Disabled,
    Enabled,
}

impl CommandState {
    pub fn is_enabled(&self) -> bool {
        matches!(self, CommandState::Enabled)
    }
}

/// Access facts of one item as seen by one actor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFacts {
    pub template_id: TemplateId,
    pub version: VersionNumber,
    pub read_only: bool,
    pub is_fallback: bool,
    pub can_write: bool,
    pub can_write_language: bool,
    pub can_lock: bool,
    pub has_lock: bool,
}

/// Whether the actor may edit the item as far as locking is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockClearance {
    /// Actor can take the lock or already holds it
    Lockable,
    /// No locking rights, but the item is a fallback at version 1
    FallbackBootstrap,
    Blocked,
}

/// Rule that produced a gate decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateRule {
    SelectionNotSingle,
    StructuralTemplate,
    ReadOnly,
    Administrator,
    NoWriteAccess,
    FallbackBootstrap,
    NoLockAccess,
    NoLanguageWriteAccess,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateVerdict {
    pub state: CommandState,
    pub rule: GateRule,
}

impl GateVerdict {
    fn new(state: CommandState, rule: GateRule) -> Self {
        Self { state, rule }
    }
}

/// Creating the first language version from fallback content needs no lock.
pub fn is_fallback_bootstrap(facts: &ItemFacts) -> bool {
    facts.is_fallback && facts.version == VersionNumber::FIRST
}

pub fn lock_clearance(facts: &ItemFacts) -> LockClearance {
    if facts.can_lock || facts.has_lock {
        LockClearance::Lockable
    } else if is_fallback_bootstrap(facts) {
        LockClearance::FallbackBootstrap
    } else {
        LockClearance::Blocked
    }
}

/// Three-way render gate. Rules are checked in order; the first match wins.
///
/// `base` is the shell's default state, returned when no rule objects.
pub fn evaluate(is_administrator: bool, selection: &[ItemFacts], base: CommandState) -> GateVerdict {
    let [facts] = selection else {
        return GateVerdict::new(CommandState::Hidden, GateRule::SelectionNotSingle);
    };

    if template_ids::is_structural(&facts.template_id) {
        return GateVerdict::new(CommandState::Hidden, GateRule::StructuralTemplate);
    }

    if facts.read_only && !facts.is_fallback {
        return GateVerdict::new(CommandState::Disabled, GateRule::ReadOnly);
    }

    if is_administrator {
        return GateVerdict::new(CommandState::Enabled, GateRule::Administrator);
    }

    if !facts.can_write {
        return GateVerdict::new(CommandState::Disabled, GateRule::NoWriteAccess);
    }

    match lock_clearance(facts) {
        LockClearance::Lockable => {}
        LockClearance::FallbackBootstrap => {
            return GateVerdict::new(CommandState::Enabled, GateRule::FallbackBootstrap);
        }
        LockClearance::Blocked => {
            return GateVerdict::new(CommandState::Disabled, GateRule::NoLockAccess);
        }
    }

    if !facts.can_write_language {
        return GateVerdict::new(CommandState::Disabled, GateRule::NoLanguageWriteAccess);
    }

    GateVerdict::new(base, GateRule::Default)
}

pub fn query_state(is_administrator: bool, selection: &[ItemFacts], base: CommandState) -> CommandState {
    evaluate(is_administrator, selection, base).state
}

/// Binary re-check run immediately before creating a version.
///
/// Allowed iff administrator, or writable with lock clearance, or a fallback
/// bootstrap. Selection, template and read-only checks are not repeated here.
pub fn may_execute(is_administrator: bool, facts: &ItemFacts) -> bool {
    let clearance = lock_clearance(facts);
    is_administrator
        || (facts.can_write && clearance == LockClearance::Lockable)
        || clearance == LockClearance::FallbackBootstrap
}
