use crate::core::Language;
use serde::{Deserialize, Serialize};

/// Right an access rule can grant on a content item
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessRight {
    /// Read item fields
    Read,
    /// Modify item fields and versions
    Write,
    /// Write content in the given language
    LanguageWrite(Language),
}

/// Grant of one right to a user name or a role name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRule {
    pub account: String,
    pub right: AccessRight,
}

impl AccessRule {
    pub fn new(account: impl Into<String>, right: AccessRight) -> Self {
        Self {
            account: account.into(),
            right,
        }
    }
}

/// The user a command runs for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    username: String,
    #[serde(default)]
    roles: Vec<String>,
    #[serde(default)]
    administrator: bool,
}

impl Actor {
    /// Creates a non-administrative actor
    pub fn new(username: impl Into<String>, roles: Vec<String>) -> Self {
        Self {
            username: username.into(),
            roles,
            administrator: false,
        }
    }

    /// Creates an administrator
    pub fn administrator(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            roles: Vec::new(),
            administrator: true,
        }
    }

    /// Returns the username
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Checks if the actor is an administrator
    #[inline]
    pub fn is_administrator(&self) -> bool {
        self.administrator
    }

    /// True when `account` names this user or one of its roles
    pub fn is_member_of(&self, account: &str) -> bool {
        self.username == account || self.roles.iter().any(|role| role == account)
    }

    /// Checks a right against a rule set through the actor's memberships.
    ///
    /// Administrators hold every right.
    pub fn has_right(&self, rules: &[AccessRule], right: &AccessRight) -> bool {
        self.administrator
            || rules
                .iter()
                .any(|rule| &rule.right == right && self.is_member_of(&rule.account))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn en() -> Language {
        "en".parse().unwrap()
    }

    #[test]
    fn test_rights_resolve_through_roles() {
        let actor = Actor::new("alice", vec!["editors".into()]);
        let rules = vec![
            AccessRule::new("editors", AccessRight::Write),
            AccessRule::new("alice", AccessRight::LanguageWrite(en())),
        ];

        assert!(actor.has_right(&rules, &AccessRight::Write));
        assert!(actor.has_right(&rules, &AccessRight::LanguageWrite(en())));
        assert!(!actor.has_right(&rules, &AccessRight::Read));
        assert!(!actor.has_right(
            &rules,
            &AccessRight::LanguageWrite("de".parse().unwrap())
        ));
    }

    #[test]
    fn test_rules_for_other_accounts_do_not_apply() {
        let actor = Actor::new("bob", vec![]);
        let rules = vec![AccessRule::new("editors", AccessRight::Write)];
        assert!(!actor.has_right(&rules, &AccessRight::Write));
    }

    #[test]
    fn test_administrator_holds_every_right() {
        let admin = Actor::administrator("admin");
        assert!(admin.is_administrator());
        assert!(admin.has_right(&[], &AccessRight::Write));
        assert!(admin.has_right(&[], &AccessRight::LanguageWrite(en())));
    }
}
