use crate::core::{Result, ShellError};
use serde::Deserialize;

/// Shell configuration
///
/// Every field has a default, so a partial JSON document is enough.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Content database sessions open against
    pub content_database: String,

    /// Name the add-version command registers under
    pub add_version_command: String,

    /// Client message announcing a new version
    pub version_added_message: String,

    /// Alert shown when the selected item no longer resolves
    pub item_not_found_alert: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellConfig {
    pub fn new() -> Self {
        Self {
            content_database: "master".to_string(),
            add_version_command: "item:addversion".to_string(),
            version_added_message: "item:versionadded".to_string(),
            item_not_found_alert: "Item not found.".to_string(),
        }
    }

    /// Set the content database name
    pub fn content_database(mut self, name: &str) -> Self {
        self.content_database = name.to_string();
        self
    }

    /// Set the add-version command name
    pub fn add_version_command(mut self, name: &str) -> Self {
        self.add_version_command = name.to_string();
        self
    }

    /// Set the version-added message name
    pub fn version_added_message(mut self, name: &str) -> Self {
        self.version_added_message = name.to_string();
        self
    }

    /// Set the not-found alert text
    pub fn item_not_found_alert(mut self, text: &str) -> Self {
        self.item_not_found_alert = text.to_string();
        self
    }

    /// Parse and validate a JSON configuration document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.content_database.trim().is_empty() {
            return Err(ShellError::Config("content_database cannot be empty".into()));
        }

        for (field, value) in [
            ("add_version_command", &self.add_version_command),
            ("version_added_message", &self.version_added_message),
        ] {
            if value.is_empty() || value.contains(char::is_whitespace) || value.contains('(') {
                return Err(ShellError::Config(format!(
                    "{} must be a single token, got '{}'",
                    field, value
                )));
            }
        }

        if self.item_not_found_alert.is_empty() {
            return Err(ShellError::Config("item_not_found_alert cannot be empty".into()));
        }

        Ok(())
    }
}
