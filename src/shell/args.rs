use crate::core::{ItemReference, Result, ShellError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Flat string parameters carried across a client round trip
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientPipelineArgs {
    parameters: BTreeMap<String, String>,
}

impl ClientPipelineArgs {
    pub const ID: &'static str = "id";
    pub const LANGUAGE: &'static str = "language";
    pub const VERSION: &'static str = "version";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.parameters.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    fn required(&self, key: &str) -> Result<&str> {
        self.get(key)
            .ok_or_else(|| ShellError::InvalidParameter(key.to_string(), "missing".into()))
    }

    /// Parses the `id`/`language`/`version` triple back into a reference
    pub fn item_reference(&self) -> Result<ItemReference> {
        Ok(ItemReference::new(
            self.required(Self::ID)?.parse()?,
            self.required(Self::LANGUAGE)?.parse()?,
            self.required(Self::VERSION)?.parse()?,
        ))
    }
}

impl From<&ItemReference> for ClientPipelineArgs {
    fn from(reference: &ItemReference) -> Self {
        let mut args = Self::new();
        args.insert(Self::ID, reference.id.to_string());
        args.insert(Self::LANGUAGE, reference.language.to_string());
        args.insert(Self::VERSION, reference.version.to_string());
        args
    }
}
