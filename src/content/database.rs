use crate::core::{ItemId, ItemReference, Language, Result, TemplateId, VersionNumber};
use crate::gate::ItemFacts;
use crate::security::Actor;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One resolved version of an item in one language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub language: Language,
    pub version: VersionNumber,
    pub template_id: TemplateId,
    pub name: String,
    pub path: String,
    /// Content comes from the fallback language; the item has no version of its own yet
    pub is_fallback: bool,
    pub database: String,
}

impl Item {
    pub fn reference(&self) -> ItemReference {
        ItemReference::new(self.id, self.language.clone(), self.version)
    }
}

/// Content store consumed by shell commands
#[async_trait]
pub trait ContentDatabase: Send + Sync {
    /// Database name, e.g. `master`
    fn name(&self) -> &str;

    /// Resolves a reference. Version `0` resolves to the latest version.
    async fn get_item(&self, reference: &ItemReference) -> Result<Option<Item>>;

    /// Access facts of `item` for `actor`
    async fn facts(&self, item: &Item, actor: &Actor) -> Result<ItemFacts>;

    /// Existing version numbers, ascending. Only the item's language unless
    /// `include_all_languages` is set.
    async fn version_numbers(&self, item: &Item, include_all_languages: bool) -> Result<Vec<VersionNumber>>;

    /// Appends the next version in the item's language and returns it
    async fn add_version(&self, item: &Item) -> Result<Item>;
}
