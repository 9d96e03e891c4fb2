use super::{ContentDatabase, Item};
use crate::core::{ItemId, ItemReference, Language, Result, ShellError, TemplateId, VersionNumber};
use crate::gate::ItemFacts;
use crate::security::{AccessRight, AccessRule, Actor};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tokio::sync::RwLock;
use tracing::{Level, event};

/// Stored state of one item across all its languages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: ItemId,
    pub name: String,
    pub path: String,
    pub template_id: TemplateId,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub lock_owner: Option<String>,
    /// Language whose content is shown where the item has no own version
    #[serde(default)]
    pub fallback_language: Option<Language>,
    #[serde(default)]
    pub access: Vec<AccessRule>,
    #[serde(default)]
    pub versions: BTreeMap<Language, Vec<VersionNumber>>,
}

impl ItemRecord {
    pub fn new(id: ItemId, path: impl Into<String>, template_id: TemplateId) -> Self {
        let path = path.into();
        let name = path.rsplit('/').next().unwrap_or_default().to_string();
        Self {
            id,
            name,
            path,
            template_id,
            read_only: false,
            lock_owner: None,
            fallback_language: None,
            access: Vec::new(),
            versions: BTreeMap::new(),
        }
    }

    /// Gives the item versions `1..=count` in `language`
    pub fn with_versions(mut self, language: Language, count: u32) -> Self {
        self.versions
            .insert(language, (1..=count).map(VersionNumber::new).collect());
        self
    }

    pub fn with_rule(mut self, account: impl Into<String>, right: AccessRight) -> Self {
        self.access.push(AccessRule::new(account, right));
        self
    }

    pub fn with_fallback(mut self, language: Language) -> Self {
        self.fallback_language = Some(language);
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn locked_by(mut self, username: impl Into<String>) -> Self {
        self.lock_owner = Some(username.into());
        self
    }

    fn versions_in(&self, language: &Language) -> &[VersionNumber] {
        self.versions.get(language).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Sorts and deduplicates every language's version list. Version 0 is
    /// reserved for "latest" and cannot be stored.
    fn normalize(&mut self) -> Result<()> {
        for (language, versions) in self.versions.iter_mut() {
            if versions.iter().any(VersionNumber::is_latest) {
                return Err(ShellError::Config(format!(
                    "item {} stores version 0 in language '{}'",
                    self.id, language
                )));
            }
            versions.sort_unstable();
            versions.dedup();
        }
        Ok(())
    }

    fn pick(versions: &[VersionNumber], requested: VersionNumber) -> Option<VersionNumber> {
        if requested.is_latest() {
            versions.iter().max().copied()
        } else {
            versions.iter().copied().find(|v| *v == requested)
        }
    }

    fn resolve(&self, reference: &ItemReference, database: &str) -> Option<Item> {
        let own = self.versions_in(&reference.language);

        let (version, is_fallback) = if !own.is_empty() {
            (Self::pick(own, reference.version)?, false)
        } else {
            let fallback = self
                .fallback_language
                .as_ref()
                .filter(|lang| **lang != reference.language)
                .map(|lang| self.versions_in(lang))
                .unwrap_or(&[]);

            if fallback.is_empty() {
                // No content in any language we can show: an empty version.
                if !reference.version.is_latest() {
                    return None;
                }
                (VersionNumber::LATEST, false)
            } else {
                (Self::pick(fallback, reference.version)?, true)
            }
        };

        Some(Item {
            id: self.id,
            language: reference.language.clone(),
            version,
            template_id: self.template_id,
            name: self.name.clone(),
            path: self.path.clone(),
            is_fallback,
            database: database.to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct Fixture {
    name: String,
    #[serde(default)]
    items: Vec<ItemRecord>,
}

/// Content database kept entirely in memory
///
/// Safe to share between sessions; every operation takes the item table
/// lock for its own duration only.
#[derive(Debug)]
pub struct InMemoryContentDatabase {
    name: String,
    items: RwLock<HashMap<ItemId, ItemRecord>>,
}

impl InMemoryContentDatabase {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: RwLock::new(HashMap::new()),
        }
    }

    /// Loads a database from a JSON document: `{"name": "...", "items": [...]}`
    pub fn from_json_str(json: &str) -> Result<Self> {
        let fixture: Fixture = serde_json::from_str(json)?;
        let mut items = HashMap::with_capacity(fixture.items.len());
        for mut record in fixture.items {
            record.normalize()?;
            items.insert(record.id, record);
        }

        Ok(Self {
            name: fixture.name,
            items: RwLock::new(items),
        })
    }

    /// Inserts or replaces an item
    pub async fn insert(&self, record: ItemRecord) {
        self.items.write().await.insert(record.id, record);
    }

    /// Removes an item, returning whether it existed
    pub async fn remove(&self, id: &ItemId) -> bool {
        self.items.write().await.remove(id).is_some()
    }

    /// Returns a copy of the stored record
    pub async fn record(&self, id: &ItemId) -> Option<ItemRecord> {
        self.items.read().await.get(id).cloned()
    }

    /// Sets or clears the item's lock owner
    pub async fn set_lock(&self, id: &ItemId, owner: Option<&str>) -> Result<()> {
        self.update(id, |record| record.lock_owner = owner.map(str::to_string))
            .await
    }

    /// Replaces the item's access rules
    pub async fn set_access(&self, id: &ItemId, rules: Vec<AccessRule>) -> Result<()> {
        self.update(id, move |record| record.access = rules).await
    }

    pub async fn item_count(&self) -> usize {
        self.items.read().await.len()
    }

    async fn update<F>(&self, id: &ItemId, apply: F) -> Result<()>
    where
        F: FnOnce(&mut ItemRecord),
    {
        let mut items = self.items.write().await;
        let record = items
            .get_mut(id)
            .ok_or_else(|| ShellError::ItemNotFound(id.to_string()))?;
        apply(record);
        Ok(())
    }
}

#[async_trait]
impl ContentDatabase for InMemoryContentDatabase {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_item(&self, reference: &ItemReference) -> Result<Option<Item>> {
        let items = self.items.read().await;
        Ok(items
            .get(&reference.id)
            .and_then(|record| record.resolve(reference, &self.name)))
    }

    async fn facts(&self, item: &Item, actor: &Actor) -> Result<ItemFacts> {
        let items = self.items.read().await;
        let record = items
            .get(&item.id)
            .ok_or_else(|| ShellError::ItemNotFound(item.id.to_string()))?;

        let can_write = actor.has_right(&record.access, &AccessRight::Write);
        let has_lock = record.lock_owner.as_deref() == Some(actor.username());

        Ok(ItemFacts {
            template_id: record.template_id,
            version: item.version,
            read_only: record.read_only,
            is_fallback: item.is_fallback,
            can_write,
            can_write_language: actor
                .has_right(&record.access, &AccessRight::LanguageWrite(item.language.clone())),
            can_lock: can_write && record.lock_owner.is_none(),
            has_lock,
        })
    }

    async fn version_numbers(&self, item: &Item, include_all_languages: bool) -> Result<Vec<VersionNumber>> {
        let items = self.items.read().await;
        let record = items
            .get(&item.id)
            .ok_or_else(|| ShellError::ItemNotFound(item.id.to_string()))?;

        if include_all_languages {
            let all: BTreeSet<VersionNumber> = record.versions.values().flatten().copied().collect();
            Ok(all.into_iter().collect())
        } else {
            Ok(record.versions_in(&item.language).to_vec())
        }
    }

    async fn add_version(&self, item: &Item) -> Result<Item> {
        let mut items = self.items.write().await;
        let record = items
            .get_mut(&item.id)
            .ok_or_else(|| ShellError::ItemNotFound(item.id.to_string()))?;

        let versions = record.versions.entry(item.language.clone()).or_default();
        let next = match versions.iter().max() {
            Some(latest) => latest.next()?,
            None => VersionNumber::FIRST,
        };
        versions.push(next);

        event!(
            Level::DEBUG,
            database = %self.name,
            item = %item.id,
            language = %item.language,
            version = next.number(),
            "version appended"
        );

        Ok(Item {
            id: record.id,
            language: item.language.clone(),
            version: next,
            template_id: record.template_id,
            name: record.name.clone(),
            path: record.path.clone(),
            is_fallback: false,
            database: self.name.clone(),
        })
    }
}
