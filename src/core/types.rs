use super::{Result, ShellError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifier of a content item.
///
/// Displays as an upper-case braced GUID (`{AB86861A-6030-46C5-B394-E8F99E8B87DB}`).
/// Parsing accepts braced or bare GUIDs in any case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId(Uuid);

impl ItemId {
    pub const fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }

    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = Uuid::encode_buffer();
        write!(f, "{{{}}}", self.0.hyphenated().encode_upper(&mut buf))
    }
}

impl FromStr for ItemId {
    type Err = ShellError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let bare = trimmed
            .strip_prefix('{')
            .and_then(|rest| rest.strip_suffix('}'))
            .unwrap_or(trimmed);

        Uuid::parse_str(bare)
            .map(Self)
            .map_err(|e| ShellError::InvalidParameter("id".into(), format!("'{}': {}", s, e)))
    }
}

impl TryFrom<String> for ItemId {
    type Error = ShellError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ItemId> for String {
    fn from(id: ItemId) -> Self {
        id.to_string()
    }
}

/// Template identifiers share the item id space.
pub type TemplateId = ItemId;

/// Structural templates that describe schema rather than content.
pub mod template_ids {
    use super::TemplateId;

    pub const TEMPLATE: TemplateId = TemplateId::from_u128(0xAB86861A_6030_46C5_B394_E8F99E8B87DB);
    pub const TEMPLATE_SECTION: TemplateId =
        TemplateId::from_u128(0xE269FBB5_3750_427A_9149_7AA950B49301);
    pub const TEMPLATE_FIELD: TemplateId =
        TemplateId::from_u128(0x455A3E98_A627_4B40_8035_E683A0331AC7);

    /// Returns true for templates whose items are never versioned through the shell.
    pub fn is_structural(template_id: &TemplateId) -> bool {
        *template_id == TEMPLATE || *template_id == TEMPLATE_SECTION || *template_id == TEMPLATE_FIELD
    }
}

/// Content language name, e.g. `en` or `da-DK`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Language(String);

impl Language {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Language {
    type Err = ShellError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        if name.is_empty() {
            return Err(ShellError::InvalidParameter(
                "language".into(),
                "language name cannot be empty".into(),
            ));
        }

        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(ShellError::InvalidParameter(
                "language".into(),
                format!("'{}' is not a valid language name", name),
            ));
        }

        Ok(Self(name.to_string()))
    }
}

impl TryFrom<String> for Language {
    type Error = ShellError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Language> for String {
    fn from(language: Language) -> Self {
        language.0
    }
}

/// Sequential version number. `0` stands for "latest" when resolving and
/// for "no version" on an item that has none in its language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionNumber(u32);

impl VersionNumber {
    pub const LATEST: VersionNumber = VersionNumber(0);
    pub const FIRST: VersionNumber = VersionNumber(1);

    pub const fn new(number: u32) -> Self {
        Self(number)
    }

    pub const fn number(&self) -> u32 {
        self.0
    }

    pub fn is_latest(&self) -> bool {
        self.0 == 0
    }

    /// The number following this one
    pub fn next(&self) -> Result<Self> {
        self.0
            .checked_add(1)
            .map(Self)
            .ok_or_else(|| ShellError::Storage(format!("version {} has no successor", self.0)))
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for VersionNumber {
    type Err = ShellError;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<u32>()
            .map(Self)
            .map_err(|e| ShellError::InvalidParameter("version".into(), format!("'{}': {}", s, e)))
    }
}

/// Addresses one version of one item in one language.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemReference {
    pub id: ItemId,
    pub language: Language,
    pub version: VersionNumber,
}

impl ItemReference {
    pub fn new(id: ItemId, language: Language, version: VersionNumber) -> Self {
        Self {
            id,
            language,
            version,
        }
    }
}

impl fmt::Display for ItemReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}#{}]", self.id, self.language, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_id_display_is_braced_upper_case() {
        let id: ItemId = "ab86861a-6030-46c5-b394-e8f99e8b87db".parse().unwrap();
        assert_eq!(id.to_string(), "{AB86861A-6030-46C5-B394-E8F99E8B87DB}");
        assert_eq!(id, template_ids::TEMPLATE);
    }

    #[test]
    fn test_item_id_parses_braced_form() {
        let id = ItemId::new_random();
        let parsed: ItemId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_item_id_rejects_garbage() {
        let err = "{not-a-guid}".parse::<ItemId>().unwrap_err();
        assert!(err.to_string().contains("Invalid parameter 'id'"));
    }

    #[test]
    fn test_language_validation() {
        assert_eq!("da-DK".parse::<Language>().unwrap().as_str(), "da-DK");
        assert!("".parse::<Language>().is_err());
        assert!("en us".parse::<Language>().is_err());
    }

    #[test]
    fn test_version_number_parse() {
        assert_eq!("3".parse::<VersionNumber>().unwrap(), VersionNumber::new(3));
        assert!("0".parse::<VersionNumber>().unwrap().is_latest());
        assert!("-1".parse::<VersionNumber>().is_err());
        assert!("two".parse::<VersionNumber>().is_err());
    }

    #[test]
    fn test_version_number_next_stops_at_max() {
        assert_eq!(VersionNumber::new(2).next().unwrap(), VersionNumber::new(3));

        let err = VersionNumber::new(u32::MAX).next().unwrap_err();
        assert!(matches!(err, ShellError::Storage(_)));
    }

    #[test]
    fn test_structural_templates() {
        assert!(template_ids::is_structural(&template_ids::TEMPLATE_SECTION));
        assert!(template_ids::is_structural(&template_ids::TEMPLATE_FIELD));
        assert!(!template_ids::is_structural(&ItemId::new_random()));
    }

    #[test]
    fn test_item_reference_serializes_ids_as_strings() {
        let reference = ItemReference::new(
            template_ids::TEMPLATE,
            "en".parse().unwrap(),
            VersionNumber::new(2),
        );
        let json = serde_json::to_string(&reference).unwrap();
        assert_eq!(
            json,
            r#"{"id":"{AB86861A-6030-46C5-B394-E8F99E8B87DB}","language":"en","version":2}"#
        );
    }
}
