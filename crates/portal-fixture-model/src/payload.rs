//! Typed entity payloads
//!
//! A payload is what the fixture layer hands to the persistence collaborator:
//! a closed set of [`FieldId`]s, each carrying a typed [`FieldValue`]. There is
//! no way to set a field by arbitrary name; column names are translated to
//! `FieldId`s by the field mapper before they reach this type.

use crate::types::{AccountId, EntityId, FixtureKind};
use indexmap::IndexMap;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Language code for language-neutral content
pub const LANGUAGE_NONE: &str = "und";

/// Internal field identifiers understood by the persistence layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldId {
    /// Entity title
    Title,
    /// Owning account
    Author,
    /// Long description
    Body,
    /// Content language
    Language,
    /// Free-tagging terms
    Tags,
    /// Publishing groups, by title
    Publishers,
    /// Resource file formats
    Format,
    /// Resource → dataset relation
    DatasetRef,
    /// Creation date, as written by the scenario author
    Created,
    /// Group publication flag
    Published,
}

impl FieldId {
    /// Field name in the persisted entity
    #[must_use]
    pub const fn machine_name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Author => "uid",
            Self::Body => "body",
            Self::Language => "language",
            Self::Tags => "field_tags",
            Self::Publishers => "og_group_ref",
            Self::Format => "field_format",
            Self::DatasetRef => "field_dataset_ref",
            Self::Created => "created",
            Self::Published => "status",
        }
    }
}

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.machine_name())
    }
}

/// Single-element entity reference slot
///
/// Serialises in the nested shape the portal stores references in:
/// `{"und": [{"target_id": 12}]}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityRelation {
    /// Referenced entity
    pub target: EntityId,
}

#[derive(Serialize)]
struct RelationItem {
    target_id: EntityId,
}

impl Serialize for EntityRelation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(
            LANGUAGE_NONE,
            &[RelationItem {
                target_id: self.target,
            }],
        )?;
        map.end()
    }
}

/// Typed field value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Plain text
    Text(String),
    /// Ordered list of strings
    List(Vec<String>),
    /// Resolved account
    Account(AccountId),
    /// Resolved entity reference
    Relation(EntityRelation),
}

/// Creation payload for one entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityPayload {
    kind: FixtureKind,
    fields: IndexMap<FieldId, FieldValue>,
}

impl EntityPayload {
    /// Empty payload for `kind`
    #[inline]
    #[must_use]
    pub fn new(kind: FixtureKind) -> Self {
        Self {
            kind,
            fields: IndexMap::new(),
        }
    }

    /// Kind of entity this payload creates
    #[inline]
    #[must_use]
    pub fn kind(&self) -> FixtureKind {
        self.kind
    }

    /// Set a field, returning the previous value
    pub fn set(&mut self, field: FieldId, value: FieldValue) -> Option<FieldValue> {
        self.fields.insert(field, value)
    }

    /// Set a field only if it has no value yet
    pub fn set_default(&mut self, field: FieldId, value: FieldValue) {
        self.fields.entry(field).or_insert(value);
    }

    /// Remove a field
    pub fn remove(&mut self, field: FieldId) -> Option<FieldValue> {
        self.fields.shift_remove(&field)
    }

    /// Builder-style [`EntityPayload::set`]
    #[must_use]
    pub fn with(mut self, field: FieldId, value: FieldValue) -> Self {
        self.set(field, value);
        self
    }

    /// Raw field value
    #[inline]
    #[must_use]
    pub fn get(&self, field: FieldId) -> Option<&FieldValue> {
        self.fields.get(&field)
    }

    /// Text value of a field, if it holds text
    #[must_use]
    pub fn text(&self, field: FieldId) -> Option<&str> {
        match self.fields.get(&field) {
            Some(FieldValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// List value of a field; empty when absent or not a list
    #[must_use]
    pub fn list(&self, field: FieldId) -> &[String] {
        match self.fields.get(&field) {
            Some(FieldValue::List(items)) => items,
            _ => &[],
        }
    }

    /// Resolved author, if set
    #[must_use]
    pub fn author(&self) -> Option<AccountId> {
        match self.fields.get(&FieldId::Author) {
            Some(FieldValue::Account(id)) => Some(*id),
            _ => None,
        }
    }

    /// Resolved dataset reference, if set
    #[must_use]
    pub fn dataset(&self) -> Option<EntityId> {
        match self.fields.get(&FieldId::DatasetRef) {
            Some(FieldValue::Relation(rel)) => Some(rel.target),
            _ => None,
        }
    }

    /// Fields in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (*k, v))
    }

    /// Number of fields set
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when no field is set
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for EntityPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        if let Some(bundle) = self.kind.bundle() {
            map.serialize_entry("type", bundle)?;
        }
        for (field, value) in &self.fields {
            map.serialize_entry(field.machine_name(), value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn relation_serialises_nested() {
        let payload = EntityPayload::new(FixtureKind::Resource)
            .with(FieldId::Title, FieldValue::Text("Budget File".into()))
            .with(
                FieldId::DatasetRef,
                FieldValue::Relation(EntityRelation {
                    target: EntityId::new(12),
                }),
            );

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "resource",
                "title": "Budget File",
                "field_dataset_ref": {"und": [{"target_id": 12}]}
            })
        );
    }

    #[test]
    fn typed_accessors() {
        let payload = EntityPayload::new(FixtureKind::Dataset)
            .with(FieldId::Author, FieldValue::Account(AccountId::new(3)))
            .with(
                FieldId::Tags,
                FieldValue::List(vec!["health".into(), "open".into()]),
            );

        assert_eq!(payload.author(), Some(AccountId::new(3)));
        assert_eq!(payload.list(FieldId::Tags), ["health", "open"]);
        assert!(payload.list(FieldId::Format).is_empty());
        assert_eq!(payload.text(FieldId::Title), None);
        assert_eq!(payload.dataset(), None);
    }

    #[test]
    fn set_default_keeps_existing_value() {
        let mut payload = EntityPayload::new(FixtureKind::Dataset)
            .with(FieldId::Language, FieldValue::Text("en".into()));
        payload.set_default(FieldId::Language, FieldValue::Text(LANGUAGE_NONE.into()));
        assert_eq!(payload.text(FieldId::Language), Some("en"));
    }

    #[test]
    fn author_serialises_as_uid_number() {
        let payload = EntityPayload::new(FixtureKind::Group)
            .with(FieldId::Author, FieldValue::Account(AccountId::new(5)));
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value, json!({"type": "group", "uid": 5}));
    }
}
