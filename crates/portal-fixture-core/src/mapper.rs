//! Field mapper
//!
//! Translates scenario column names into internal field identifiers, one
//! fixed allow-list per fixture kind. A column outside the allow-list is an
//! error; the mapper never drops data silently.
//!
//! Columns that name other entities (`author`, `dataset`) are held back as
//! raw names for the reference resolver, and `moderation` is diverted into a
//! side value. None of the three ever reaches the payload directly.

use crate::error::FixtureError;
use portal_fixture_model::{EntityPayload, FieldId, FieldValue, FixtureKind, Row};

/// How a mapped column is decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    /// Written to the payload as text
    Text(FieldId),
    /// Comma-separated list written to the payload
    List(FieldId),
    /// Account name, resolved later
    Author,
    /// Dataset title, resolved later into a relation
    DatasetTitle,
    /// Moderation state side value
    Moderation,
}

/// Columns of a group membership row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipColumn {
    User,
    Group,
    Role,
    Status,
}

const GROUP_COLUMNS: &[(&str, Column)] = &[
    ("author", Column::Author),
    ("title", Column::Text(FieldId::Title)),
    ("published", Column::Text(FieldId::Published)),
];

const DATASET_COLUMNS: &[(&str, Column)] = &[
    ("title", Column::Text(FieldId::Title)),
    ("author", Column::Author),
    ("description", Column::Text(FieldId::Body)),
    ("language", Column::Text(FieldId::Language)),
    ("tags", Column::List(FieldId::Tags)),
    ("publisher", Column::List(FieldId::Publishers)),
    ("moderation", Column::Moderation),
    ("date", Column::Text(FieldId::Created)),
];

const RESOURCE_COLUMNS: &[(&str, Column)] = &[
    ("title", Column::Text(FieldId::Title)),
    ("description", Column::Text(FieldId::Body)),
    ("author", Column::Author),
    ("language", Column::Text(FieldId::Language)),
    ("format", Column::List(FieldId::Format)),
    ("dataset", Column::DatasetTitle),
    ("date", Column::Text(FieldId::Created)),
    ("moderation", Column::Moderation),
];

// "role on group" is the long-standing column name; "role" is accepted too.
const MEMBERSHIP_COLUMNS: &[(&str, MembershipColumn)] = &[
    ("user", MembershipColumn::User),
    ("group", MembershipColumn::Group),
    ("role", MembershipColumn::Role),
    ("role on group", MembershipColumn::Role),
    ("membership status", MembershipColumn::Status),
];

/// Entity row after column mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedRow {
    /// Fields ready for persistence, references not yet resolved
    pub payload: EntityPayload,
    /// Raw author name
    pub author: Option<String>,
    /// Raw dataset title
    pub dataset: Option<String>,
    /// Explicit moderation state
    pub moderation: Option<String>,
}

/// Membership row after column mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipRow {
    pub user: Option<String>,
    pub group: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
}

/// Column allow-lists and row decoding
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldMapper;

impl FieldMapper {
    /// Create mapper
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Allow-list for an entity kind
    ///
    /// Pages and memberships have no entity columns.
    #[must_use]
    pub fn entity_columns(kind: FixtureKind) -> &'static [(&'static str, Column)] {
        match kind {
            FixtureKind::Group => GROUP_COLUMNS,
            FixtureKind::Dataset => DATASET_COLUMNS,
            FixtureKind::Resource => RESOURCE_COLUMNS,
            FixtureKind::Page | FixtureKind::GroupMembership => &[],
        }
    }

    /// Mapping of one external column name for `kind`
    #[must_use]
    pub fn column(kind: FixtureKind, name: &str) -> Option<Column> {
        Self::entity_columns(kind)
            .iter()
            .find(|(external, _)| *external == name)
            .map(|(_, column)| *column)
    }

    /// Decode an entity row
    ///
    /// # Errors
    /// Returns [`FixtureError::UnmappedField`] for the first column not in
    /// the allow-list of `kind`.
    pub fn decode(&self, kind: FixtureKind, row: &Row) -> Result<DecodedRow, FixtureError> {
        let mut decoded = DecodedRow {
            payload: EntityPayload::new(kind),
            author: None,
            dataset: None,
            moderation: None,
        };

        for (name, value) in row {
            let column = Self::column(kind, name).ok_or_else(|| FixtureError::UnmappedField {
                kind,
                column: name.clone(),
            })?;

            match column {
                Column::Text(field) => {
                    decoded.payload.set(field, FieldValue::Text(value.clone()));
                }
                Column::List(field) => {
                    decoded.payload.set(field, FieldValue::List(split_list(value)));
                }
                Column::Author => decoded.author = non_blank(value),
                Column::DatasetTitle => decoded.dataset = non_blank(value),
                Column::Moderation => decoded.moderation = non_blank(value),
            }
        }

        Ok(decoded)
    }

    /// Decode a group membership row
    ///
    /// # Errors
    /// Returns [`FixtureError::UnmappedField`] for an unknown column.
    pub fn decode_membership(&self, row: &Row) -> Result<MembershipRow, FixtureError> {
        let mut decoded = MembershipRow::default();

        for (name, value) in row {
            let column = MEMBERSHIP_COLUMNS
                .iter()
                .find(|(external, _)| *external == name)
                .map(|(_, column)| *column)
                .ok_or_else(|| FixtureError::UnmappedField {
                    kind: FixtureKind::GroupMembership,
                    column: name.clone(),
                })?;

            let slot = match column {
                MembershipColumn::User => &mut decoded.user,
                MembershipColumn::Group => &mut decoded.group,
                MembershipColumn::Role => &mut decoded.role,
                MembershipColumn::Status => &mut decoded.status,
            };
            *slot = Some(value.clone());
        }

        Ok(decoded)
    }
}

// A blank reference cell means the row names nothing.
fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Split a comma-separated cell into trimmed elements
///
/// Blank input yields an empty list.
#[must_use]
pub fn split_list(value: &str) -> Vec<String> {
    if value.trim().is_empty() {
        return Vec::new();
    }
    value.split(',').map(|item| item.trim().to_string()).collect()
}
