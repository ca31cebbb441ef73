//! Domain entities produced by fixture construction

use crate::payload::{EntityPayload, FieldId, LANGUAGE_NONE};
use crate::types::{AccountId, EntityId, FixtureKind};
use serde::{Deserialize, Serialize};

/// Portal user account, owned by the account collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account identifier
    pub id: AccountId,
    /// Login name
    pub name: String,
}

/// Entity returned by the persistence collaborator after creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedEntity {
    /// Server-assigned identifier
    pub id: EntityId,
    /// Title as stored
    pub title: String,
    /// Owning account; anonymous when the payload carried no author
    pub author: AccountId,
    /// Submitted fields
    pub payload: EntityPayload,
}

impl CreatedEntity {
    /// Kind of the created entity
    #[inline]
    #[must_use]
    pub fn kind(&self) -> FixtureKind {
        self.payload.kind()
    }
}

/// Navigable page, looked up by title in navigation steps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Title the scenario refers to
    pub title: String,
    /// Site-relative url
    pub url: String,
}

impl Page {
    /// Create a page
    #[must_use]
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

/// Entity with an identifier and a lookup title
pub trait Titled {
    /// Kind recorded in registry lookups and messages
    const KIND: FixtureKind;

    /// Identifier assigned at creation
    fn id(&self) -> EntityId;

    /// Title used for lookups
    fn title(&self) -> &str;
}

/// Organisational group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    pub id: EntityId,
    pub title: String,
    pub author: AccountId,
    pub published: Option<String>,
}

impl Group {
    /// Typed view of a created group
    #[must_use]
    pub fn from_created(created: &CreatedEntity) -> Self {
        Self {
            id: created.id,
            title: created.title.clone(),
            author: created.author,
            published: created.payload.text(FieldId::Published).map(str::to_string),
        }
    }
}

impl Titled for Group {
    const KIND: FixtureKind = FixtureKind::Group;

    fn id(&self) -> EntityId {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }
}

/// Dataset node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dataset {
    pub id: EntityId,
    pub title: String,
    pub author: AccountId,
    pub description: Option<String>,
    pub language: String,
    pub tags: Vec<String>,
    pub publishers: Vec<String>,
    pub moderation_state: String,
    pub created: Option<String>,
}

impl Dataset {
    /// Typed view of a created dataset in `moderation_state`
    #[must_use]
    pub fn from_created(created: &CreatedEntity, moderation_state: impl Into<String>) -> Self {
        let payload = &created.payload;
        Self {
            id: created.id,
            title: created.title.clone(),
            author: created.author,
            description: payload.text(FieldId::Body).map(str::to_string),
            language: payload
                .text(FieldId::Language)
                .unwrap_or(LANGUAGE_NONE)
                .to_string(),
            tags: payload.list(FieldId::Tags).to_vec(),
            publishers: payload.list(FieldId::Publishers).to_vec(),
            moderation_state: moderation_state.into(),
            created: payload.text(FieldId::Created).map(str::to_string),
        }
    }
}

impl Titled for Dataset {
    const KIND: FixtureKind = FixtureKind::Dataset;

    fn id(&self) -> EntityId {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }
}

/// Resource node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resource {
    pub id: EntityId,
    pub title: String,
    pub author: AccountId,
    pub description: Option<String>,
    pub language: String,
    pub format: Vec<String>,
    pub dataset: Option<EntityId>,
    pub moderation_state: String,
    pub created: Option<String>,
}

impl Resource {
    /// Typed view of a created resource in `moderation_state`
    #[must_use]
    pub fn from_created(created: &CreatedEntity, moderation_state: impl Into<String>) -> Self {
        let payload = &created.payload;
        Self {
            id: created.id,
            title: created.title.clone(),
            author: created.author,
            description: payload.text(FieldId::Body).map(str::to_string),
            language: payload
                .text(FieldId::Language)
                .unwrap_or(LANGUAGE_NONE)
                .to_string(),
            format: payload.list(FieldId::Format).to_vec(),
            dataset: payload.dataset(),
            moderation_state: moderation_state.into(),
            created: payload.text(FieldId::Created).map(str::to_string),
        }
    }
}

impl Titled for Resource {
    const KIND: FixtureKind = FixtureKind::Resource;

    fn id(&self) -> EntityId {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }
}

/// Role an account holds within a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupRole {
    NonMember,
    Member,
    AdministratorMember,
}

impl GroupRole {
    /// Every role, in role-id order
    pub const ALL: [Self; 3] = [Self::NonMember, Self::Member, Self::AdministratorMember];

    /// Numeric role id
    #[must_use]
    pub const fn id(self) -> u32 {
        match self {
            Self::NonMember => 1,
            Self::Member => 2,
            Self::AdministratorMember => 3,
        }
    }

    /// Name used in scenario tables
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NonMember => "non-member",
            Self::Member => "member",
            Self::AdministratorMember => "administrator member",
        }
    }

    /// Look a role up by its exact name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.name() == name)
    }
}

/// Membership state of an account within a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MembershipStatus {
    Active,
    Pending,
    Blocked,
}

impl MembershipStatus {
    /// Numeric state code stored by the portal
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Active => 1,
            Self::Pending => 2,
            Self::Blocked => 3,
        }
    }

    /// Look a status up by its exact name (`Active`, `Pending`, `Blocked`)
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Active" => Some(Self::Active),
            "Pending" => Some(Self::Pending),
            "Blocked" => Some(Self::Blocked),
            _ => None,
        }
    }
}

/// Request to add an account to a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MembershipGrant {
    pub group: EntityId,
    pub account: AccountId,
    /// Role to grant; `None` adds the membership without a role grant
    pub role: Option<GroupRole>,
    /// Membership state; `None` leaves it to the portal default
    pub status: Option<MembershipStatus>,
}
