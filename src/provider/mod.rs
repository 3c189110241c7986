//! Disguise provider contract.
//!
//! The provider owns the actual visual/identity substitution of an entity;
//! this crate only drives it. Outcomes are closed enums so the
//! retryable/non-retryable partition is an exhaustive match, never a string
//! comparison.

pub mod local;

use std::fmt;

use uuid::Uuid;

pub use local::LocalProvider;

/// A live entity the provider can disguise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub id: Uuid,
    pub name: String,
}

impl Target {
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Skin reference attached to a disguise descriptor.
///
/// Raw textures plus signature take priority over an identifier-based
/// lookup; the identifier form delegates fetching to the skin authority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkinSource {
    Raw { textures: String, signature: String },
    ByIdentifier(Uuid),
}

/// Non-player entity form, validated against the provider's supported set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityKind(String);

impl EntityKind {
    /// Entity forms the bundled provider accepts.
    pub const SUPPORTED: &'static [&'static str] = &[
        "zombie", "skeleton", "creeper", "spider", "pig", "cow", "sheep", "chicken", "villager",
        "enderman",
    ];

    /// Parse a kind name, case-insensitively, against the supported set.
    pub fn parse(raw: &str) -> Option<Self> {
        let lowered = raw.to_ascii_lowercase();
        Self::SUPPORTED
            .contains(&lowered.as_str())
            .then(|| Self(lowered))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Descriptor for one disguise attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Disguise {
    pub name: Option<String>,
    pub skin: Option<SkinSource>,
    pub entity: Option<EntityKind>,
}

impl Disguise {
    pub fn builder() -> DisguiseBuilder {
        DisguiseBuilder::default()
    }

    /// A descriptor with no name, skin, or entity form changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.skin.is_none() && self.entity.is_none()
    }
}

#[derive(Debug, Default)]
pub struct DisguiseBuilder {
    name: Option<String>,
    skin: Option<SkinSource>,
    entity: Option<EntityKind>,
}

impl DisguiseBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn skin(mut self, skin: SkinSource) -> Self {
        self.skin = Some(skin);
        self
    }

    #[must_use]
    pub fn entity(mut self, kind: EntityKind) -> Self {
        self.entity = Some(kind);
        self
    }

    pub fn build(self) -> Disguise {
        Disguise {
            name: self.name,
            skin: self.skin,
            entity: self.entity,
        }
    }
}

/// Result of one provider apply call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    Success,
    FailNameOnline,
    FailNameInvalid,
    FailNameTooLong,
    FailOther(String),
}

impl ApplyOutcome {
    /// Only name-collision-class failures are worth retrying with a new
    /// candidate; everything else is structural.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::FailNameOnline | Self::FailNameInvalid | Self::FailNameTooLong
        )
    }
}

impl fmt::Display for ApplyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::FailNameOnline => f.write_str("fail_name_online"),
            Self::FailNameInvalid => f.write_str("fail_name_invalid"),
            Self::FailNameTooLong => f.write_str("fail_name_too_long"),
            Self::FailOther(reason) => write!(f, "fail_other({reason})"),
        }
    }
}

/// Result of one provider undisguise call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndisguiseOutcome {
    Success,
    AlreadyCleared,
    FailOther(String),
}

impl UndisguiseOutcome {
    /// Both success and "nothing to clear" leave the target undisguised.
    pub fn is_cleared(&self) -> bool {
        matches!(self, Self::Success | Self::AlreadyCleared)
    }
}

impl fmt::Display for UndisguiseOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::AlreadyCleared => f.write_str("already_cleared"),
            Self::FailOther(reason) => write!(f, "fail_other({reason})"),
        }
    }
}

/// External subsystem that owns disguise rendering and reports per-attempt
/// outcomes. All calls must happen on the primary execution context.
pub trait DisguiseProvider: Send + Sync {
    fn is_disguised(&self, target: &Target) -> bool;

    fn undisguise(&self, target: &Target) -> UndisguiseOutcome;

    fn disguise(&self, target: &Target, descriptor: &Disguise) -> ApplyOutcome;
}
