//! Local entity directory.
//!
//! Stands in for the host process's registry of currently connected and
//! previously seen entities. The resolver consults it as its last fallback
//! step; the bundled provider uses it for name-collision detection.

use std::sync::Arc;

use uuid::Uuid;

use crate::config::RosterEntry;
use crate::provider::Target;

/// Lookup of entities by exact name.
pub trait EntityDirectory: Send + Sync {
    /// A currently connected entity with this exact name.
    fn online(&self, name: &str) -> Option<Target>;

    /// A previously seen (known-offline) entity with this exact name.
    fn known(&self, name: &str) -> Option<Target>;
}

/// Directory backed by the config roster.
pub struct RosterDirectory {
    online: Vec<Target>,
    known: Vec<Target>,
}

impl RosterDirectory {
    pub fn new(online: &[RosterEntry], known: &[RosterEntry]) -> Self {
        Self {
            online: online.iter().map(RosterEntry::to_target).collect(),
            known: known.iter().map(RosterEntry::to_target).collect(),
        }
    }

    pub fn shared(online: &[RosterEntry], known: &[RosterEntry]) -> Arc<Self> {
        Arc::new(Self::new(online, known))
    }

    pub fn online_names(&self) -> impl Iterator<Item = &str> {
        self.online.iter().map(|t| t.name.as_str())
    }
}

impl EntityDirectory for RosterDirectory {
    fn online(&self, name: &str) -> Option<Target> {
        self.online.iter().find(|t| t.name == name).cloned()
    }

    fn known(&self, name: &str) -> Option<Target> {
        self.known.iter().find(|t| t.name == name).cloned()
    }
}

impl RosterEntry {
    pub fn to_target(&self) -> Target {
        Target::new(
            self.id.unwrap_or_else(|| stable_id(&self.name)),
            self.name.clone(),
        )
    }
}

/// Deterministic identifier for roster entries that do not declare one.
fn stable_id(name: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes())
}
