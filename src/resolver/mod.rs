//! Skin resolution over ordered fallback steps.
//!
//! Turns a free-text name or identifier into a [`SkinRecord`] by trying a
//! fixed sequence of sources, first hit wins. Each step is independently
//! skippable: upstream unavailability or malformed payloads degrade to the
//! next step, never to an error.

pub mod lookup;

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::config::ResolverConfig;
use crate::directory::EntityDirectory;
use crate::error::Result;
use crate::name::parse_identifier_flexible;

pub use lookup::LookupClient;

/// Resolved visual-identity payload for a requested name.
///
/// Holds raw textures plus signature, a canonical identifier, or both.
/// A record with neither is treated as "no skin" and never constructed
/// by the resolver.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SkinRecord {
    pub raw_textures: Option<String>,
    pub signature: Option<String>,
    pub identifier: Option<Uuid>,
}

impl SkinRecord {
    pub fn from_identifier(id: Uuid) -> Self {
        Self {
            raw_textures: None,
            signature: None,
            identifier: Some(id),
        }
    }

    pub fn from_textures(textures: String, signature: String, id: Option<Uuid>) -> Self {
        Self {
            raw_textures: Some(textures),
            signature: Some(signature),
            identifier: id,
        }
    }

    /// Signed textures outrank a bare identifier when building a disguise.
    pub fn has_textures(&self) -> bool {
        matches!((&self.raw_textures, &self.signature), (Some(_), Some(_)))
    }
}

/// Seam between the orchestrator and the network-bound resolver.
pub trait Resolve: Send + Sync {
    /// Resolve an input to a skin record, or `None` when every fallback
    /// step comes up empty.
    fn resolve(&self, input: &str) -> Option<SkinRecord>;
}

pub struct SkinResolver {
    lookup: LookupClient,
    directory: Arc<dyn EntityDirectory>,
}

type Step = fn(&SkinResolver, &str) -> Option<SkinRecord>;

/// Fallback order; first hit short-circuits the rest.
const STEPS: &[(&str, Step)] = &[
    ("identifier", SkinResolver::via_identifier),
    ("profile_service", SkinResolver::via_profile_service),
    ("uuid_service", SkinResolver::via_uuid_service),
    ("uuid_fallback_service", SkinResolver::via_uuid_fallback_service),
    ("local_directory", SkinResolver::via_local_directory),
];

impl SkinResolver {
    pub fn new(config: &ResolverConfig, directory: Arc<dyn EntityDirectory>) -> Result<Self> {
        Ok(Self {
            lookup: LookupClient::new(config)?,
            directory,
        })
    }

    /// Session texture lookup for a known identifier; an identifier-only
    /// record when the textures are unavailable.
    fn record_for(&self, id: Uuid) -> SkinRecord {
        match self.lookup.session_textures(id) {
            Some((textures, signature)) => SkinRecord::from_textures(textures, signature, Some(id)),
            None => SkinRecord::from_identifier(id),
        }
    }

    fn via_identifier(&self, input: &str) -> Option<SkinRecord> {
        let id = parse_identifier_flexible(input)?;
        Some(self.record_for(id))
    }

    fn via_profile_service(&self, input: &str) -> Option<SkinRecord> {
        let profile = self.lookup.profile_by_name(input)?;
        Some(SkinRecord::from_textures(
            profile.textures,
            profile.signature,
            profile.identifier,
        ))
    }

    fn via_uuid_service(&self, input: &str) -> Option<SkinRecord> {
        let id = self.lookup.identifier_by_name(input)?;
        Some(self.record_for(id))
    }

    fn via_uuid_fallback_service(&self, input: &str) -> Option<SkinRecord> {
        let id = self.lookup.identifier_by_name_fallback(input)?;
        Some(self.record_for(id))
    }

    fn via_local_directory(&self, input: &str) -> Option<SkinRecord> {
        let entity = self
            .directory
            .online(input)
            .or_else(|| self.directory.known(input))?;
        Some(self.record_for(entity.id))
    }
}

impl Resolve for SkinResolver {
    fn resolve(&self, input: &str) -> Option<SkinRecord> {
        for (label, step) in STEPS {
            if let Some(record) = step(self, input) {
                debug!(step = label, input, "resolved skin record");
                return Some(record);
            }
        }
        debug!(input, "all resolution steps exhausted");
        None
    }
}
