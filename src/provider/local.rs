//! In-process disguise provider.
//!
//! Enforces the display-name pattern, the length cap, and name-collision
//! semantics against the entity directory and other active disguises. The
//! CLI runs against this implementation; a host embedding the engine swaps
//! in its own [`DisguiseProvider`].

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::directory::EntityDirectory;
use crate::name::NAME_MAX;
use crate::provider::{ApplyOutcome, Disguise, DisguiseProvider, Target, UndisguiseOutcome};

pub struct LocalProvider {
    directory: Arc<dyn EntityDirectory>,
    active: Mutex<HashMap<Uuid, Disguise>>,
}

impl LocalProvider {
    pub fn new(directory: Arc<dyn EntityDirectory>) -> Self {
        Self {
            directory,
            active: Mutex::new(HashMap::new()),
        }
    }

    /// The disguise currently applied to a target, if any.
    pub fn active_disguise(&self, target: &Target) -> Option<Disguise> {
        self.active.lock().get(&target.id).cloned()
    }

    fn name_taken(&self, target: &Target, candidate: &str) -> bool {
        // Collides with a connected entity other than the target itself,
        // or with a name another active disguise already holds.
        if candidate != target.name && self.directory.online(candidate).is_some() {
            return true;
        }
        self.active.lock().iter().any(|(id, disguise)| {
            *id != target.id && disguise.name.as_deref() == Some(candidate)
        })
    }
}

impl DisguiseProvider for LocalProvider {
    fn is_disguised(&self, target: &Target) -> bool {
        self.active.lock().contains_key(&target.id)
    }

    fn undisguise(&self, target: &Target) -> UndisguiseOutcome {
        match self.active.lock().remove(&target.id) {
            Some(_) => UndisguiseOutcome::Success,
            None => UndisguiseOutcome::AlreadyCleared,
        }
    }

    fn disguise(&self, target: &Target, descriptor: &Disguise) -> ApplyOutcome {
        if descriptor.is_empty() {
            return ApplyOutcome::FailOther("empty disguise".to_string());
        }

        if let Some(name) = descriptor.name.as_deref() {
            if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return ApplyOutcome::FailNameInvalid;
            }
            if name.len() > NAME_MAX {
                return ApplyOutcome::FailNameTooLong;
            }
            if self.name_taken(target, name) {
                return ApplyOutcome::FailNameOnline;
            }
        }

        self.active
            .lock()
            .insert(target.id, descriptor.clone());
        ApplyOutcome::Success
    }
}
