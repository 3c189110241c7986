//! Status signal sink.
//!
//! The engine never formats human-readable text; it names the event and
//! supplies values. The console implementation renders through `tracing`,
//! hosts embedding the engine provide their own sink.

use tracing::{info, warn};

use crate::provider::{ApplyOutcome, UndisguiseOutcome};

/// Named status signals emitted by the orchestrator and applicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    /// Background resolution started for a lookup target.
    Resolving { target: String },
    /// Resolution exhausted every fallback step.
    ResolveFailed { target: String },
    /// Outcome of clearing a stale disguise before applying a new one.
    CleanupResult { outcome: UndisguiseOutcome },
    /// Terminal signal for a name/skin application.
    Done {
        name: String,
        skin_target: String,
        outcome: ApplyOutcome,
        duration_ms: u64,
    },
    /// Entity-form disguise applied.
    EntityApplied {
        kind: String,
        outcome: ApplyOutcome,
        duration_ms: u64,
    },
    /// Entity-form disguise rejected by the provider.
    EntityFailed { kind: String, outcome: ApplyOutcome },
    /// A candidate collided; the next attempt uses a suffixed variant.
    NameRetry { candidate: String },
    /// A suffixed candidate succeeded after at least one collision.
    NameRetrySuccess { candidate: String },
    /// Every candidate collided within the attempt budget.
    NameGiveup { base: String, attempts: u32 },
    /// Explicit reset completed.
    Reset { duration_ms: u64 },
    /// Explicit reset failed with a structural outcome.
    UndisguiseFailed { outcome: UndisguiseOutcome },
    /// Unexpected failure during an update, surfaced best-effort.
    UpdateFailed { error: String },
}

pub trait Messenger: Send + Sync {
    fn emit(&self, signal: Signal);
}

/// Renders signals to the log stream.
pub struct ConsoleMessenger;

impl Messenger for ConsoleMessenger {
    fn emit(&self, signal: Signal) {
        match signal {
            Signal::Resolving { target } => info!(%target, "resolving skin"),
            Signal::ResolveFailed { target } => warn!(%target, "skin resolution failed"),
            Signal::CleanupResult { outcome } => info!(%outcome, "cleared stale disguise"),
            Signal::Done {
                name,
                skin_target,
                outcome,
                duration_ms,
            } => info!(%name, %skin_target, %outcome, duration_ms, "disguise done"),
            Signal::EntityApplied {
                kind,
                outcome,
                duration_ms,
            } => info!(%kind, %outcome, duration_ms, "entity disguise applied"),
            Signal::EntityFailed { kind, outcome } => {
                warn!(%kind, %outcome, "entity disguise failed");
            }
            Signal::NameRetry { candidate } => info!(%candidate, "name collision, retrying"),
            Signal::NameRetrySuccess { candidate } => {
                info!(%candidate, "retry succeeded");
            }
            Signal::NameGiveup { base, attempts } => {
                warn!(%base, attempts, "giving up on name candidates");
            }
            Signal::Reset { duration_ms } => info!(duration_ms, "disguise reset"),
            Signal::UndisguiseFailed { outcome } => warn!(%outcome, "undisguise failed"),
            Signal::UpdateFailed { error } => warn!(%error, "disguise update failed"),
        }
    }
}
