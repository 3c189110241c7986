//! Disguise workflows.
//!
//! Encapsulates cleanup and reset, name-collision retries, and the
//! two-phase fetch/apply orchestration: resolution runs on a worker
//! context, provider mutation only ever on the primary context.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use crate::messenger::{Messenger, Signal};
use crate::name::{build_candidate, sanitize_base_name};
use crate::provider::{ApplyOutcome, Disguise, DisguiseProvider, EntityKind, SkinSource, Target};
use crate::resolver::{Resolve, SkinRecord};
use crate::sched::SchedulerHandle;

/// Attempt budget for name-collision retries.
pub const MAX_ATTEMPTS: u32 = 25;

pub struct DisguiseService {
    provider: Arc<dyn DisguiseProvider>,
    resolver: Arc<dyn Resolve>,
    messenger: Arc<dyn Messenger>,
    scheduler: SchedulerHandle,
}

impl DisguiseService {
    pub fn new(
        provider: Arc<dyn DisguiseProvider>,
        resolver: Arc<dyn Resolve>,
        messenger: Arc<dyn Messenger>,
        scheduler: SchedulerHandle,
    ) -> Self {
        Self {
            provider,
            resolver,
            messenger,
            scheduler,
        }
    }

    /// Explicit reset. Success and "nothing to clear" both satisfy; any
    /// other outcome is reported with the raw outcome attached.
    pub fn reset(&self, target: &Target) {
        let start = Instant::now();
        let outcome = self.provider.undisguise(target);
        if outcome.is_cleared() {
            self.messenger.emit(Signal::Reset {
                duration_ms: elapsed_ms(start),
            });
        } else {
            self.messenger.emit(Signal::UndisguiseFailed { outcome });
        }
    }

    /// Entity-form disguise: single attempt, no retry loop. Collision
    /// retries only make sense for display names.
    pub fn apply_entity(&self, target: &Target, kind: &EntityKind) {
        self.pre_cleanup(target);

        let start = Instant::now();
        let descriptor = Disguise::builder().entity(kind.clone()).build();
        let outcome = self.provider.disguise(target, &descriptor);

        if outcome == ApplyOutcome::Success {
            self.messenger.emit(Signal::EntityApplied {
                kind: kind.to_string(),
                outcome,
                duration_ms: elapsed_ms(start),
            });
        } else {
            self.messenger.emit(Signal::EntityFailed {
                kind: kind.to_string(),
                outcome,
            });
        }
    }

    /// Name/skin application.
    ///
    /// Always clears any stale disguise first. Without `fetch`, applies a
    /// bare rename synchronously on the primary context. With `fetch`,
    /// resolution runs on a worker context and control returns to the
    /// primary context before the provider is touched.
    pub fn apply(
        self: &Arc<Self>,
        target: &Target,
        raw_name: &str,
        fetch_target: Option<&str>,
        fetch: bool,
    ) {
        self.pre_cleanup(target);

        let base = sanitize_base_name(raw_name);

        if !fetch {
            let start = Instant::now();
            let outcome = self.apply_with_retries(target, &base, None);
            self.emit_done(&base, "-", outcome, start);
            return;
        }

        let lookup = fetch_target.unwrap_or(&base).to_string();
        self.messenger.emit(Signal::Resolving {
            target: lookup.clone(),
        });

        let start = Instant::now();
        let service = Arc::clone(self);
        let scheduler = self.scheduler.clone();
        let target = target.clone();
        self.scheduler.run_async(move || {
            let resolved =
                panic::catch_unwind(AssertUnwindSafe(|| service.resolver.resolve(&lookup)));
            match resolved {
                Ok(Some(record)) => {
                    let applier = Arc::clone(&service);
                    scheduler.run_on_primary(move || {
                        let outcome = applier.apply_with_retries(&target, &base, Some(&record));
                        applier.emit_done(&base, &lookup, outcome, start);
                    });
                }
                Ok(None) => {
                    scheduler.run_on_primary(move || {
                        service
                            .messenger
                            .emit(Signal::ResolveFailed { target: lookup });
                    });
                }
                Err(payload) => {
                    let error = panic_message(payload.as_ref());
                    scheduler.run_on_primary(move || {
                        service.messenger.emit(Signal::UpdateFailed { error });
                    });
                }
            }
        });
    }

    /// Clear a stale disguise before applying a new one. The outcome is
    /// reported but never blocks the apply that follows.
    fn pre_cleanup(&self, target: &Target) {
        if self.provider.is_disguised(target) {
            let outcome = self.provider.undisguise(target);
            self.messenger.emit(Signal::CleanupResult { outcome });
        }
    }

    /// Attempt with the base name; on collision, try suffixed variants up
    /// to [`MAX_ATTEMPTS`]. Non-collision failures are structural and end
    /// the loop immediately.
    fn apply_with_retries(
        &self,
        target: &Target,
        base: &str,
        skin: Option<&SkinRecord>,
    ) -> ApplyOutcome {
        let mut last = ApplyOutcome::FailOther("no attempt made".to_string());

        for attempt in 1..=MAX_ATTEMPTS {
            let candidate = build_candidate(base, attempt);
            let mut builder = Disguise::builder().name(candidate.clone());

            if let Some(record) = skin {
                builder = match (&record.raw_textures, &record.signature, record.identifier) {
                    (Some(textures), Some(signature), _) => builder.skin(SkinSource::Raw {
                        textures: textures.clone(),
                        signature: signature.clone(),
                    }),
                    (_, _, Some(id)) => builder.skin(SkinSource::ByIdentifier(id)),
                    _ => builder,
                };
            }

            let outcome = self.provider.disguise(target, &builder.build());

            match outcome {
                ApplyOutcome::Success => {
                    if attempt > 1 {
                        self.messenger.emit(Signal::NameRetrySuccess { candidate });
                    }
                    return ApplyOutcome::Success;
                }
                outcome if outcome.is_retryable() => {
                    if attempt < MAX_ATTEMPTS {
                        self.messenger.emit(Signal::NameRetry { candidate });
                        last = outcome;
                    } else {
                        self.messenger.emit(Signal::NameGiveup {
                            base: base.to_string(),
                            attempts: MAX_ATTEMPTS,
                        });
                        return outcome;
                    }
                }
                outcome => return outcome,
            }
        }

        last
    }

    fn emit_done(&self, base: &str, skin_target: &str, outcome: ApplyOutcome, start: Instant) {
        // The provider offers no read-back of the exact name applied after
        // a retry; the requested base name is reported best-effort.
        self.messenger.emit(Signal::Done {
            name: base.to_string(),
            skin_target: skin_target.to_string(),
            outcome,
            duration_ms: elapsed_ms(start),
        });
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown error".to_string()
    }
}
