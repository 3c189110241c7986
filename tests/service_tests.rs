//! Applicator retry semantics and orchestrator state transitions,
//! exercised against scripted doubles.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;
use uuid::Uuid;

use veil::messenger::{Messenger, Signal};
use veil::provider::{
    ApplyOutcome, Disguise, DisguiseProvider, SkinSource, Target, UndisguiseOutcome,
};
use veil::resolver::{Resolve, SkinRecord};
use veil::sched::Scheduler;
use veil::service::{DisguiseService, MAX_ATTEMPTS};

/// Provider double that replays a script of outcomes and records every
/// descriptor it is handed.
struct ScriptedProvider {
    script: Mutex<Vec<ApplyOutcome>>,
    fallback: ApplyOutcome,
    attempts: AtomicUsize,
    descriptors: Mutex<Vec<Disguise>>,
    disguised: AtomicBool,
    undisguise_outcome: UndisguiseOutcome,
}

impl ScriptedProvider {
    fn always(outcome: ApplyOutcome) -> Self {
        Self::scripted(vec![], outcome)
    }

    fn scripted(script: Vec<ApplyOutcome>, fallback: ApplyOutcome) -> Self {
        Self {
            script: Mutex::new(script),
            fallback,
            attempts: AtomicUsize::new(0),
            descriptors: Mutex::new(Vec::new()),
            disguised: AtomicBool::new(false),
            undisguise_outcome: UndisguiseOutcome::Success,
        }
    }

    fn initially_disguised(mut self) -> Self {
        self.disguised = AtomicBool::new(true);
        self
    }

    fn with_undisguise_outcome(mut self, outcome: UndisguiseOutcome) -> Self {
        self.undisguise_outcome = outcome;
        self
    }

    fn attempts(&self) -> usize {
        self.attempts.load(Ordering::Acquire)
    }
}

impl DisguiseProvider for ScriptedProvider {
    fn is_disguised(&self, _target: &Target) -> bool {
        self.disguised.load(Ordering::Acquire)
    }

    fn undisguise(&self, _target: &Target) -> UndisguiseOutcome {
        self.disguised.store(false, Ordering::Release);
        self.undisguise_outcome.clone()
    }

    fn disguise(&self, _target: &Target, descriptor: &Disguise) -> ApplyOutcome {
        self.attempts.fetch_add(1, Ordering::AcqRel);
        self.descriptors.lock().push(descriptor.clone());
        let mut script = self.script.lock();
        if script.is_empty() {
            self.fallback.clone()
        } else {
            script.remove(0)
        }
    }
}

#[derive(Default)]
struct RecordingMessenger {
    signals: Mutex<Vec<Signal>>,
}

impl RecordingMessenger {
    fn signals(&self) -> Vec<Signal> {
        self.signals.lock().clone()
    }
}

impl Messenger for RecordingMessenger {
    fn emit(&self, signal: Signal) {
        self.signals.lock().push(signal);
    }
}

struct StubResolver(Option<SkinRecord>);

impl Resolve for StubResolver {
    fn resolve(&self, _input: &str) -> Option<SkinRecord> {
        self.0.clone()
    }
}

struct PanicResolver;

impl Resolve for PanicResolver {
    fn resolve(&self, _input: &str) -> Option<SkinRecord> {
        panic!("lookup service blew up");
    }
}

struct Harness {
    provider: Arc<ScriptedProvider>,
    messenger: Arc<RecordingMessenger>,
    scheduler: Scheduler,
    service: Arc<DisguiseService>,
}

impl Harness {
    fn new(provider: ScriptedProvider, resolver: Arc<dyn Resolve>) -> Self {
        let provider = Arc::new(provider);
        let messenger = Arc::new(RecordingMessenger::default());
        let scheduler = Scheduler::new();
        let service = Arc::new(DisguiseService::new(
            provider.clone(),
            resolver,
            messenger.clone(),
            scheduler.handle(),
        ));
        Self {
            provider,
            messenger,
            scheduler,
            service,
        }
    }

    fn no_resolver(provider: ScriptedProvider) -> Self {
        Self::new(provider, Arc::new(StubResolver(None)))
    }
}

fn target() -> Target {
    Target::new(Uuid::new_v4(), "Steve")
}

fn done_outcome(signals: &[Signal]) -> ApplyOutcome {
    signals
        .iter()
        .find_map(|signal| match signal {
            Signal::Done { outcome, .. } => Some(outcome.clone()),
            _ => None,
        })
        .expect("no Done signal emitted")
}

#[test]
fn test_retry_bound_is_exactly_max_attempts() {
    let h = Harness::no_resolver(ScriptedProvider::always(ApplyOutcome::FailNameOnline));
    h.service.apply(&target(), "Steve", None, false);

    assert_eq!(h.provider.attempts(), MAX_ATTEMPTS as usize);
    let signals = h.messenger.signals();
    assert_eq!(done_outcome(&signals), ApplyOutcome::FailNameOnline);

    let retries = signals
        .iter()
        .filter(|s| matches!(s, Signal::NameRetry { .. }))
        .count();
    assert_eq!(retries, MAX_ATTEMPTS as usize - 1);
    assert!(
        signals
            .iter()
            .any(|s| matches!(s, Signal::NameGiveup { attempts, .. } if *attempts == MAX_ATTEMPTS))
    );
}

#[test]
fn test_success_on_third_attempt_short_circuits() {
    let h = Harness::no_resolver(ScriptedProvider::scripted(
        vec![ApplyOutcome::FailNameOnline, ApplyOutcome::FailNameOnline],
        ApplyOutcome::Success,
    ));
    h.service.apply(&target(), "Steve", None, false);

    assert_eq!(h.provider.attempts(), 3);
    let signals = h.messenger.signals();
    assert_eq!(done_outcome(&signals), ApplyOutcome::Success);
    assert!(
        signals
            .iter()
            .any(|s| matches!(s, Signal::NameRetrySuccess { candidate } if candidate == "Steve_3"))
    );
}

#[test]
fn test_structural_failure_is_not_retried() {
    let h = Harness::no_resolver(ScriptedProvider::always(ApplyOutcome::FailOther(
        "backend down".to_string(),
    )));
    h.service.apply(&target(), "Steve", None, false);

    assert_eq!(h.provider.attempts(), 1);
    let signals = h.messenger.signals();
    assert!(matches!(done_outcome(&signals), ApplyOutcome::FailOther(_)));
    assert!(
        !signals
            .iter()
            .any(|s| matches!(s, Signal::NameRetry { .. }))
    );
}

#[test]
fn test_first_attempt_success_emits_no_retry_signals() {
    let h = Harness::no_resolver(ScriptedProvider::always(ApplyOutcome::Success));
    h.service.apply(&target(), "Steve!!", None, false);

    assert_eq!(h.provider.attempts(), 1);
    let signals = h.messenger.signals();
    assert_eq!(done_outcome(&signals), ApplyOutcome::Success);
    assert!(!signals.iter().any(|s| {
        matches!(
            s,
            Signal::NameRetry { .. } | Signal::NameRetrySuccess { .. } | Signal::NameGiveup { .. }
        )
    }));
    // sanitized base flows into the descriptor
    assert_eq!(
        h.provider.descriptors.lock()[0].name.as_deref(),
        Some("Steve")
    );
}

#[test]
fn test_stale_disguise_is_cleared_before_apply() {
    let h = Harness::no_resolver(
        ScriptedProvider::always(ApplyOutcome::Success).initially_disguised(),
    );
    h.service.apply(&target(), "Steve", None, false);

    let signals = h.messenger.signals();
    assert!(matches!(signals[0], Signal::CleanupResult { .. }));
    assert_eq!(done_outcome(&signals), ApplyOutcome::Success);
}

#[test]
fn test_reset_on_clean_target_is_satisfied() {
    let h = Harness::no_resolver(
        ScriptedProvider::always(ApplyOutcome::Success)
            .with_undisguise_outcome(UndisguiseOutcome::AlreadyCleared),
    );
    h.service.reset(&target());

    let signals = h.messenger.signals();
    assert!(matches!(signals[0], Signal::Reset { .. }));
}

#[test]
fn test_reset_structural_failure_is_reported() {
    let h = Harness::no_resolver(
        ScriptedProvider::always(ApplyOutcome::Success)
            .with_undisguise_outcome(UndisguiseOutcome::FailOther("backend down".to_string())),
    );
    h.service.reset(&target());

    let signals = h.messenger.signals();
    assert!(matches!(signals[0], Signal::UndisguiseFailed { .. }));
}

#[test]
fn test_fetch_path_applies_resolved_textures() {
    let record = SkinRecord::from_textures("tex".into(), "sig".into(), Some(Uuid::new_v4()));
    let h = Harness::new(
        ScriptedProvider::always(ApplyOutcome::Success),
        Arc::new(StubResolver(Some(record))),
    );
    h.service.apply(&target(), "Steve", Some("Notch"), true);
    h.scheduler.run_until_idle();

    let signals = h.messenger.signals();
    assert!(
        matches!(&signals[0], Signal::Resolving { target } if target == "Notch"),
        "expected Resolving first, got {signals:?}"
    );
    assert_eq!(done_outcome(&signals), ApplyOutcome::Success);

    // signed textures outrank the identifier
    let descriptors = h.provider.descriptors.lock();
    assert!(matches!(
        descriptors[0].skin,
        Some(SkinSource::Raw { .. })
    ));
}

#[test]
fn test_fetch_path_falls_back_to_identifier_skin() {
    let id = Uuid::new_v4();
    let h = Harness::new(
        ScriptedProvider::always(ApplyOutcome::Success),
        Arc::new(StubResolver(Some(SkinRecord::from_identifier(id)))),
    );
    h.service.apply(&target(), "Steve", Some("Notch"), true);
    h.scheduler.run_until_idle();

    let descriptors = h.provider.descriptors.lock();
    assert_eq!(descriptors[0].skin, Some(SkinSource::ByIdentifier(id)));
}

#[test]
fn test_fetch_path_empty_result_skips_apply() {
    let h = Harness::new(
        ScriptedProvider::always(ApplyOutcome::Success),
        Arc::new(StubResolver(None)),
    );
    h.service.apply(&target(), "Steve", Some("NoSuchName"), true);
    h.scheduler.run_until_idle();

    assert_eq!(h.provider.attempts(), 0);
    let signals = h.messenger.signals();
    assert!(
        signals
            .iter()
            .any(|s| matches!(s, Signal::ResolveFailed { target } if target == "NoSuchName"))
    );
    assert!(!signals.iter().any(|s| matches!(s, Signal::Done { .. })));
}

#[test]
fn test_resolver_panic_surfaces_as_update_failed() {
    let h = Harness::new(
        ScriptedProvider::always(ApplyOutcome::Success),
        Arc::new(PanicResolver),
    );
    h.service.apply(&target(), "Steve", Some("Notch"), true);
    h.scheduler.run_until_idle();

    assert_eq!(h.provider.attempts(), 0);
    let signals = h.messenger.signals();
    assert!(
        signals
            .iter()
            .any(|s| matches!(s, Signal::UpdateFailed { error } if error.contains("blew up")))
    );
}

#[test]
fn test_no_fetch_path_reports_no_skin_target() {
    let h = Harness::no_resolver(ScriptedProvider::always(ApplyOutcome::Success));
    h.service.apply(&target(), "Herobrine", None, false);

    let signals = h.messenger.signals();
    assert!(signals.iter().any(|s| matches!(
        s,
        Signal::Done { name, skin_target, .. } if name == "Herobrine" && skin_target == "-"
    )));
}
