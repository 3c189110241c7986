//! Primary/worker execution contexts.
//!
//! All provider mutation happens on a single primary context: the thread
//! that drains the task queue. Workers are detached threads used only for
//! network-bound resolution; their sole way back is posting an immutable
//! result as a task onto the primary queue. There is no cancellation: a
//! worker that outlives its invocation simply posts a task nobody drains,
//! which is dropped with the queue.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};

type Task = Box<dyn FnOnce() + Send>;

pub struct Scheduler {
    tx: Sender<Task>,
    rx: Receiver<Task>,
    in_flight: Arc<AtomicUsize>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self {
            tx,
            rx,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            tx: self.tx.clone(),
            in_flight: Arc::clone(&self.in_flight),
        }
    }

    /// Drain primary tasks on the calling thread until the queue is empty
    /// and no worker is in flight.
    pub fn run_until_idle(&self) {
        loop {
            match self.rx.recv_timeout(Duration::from_millis(25)) {
                Ok(task) => task(),
                Err(RecvTimeoutError::Timeout) => {
                    if self.in_flight.load(Ordering::Acquire) == 0 && self.rx.is_empty() {
                        return;
                    }
                }
                Err(RecvTimeoutError::Disconnected) => return,
            }
        }
    }
}

#[derive(Clone)]
pub struct SchedulerHandle {
    tx: Sender<Task>,
    in_flight: Arc<AtomicUsize>,
}

impl SchedulerHandle {
    /// Queue a task for the primary context. A task posted after the
    /// scheduler is gone is silently dropped.
    pub fn run_on_primary(&self, task: impl FnOnce() + Send + 'static) {
        let _ = self.tx.send(Box::new(task));
    }

    /// Run a job on a detached worker thread. The in-flight count drops
    /// when the job finishes, even if it panics.
    pub fn run_async(&self, job: impl FnOnce() + Send + 'static) {
        self.in_flight.fetch_add(1, Ordering::AcqRel);
        let guard = InFlightGuard(Arc::clone(&self.in_flight));
        thread::spawn(move || {
            let _guard = guard;
            job();
        });
    }
}

struct InFlightGuard(Arc<AtomicUsize>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}
