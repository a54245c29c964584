//! A scheduler backed by one dedicated worker thread.

use std::{
  sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
  },
  thread::{self, ThreadId},
};

use parking_lot::{Condvar, Mutex};
use tracing::debug;

use super::{Duration, Instant, Scheduler, TaskHandle, TimerQueue};
use crate::error::SchedulerError;

static NEXT_QUEUE_ID: AtomicUsize = AtomicUsize::new(0);

/// Work queue drained by a single named worker thread.
///
/// Zero-delay tasks run in FIFO order; delayed tasks wait on the worker's
/// timer heap without blocking the caller. Once the last clone of the
/// scheduler is dropped, the worker runs whatever is still pending, on
/// schedule, and then exits.
#[derive(Clone)]
pub struct QueueScheduler {
  shared: Arc<Shared>,
  worker: ThreadId,
  _owner: Arc<Owner>,
}

struct Shared {
  name: String,
  state: Mutex<QueueState>,
  wakeup: Condvar,
}

#[derive(Default)]
struct QueueState {
  timers: TimerQueue,
  shutdown: bool,
}

/// Dropped together with the last `QueueScheduler` clone.
struct Owner(Arc<Shared>);

impl Drop for Owner {
  fn drop(&mut self) {
    self.0.state.lock().shutdown = true;
    self.0.wakeup.notify_all();
  }
}

/// Configures a [`QueueScheduler`] before its worker starts.
#[derive(Debug, Default)]
pub struct QueueSchedulerBuilder {
  name: Option<String>,
}

impl QueueSchedulerBuilder {
  /// Name of the worker thread.
  pub fn name(mut self, name: impl Into<String>) -> Self {
    self.name = Some(name.into());
    self
  }

  pub fn build(self) -> Result<QueueScheduler, SchedulerError> {
    let name = self
      .name
      .unwrap_or_else(|| format!("rxsignal-queue-{}", NEXT_QUEUE_ID.fetch_add(1, Ordering::Relaxed)));
    let shared = Arc::new(Shared {
      name: name.clone(),
      state: Mutex::new(QueueState::default()),
      wakeup: Condvar::new(),
    });

    let worker_shared = shared.clone();
    let join = thread::Builder::new()
      .name(name.clone())
      .spawn(move || run_worker(worker_shared))
      .map_err(|source| SchedulerError::Spawn { name, source })?;

    Ok(QueueScheduler {
      worker: join.thread().id(),
      _owner: Arc::new(Owner(shared.clone())),
      shared,
    })
  }
}

impl QueueScheduler {
  pub fn builder() -> QueueSchedulerBuilder { QueueSchedulerBuilder::default() }

  /// A queue with an auto-numbered worker name.
  pub fn new() -> Result<Self, SchedulerError> { Self::builder().build() }

  pub fn name(&self) -> &str { &self.shared.name }

  /// `true` when called from this queue's worker thread.
  pub fn is_current(&self) -> bool { thread::current().id() == self.worker }

  /// Number of tasks waiting to run.
  pub fn pending_count(&self) -> usize { self.shared.state.lock().timers.len() }
}

impl Scheduler for QueueScheduler {
  fn schedule<F>(&self, task: F, delay: Option<Duration>) -> TaskHandle
  where
    F: FnOnce() + Send + 'static,
  {
    let handle = TaskHandle::default();
    let fire_at = Instant::now() + delay.unwrap_or_default();
    self.shared.state.lock().timers.push(fire_at, Box::new(task), handle.clone());
    self.shared.wakeup.notify_one();
    handle
  }

  fn now(&self) -> Instant { Instant::now() }
}

fn run_worker(shared: Arc<Shared>) {
  debug!(worker = %shared.name, "queue scheduler worker started");
  loop {
    let entry = {
      let mut state = shared.state.lock();
      loop {
        if let Some(entry) = state.timers.pop_due(Instant::now()) {
          break entry;
        }
        match state.timers.next_deadline() {
          Some(deadline) => {
            shared.wakeup.wait_until(&mut state, deadline);
          }
          None if state.shutdown => {
            debug!(worker = %shared.name, "queue scheduler worker stopped");
            return;
          }
          None => shared.wakeup.wait(&mut state),
        }
      }
    };
    entry.run();
  }
}
