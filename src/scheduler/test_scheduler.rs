//! Virtual-time scheduler for deterministic tests of time-based operators.
//!
//! Time only moves when the test says so. Tasks run synchronously on the
//! thread that calls [`TestScheduler::advance_by`] or
//! [`TestScheduler::flush`], which makes it a stand-in for an event loop
//! driven by the caller.
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//!
//! use rxsignal::prelude::*;
//!
//! let scheduler = TestScheduler::new();
//! let seen = Arc::new(Mutex::new(vec![]));
//! let c_seen = seen.clone();
//! let _token = from_iter([1, 2])
//!   .delay(Duration::from_millis(100), scheduler.clone())
//!   .sink_value(move |v| c_seen.lock().unwrap().push(v));
//!
//! scheduler.advance_by(Duration::from_millis(99));
//! assert!(seen.lock().unwrap().is_empty());
//! scheduler.advance_by(Duration::from_millis(1));
//! assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
//! ```

use std::sync::Arc;

use parking_lot::Mutex;

use super::{Duration, Instant, Scheduler, TaskHandle, TimerEntry, TimerQueue};

/// A scheduler whose clock is advanced manually.
///
/// Clones share the same clock and task queue.
#[derive(Clone)]
pub struct TestScheduler(Arc<Mutex<TestState>>);

struct TestState {
  origin: Instant,
  elapsed: Duration,
  timers: TimerQueue,
}

impl Default for TestScheduler {
  fn default() -> Self { Self::new() }
}

impl TestScheduler {
  pub fn new() -> Self {
    TestScheduler(Arc::new(Mutex::new(TestState {
      origin: Instant::now(),
      elapsed: Duration::ZERO,
      timers: TimerQueue::default(),
    })))
  }

  /// Virtual time elapsed since the scheduler was created.
  pub fn elapsed(&self) -> Duration { self.0.lock().elapsed }

  /// Number of tasks waiting in the queue, cancelled ones included.
  pub fn pending_count(&self) -> usize { self.0.lock().timers.len() }

  /// Advances the clock by `duration`, running every task that becomes due in
  /// fire-time order. Tasks scheduled by running tasks are honoured if they
  /// fall inside the window.
  pub fn advance_by(&self, duration: Duration) {
    let target = self.0.lock().elapsed + duration;
    while let Some(entry) = self.pop_due_before(Some(target)) {
      entry.run();
    }
    let mut state = self.0.lock();
    if state.elapsed < target {
      state.elapsed = target;
    }
  }

  /// Runs every pending task, advancing the clock to each one's fire time.
  pub fn flush(&self) {
    while let Some(entry) = self.pop_due_before(None) {
      entry.run();
    }
  }

  /// Drops every pending task without running it.
  pub fn clear(&self) { self.0.lock().timers.clear() }

  fn pop_due_before(&self, target: Option<Duration>) -> Option<TimerEntry> {
    let mut state = self.0.lock();
    let entry = match target {
      Some(target) => {
        let limit = state.origin + target;
        state.timers.pop_due(limit)?
      }
      None => loop {
        let deadline = state.timers.next_deadline()?;
        if let Some(entry) = state.timers.pop_due(deadline) {
          break entry;
        }
      },
    };
    let at = entry.fire_at().saturating_duration_since(state.origin);
    if at > state.elapsed {
      state.elapsed = at;
    }
    Some(entry)
  }
}

impl Scheduler for TestScheduler {
  fn schedule<F>(&self, task: F, delay: Option<Duration>) -> TaskHandle
  where
    F: FnOnce() + Send + 'static,
  {
    let handle = TaskHandle::default();
    let mut state = self.0.lock();
    let fire_at = state.origin + state.elapsed + delay.unwrap_or_default();
    state.timers.push(fire_at, Box::new(task), handle.clone());
    handle
  }

  fn now(&self) -> Instant {
    let state = self.0.lock();
    state.origin + state.elapsed
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cancellable::Cancellable;

  #[rxsignal_macro::test]
  fn advance_runs_due_tasks_in_order() {
    let scheduler = TestScheduler::new();
    let log = Arc::new(Mutex::new(vec![]));
    for (id, ms) in [(1, 30), (2, 10), (3, 10), (4, 50)] {
      let log = log.clone();
      scheduler.schedule(move || log.lock().push(id), Some(Duration::from_millis(ms)));
    }

    scheduler.advance_by(Duration::from_millis(30));
    assert_eq!(*log.lock(), vec![2, 3, 1]);
    assert_eq!(scheduler.elapsed(), Duration::from_millis(30));
    assert_eq!(scheduler.pending_count(), 1);

    scheduler.flush();
    assert_eq!(*log.lock(), vec![2, 3, 1, 4]);
    assert_eq!(scheduler.elapsed(), Duration::from_millis(50));
  }

  #[rxsignal_macro::test]
  fn nested_schedule_inside_window() {
    let scheduler = TestScheduler::new();
    let log = Arc::new(Mutex::new(vec![]));
    let c_log = log.clone();
    let c_scheduler = scheduler.clone();
    scheduler.schedule(
      move || {
        c_log.lock().push("outer");
        let log = c_log.clone();
        c_scheduler.schedule(move || log.lock().push("inner"), Some(Duration::from_millis(5)));
      },
      Some(Duration::from_millis(5)),
    );

    scheduler.advance_by(Duration::from_millis(10));
    assert_eq!(*log.lock(), vec!["outer", "inner"]);
  }

  #[rxsignal_macro::test]
  fn cancelled_task_is_skipped() {
    let scheduler = TestScheduler::new();
    let log = Arc::new(Mutex::new(vec![]));
    let c_log = log.clone();
    let handle = scheduler.schedule(move || c_log.lock().push(1), Some(Duration::from_millis(1)));
    handle.cancel();
    scheduler.flush();
    assert!(log.lock().is_empty());
  }

  #[rxsignal_macro::test]
  fn now_follows_virtual_clock() {
    let scheduler = TestScheduler::new();
    let start = scheduler.now();
    scheduler.advance_by(Duration::from_secs(3));
    assert_eq!(scheduler.now() - start, Duration::from_secs(3));
  }
}
