//! Where and when work runs.
//!
//! A [`Scheduler`] is an explicit value handed to the scheduling operators
//! (`delay`, `subscribe_on`, `receive_on`). There is no ambient "current
//! scheduler". Every implementation runs the tasks of one instance in a single
//! total order: by fire time, ties broken by enqueue order.

use std::{
  cmp::Ordering as CmpOrdering,
  collections::BinaryHeap,
  sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
  },
};

pub use std::time::{Duration, Instant};

use crate::cancellable::Cancellable;

mod immediate;
mod queue;
mod test_scheduler;
#[cfg(feature = "tokio-scheduler")]
mod tokio_scheduler;

pub use immediate::ImmediateScheduler;
pub use queue::{QueueScheduler, QueueSchedulerBuilder};
pub use test_scheduler::TestScheduler;
#[cfg(feature = "tokio-scheduler")]
pub use tokio_scheduler::TokioScheduler;

pub(crate) type Task = Box<dyn FnOnce() + Send + 'static>;

/// Decides when and on which execution context a task runs.
pub trait Scheduler: Clone + Send + 'static {
  /// Run `task` after `delay` (as soon as possible for `None`).
  ///
  /// The returned handle cancels the task if it has not started yet.
  fn schedule<F>(&self, task: F, delay: Option<Duration>) -> TaskHandle
  where
    F: FnOnce() + Send + 'static;

  /// The scheduler's notion of the current time.
  fn now(&self) -> Instant;
}

// ==================== TaskHandle ====================

/// Handle to one scheduled task.
#[derive(Clone, Default)]
pub struct TaskHandle(Arc<TaskState>);

#[derive(Default)]
struct TaskState {
  cancelled: AtomicBool,
  finished: AtomicBool,
}

impl TaskHandle {
  /// `true` once the task ran (or was skipped because it was cancelled).
  pub fn is_finished(&self) -> bool { self.0.finished.load(Ordering::Acquire) }

  pub fn is_cancelled(&self) -> bool { self.0.cancelled.load(Ordering::Acquire) }

  pub(crate) fn run(&self, task: Task) {
    if !self.is_cancelled() {
      task();
    }
    self.0.finished.store(true, Ordering::Release);
  }
}

impl Cancellable for TaskHandle {
  fn cancel(&self) { self.0.cancelled.store(true, Ordering::Release); }

  fn is_closed(&self) -> bool { self.is_cancelled() || self.is_finished() }
}

// ==================== TimerQueue ====================

pub(crate) struct TimerEntry {
  fire_at: Instant,
  seq: u64,
  task: Task,
  handle: TaskHandle,
}

impl TimerEntry {
  pub(crate) fn fire_at(&self) -> Instant { self.fire_at }

  pub(crate) fn run(self) { self.handle.run(self.task) }
}

impl PartialEq for TimerEntry {
  fn eq(&self, other: &Self) -> bool { self.fire_at == other.fire_at && self.seq == other.seq }
}

impl Eq for TimerEntry {}

impl PartialOrd for TimerEntry {
  fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> { Some(self.cmp(other)) }
}

impl Ord for TimerEntry {
  fn cmp(&self, other: &Self) -> CmpOrdering {
    // Min-heap: earlier fire time first, then FIFO by enqueue sequence
    other.fire_at.cmp(&self.fire_at).then_with(|| other.seq.cmp(&self.seq))
  }
}

/// Pending tasks ordered by fire time, then enqueue order.
#[derive(Default)]
pub(crate) struct TimerQueue {
  heap: BinaryHeap<TimerEntry>,
  next_seq: u64,
}

impl TimerQueue {
  pub(crate) fn push(&mut self, fire_at: Instant, task: Task, handle: TaskHandle) {
    let seq = self.next_seq;
    self.next_seq += 1;
    self.heap.push(TimerEntry { fire_at, seq, task, handle });
  }

  /// Pops the earliest entry if it is due at `now`. Cancelled entries are
  /// discarded on the way.
  pub(crate) fn pop_due(&mut self, now: Instant) -> Option<TimerEntry> {
    loop {
      let head = self.heap.peek()?;
      if head.handle.is_cancelled() {
        if let Some(entry) = self.heap.pop() {
          entry.handle.0.finished.store(true, Ordering::Release);
        }
        continue;
      }
      if head.fire_at > now {
        return None;
      }
      return self.heap.pop();
    }
  }

  pub(crate) fn next_deadline(&self) -> Option<Instant> { self.heap.peek().map(|e| e.fire_at) }

  pub(crate) fn len(&self) -> usize { self.heap.len() }

  pub(crate) fn clear(&mut self) { self.heap.clear() }
}

#[cfg(test)]
mod tests {
  use parking_lot::Mutex;

  use super::*;

  fn push_recording(queue: &mut TimerQueue, at: Instant, log: &Arc<Mutex<Vec<u32>>>, id: u32) -> TaskHandle {
    let handle = TaskHandle::default();
    let log = log.clone();
    queue.push(at, Box::new(move || log.lock().push(id)), handle.clone());
    handle
  }

  #[rxsignal_macro::test]
  fn timers_fire_by_time_then_enqueue_order() {
    let log = Arc::new(Mutex::new(vec![]));
    let mut queue = TimerQueue::default();
    let base = Instant::now();
    push_recording(&mut queue, base + Duration::from_millis(20), &log, 1);
    push_recording(&mut queue, base + Duration::from_millis(10), &log, 2);
    push_recording(&mut queue, base + Duration::from_millis(10), &log, 3);
    push_recording(&mut queue, base, &log, 4);

    let end = base + Duration::from_millis(30);
    while let Some(entry) = queue.pop_due(end) {
      entry.run();
    }
    assert_eq!(*log.lock(), vec![4, 2, 3, 1]);
  }

  #[rxsignal_macro::test]
  fn cancelled_entries_are_skipped() {
    let log = Arc::new(Mutex::new(vec![]));
    let mut queue = TimerQueue::default();
    let base = Instant::now();
    let first = push_recording(&mut queue, base, &log, 1);
    push_recording(&mut queue, base, &log, 2);
    first.cancel();

    while let Some(entry) = queue.pop_due(base) {
      entry.run();
    }
    assert_eq!(*log.lock(), vec![2]);
    assert!(first.is_closed());
    assert_eq!(queue.len(), 0);
  }

  #[rxsignal_macro::test]
  fn not_due_yet() {
    let log = Arc::new(Mutex::new(vec![]));
    let mut queue = TimerQueue::default();
    let base = Instant::now();
    push_recording(&mut queue, base + Duration::from_secs(1), &log, 1);
    assert!(queue.pop_due(base).is_none());
    assert_eq!(queue.next_deadline(), Some(base + Duration::from_secs(1)));
  }
}
