use std::sync::{
  atomic::{AtomicBool, Ordering},
  Arc,
};

use parking_lot::{Mutex, MutexGuard};
use smallvec::SmallVec;
use tracing::warn;

use crate::{
  event::Completion,
  subscriber::{BoxSubscriber, Subscriber},
};

/// One registered subscriber of a subject.
///
/// The `closed` flag is flipped by whoever detaches the slot first: the
/// cancellation handle, a terminal event, or the subscriber reporting itself
/// closed. A slot that is closed receives nothing more, even if a fan-out
/// that snapshotted it earlier has not reached it yet.
///
/// A terminal event that arrives while the subscriber's own handler is
/// running waits in `pending` and is handed over when the handler returns.
pub(crate) struct Slot<V, E> {
  closed: AtomicBool,
  subscriber: Mutex<Option<BoxSubscriber<V, E>>>,
  pending: Mutex<Option<Completion<E>>>,
}

impl<V, E> Slot<V, E> {
  pub(crate) fn new(subscriber: BoxSubscriber<V, E>) -> Self {
    Slot {
      closed: AtomicBool::new(false),
      subscriber: Mutex::new(Some(subscriber)),
      pending: Mutex::new(None),
    }
  }

  #[inline]
  pub(crate) fn is_closed(&self) -> bool { self.closed.load(Ordering::Acquire) }

  /// Marks the slot closed. Returns `true` for the call that closed it.
  #[inline]
  pub(crate) fn close(&self) -> bool { !self.closed.swap(true, Ordering::AcqRel) }

  /// Drops the subscriber unless it is being delivered to right now, in which
  /// case the delivering side drops it once it notices the flag.
  pub(crate) fn release(&self) {
    let subscriber = self.subscriber.try_lock().and_then(|mut s| s.take());
    drop(subscriber);
  }

  /// Delivers `value`. Returns `false` once the slot should be unregistered.
  pub(crate) fn deliver_value(&self, value: V) -> bool {
    if self.is_closed() {
      return false;
    }
    let Some(mut guard) = self.subscriber.try_lock() else {
      // Busy because a cancel is releasing it, or because its handler is on
      // the stack.
      if self.is_closed() {
        return false;
      }
      warn!("re-entrant emission into a subject subscriber skipped");
      return true;
    };
    let Some(subscriber) = guard.as_mut() else { return false };
    subscriber.on_value(value);
    if !subscriber.is_closed() && !self.is_closed() {
      return true;
    }

    self.closed.store(true, Ordering::Release);
    self.hand_over(guard);
    false
  }

  /// Detaches the subscriber and gives it the parked terminal event, if any.
  fn hand_over(&self, mut guard: MutexGuard<'_, Option<BoxSubscriber<V, E>>>) {
    let subscriber = guard.take();
    drop(guard);
    let completion = self.pending.lock().take();
    if let (Some(subscriber), Some(completion)) = (subscriber, completion) {
      subscriber.on_completion(completion);
    }
  }

  pub(crate) fn deliver_completion(&self, completion: Completion<E>) {
    if !self.close() {
      return;
    }
    *self.pending.lock() = Some(completion);
    // When busy, the running `deliver_value` picks up `pending`.
    if let Some(guard) = self.subscriber.try_lock() {
      self.hand_over(guard);
    }
  }
}

/// Registry of a subject's subscribers, keyed by a unique id.
pub(crate) struct Subscribers<V, E> {
  next_id: usize,
  slots: SmallVec<[(usize, Arc<Slot<V, E>>); 2]>,
}

impl<V, E> Default for Subscribers<V, E> {
  fn default() -> Self { Subscribers { next_id: 0, slots: SmallVec::new() } }
}

impl<V, E> Subscribers<V, E> {
  pub(crate) fn add(&mut self, slot: Arc<Slot<V, E>>) -> usize {
    let id = self.next_id;
    self.next_id += 1;
    self.slots.push((id, slot));
    id
  }

  pub(crate) fn remove(&mut self, id: usize) -> Option<Arc<Slot<V, E>>> {
    let pos = self.slots.iter().position(|(slot_id, _)| *slot_id == id)?;
    Some(self.slots.remove(pos).1)
  }

  /// Clones the current registrations, in subscription order.
  pub(crate) fn snapshot(&self) -> SmallVec<[(usize, Arc<Slot<V, E>>); 2]> { self.slots.clone() }

  pub(crate) fn drain(&mut self) -> SmallVec<[(usize, Arc<Slot<V, E>>); 2]> { std::mem::take(&mut self.slots) }

  #[inline]
  pub(crate) fn len(&self) -> usize { self.slots.len() }
}

/// Fans `value` out over `slots`, cloning for all but the last one. Returns
/// the ids of slots that closed on the way.
pub(crate) fn broadcast_value<V: Clone, E>(
  slots: SmallVec<[(usize, Arc<Slot<V, E>>); 2]>, value: V,
) -> SmallVec<[usize; 2]> {
  let mut stale = SmallVec::new();
  let mut iter = slots.into_iter().peekable();
  while let Some((id, slot)) = iter.next() {
    if iter.peek().is_some() {
      if !slot.deliver_value(value.clone()) {
        stale.push(id);
      }
    } else {
      if !slot.deliver_value(value) {
        stale.push(id);
      }
      break;
    }
  }
  stale
}
