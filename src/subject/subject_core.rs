use std::sync::{Arc, Weak};

use parking_lot::{Mutex, ReentrantMutex, ReentrantMutexGuard};
use tracing::debug;

use super::subscribers::{broadcast_value, Slot, Subscribers};
use crate::{
  cancellable::Cancellable,
  event::Completion,
  subscriber::{BoxSubscriber, Subscriber},
};

/// Lifecycle of a subject. Once `Terminated`, it stays terminated and keeps
/// the event so late subscribers can be told how it ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubjectStatus<E> {
  Active,
  Terminated(Completion<E>),
}

impl<E> SubjectStatus<E> {
  #[inline]
  pub fn is_terminated(&self) -> bool { matches!(self, SubjectStatus::Terminated(_)) }
}

pub(crate) struct SubjectState<V, E> {
  subscribers: Subscribers<V, E>,
  status: SubjectStatus<E>,
}

/// State shared by every handle of one subject.
///
/// `gate` serializes sends and subscribes: every subscriber observes the same
/// interleaving. It is re-entrant so a handler may emit into the subject that
/// called it; `state` is never held while a subscriber runs.
pub(crate) struct SubjectCore<V, E> {
  gate: ReentrantMutex<()>,
  state: Mutex<SubjectState<V, E>>,
}

impl<V, E> SubjectCore<V, E>
where
  V: Clone,
  E: Clone,
{
  pub(crate) fn new() -> Arc<Self> {
    Arc::new(SubjectCore {
      gate: ReentrantMutex::new(()),
      state: Mutex::new(SubjectState { subscribers: Subscribers::default(), status: SubjectStatus::Active }),
    })
  }

  /// Holds off every other thread's sends and subscribes while alive.
  pub(crate) fn gate(&self) -> ReentrantMutexGuard<'_, ()> { self.gate.lock() }

  /// Registers `subscriber` and hands it `replay` first, if any. A terminated
  /// subject only delivers its terminal event.
  pub(crate) fn subscribe(
    self: &Arc<Self>, subscriber: BoxSubscriber<V, E>, replay: Option<V>,
  ) -> SubjectCancellable<V, E> {
    let _gate = self.gate.lock();
    let mut state = self.state.lock();
    if let SubjectStatus::Terminated(completion) = &state.status {
      let completion = completion.clone();
      drop(state);
      subscriber.on_completion(completion);
      return SubjectCancellable { link: None };
    }

    let slot = Arc::new(Slot::new(subscriber));
    let id = state.subscribers.add(slot.clone());
    drop(state);

    if let Some(value) = replay {
      if !slot.deliver_value(value) {
        self.state.lock().subscribers.remove(id);
      }
    }
    SubjectCancellable { link: Some(SubjectLink { core: Arc::downgrade(self), id, slot }) }
  }

  pub(crate) fn send(&self, value: V) {
    let _gate = self.gate.lock();
    let slots = {
      let mut state = self.state.lock();
      if state.status.is_terminated() {
        return;
      }
      state.subscribers.snapshot()
    };

    let stale = broadcast_value(slots, value);
    if !stale.is_empty() {
      let mut state = self.state.lock();
      for id in stale {
        state.subscribers.remove(id);
      }
    }
  }

  pub(crate) fn send_completion(&self, completion: Completion<E>) {
    let _gate = self.gate.lock();
    let slots = {
      let mut state = self.state.lock();
      if state.status.is_terminated() {
        return;
      }
      state.status = SubjectStatus::Terminated(completion.clone());
      state.subscribers.drain()
    };
    debug!(subscribers = slots.len(), failed = completion.is_failure(), "subject terminated");

    let mut iter = slots.into_iter().peekable();
    while let Some((_, slot)) = iter.next() {
      if iter.peek().is_some() {
        slot.deliver_completion(completion.clone());
      } else {
        slot.deliver_completion(completion);
        break;
      }
    }
  }

  pub(crate) fn status(&self) -> SubjectStatus<E> { self.state.lock().status.clone() }

  pub(crate) fn is_terminated(&self) -> bool { self.state.lock().status.is_terminated() }

  pub(crate) fn subscriber_count(&self) -> usize { self.state.lock().subscribers.len() }
}

/// Handle of one subject subscription.
///
/// Cancelling marks the slot closed first, so a fan-out already in progress
/// skips it, then unregisters it.
pub struct SubjectCancellable<V, E> {
  link: Option<SubjectLink<V, E>>,
}

struct SubjectLink<V, E> {
  core: Weak<SubjectCore<V, E>>,
  id: usize,
  slot: Arc<Slot<V, E>>,
}

impl<V, E> Cancellable for SubjectCancellable<V, E> {
  fn cancel(&self) {
    let Some(link) = &self.link else { return };
    if !link.slot.close() {
      return;
    }
    if let Some(core) = link.core.upgrade() {
      let removed = core.state.lock().subscribers.remove(link.id);
      drop(removed);
    }
    link.slot.release();
  }

  fn is_closed(&self) -> bool { self.link.as_ref().map_or(true, |link| link.slot.is_closed()) }
}
