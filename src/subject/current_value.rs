use std::{convert::Infallible, sync::Arc};

use parking_lot::Mutex;

use super::subject_core::{SubjectCancellable, SubjectCore, SubjectStatus};
use crate::{event::Completion, subscriber::BoxSubscriber};

/// A multicast channel that remembers its latest value.
///
/// A new subscriber immediately receives the current value, then everything
/// sent afterwards. The value keeps updating until the subject terminates.
pub struct CurrentValueSubject<V, E = Infallible> {
  pub(crate) core: Arc<SubjectCore<V, E>>,
  latest: Arc<Mutex<V>>,
}

impl<V: Clone, E: Clone> CurrentValueSubject<V, E> {
  pub fn new(initial: V) -> Self {
    CurrentValueSubject { core: SubjectCore::new(), latest: Arc::new(Mutex::new(initial)) }
  }

  /// The latest value sent, or the initial one.
  pub fn value(&self) -> V { self.latest.lock().clone() }

  pub fn send(&self, value: V) {
    let _gate = self.core.gate();
    if self.core.is_terminated() {
      return;
    }
    *self.latest.lock() = value.clone();
    self.core.send(value);
  }

  pub fn send_completion(&self, completion: Completion<E>) { self.core.send_completion(completion) }

  pub fn finish(&self) { self.send_completion(Completion::Finished) }

  pub fn fail(&self, error: E) { self.send_completion(Completion::Failure(error)) }

  pub fn subscriber_count(&self) -> usize { self.core.subscriber_count() }

  pub fn status(&self) -> SubjectStatus<E> { self.core.status() }

  pub(crate) fn attach(&self, subscriber: BoxSubscriber<V, E>) -> SubjectCancellable<V, E> {
    // The gate keeps a concurrent `send` from slipping between read and replay
    let _gate = self.core.gate();
    let replay = self.latest.lock().clone();
    self.core.subscribe(subscriber, Some(replay))
  }
}

impl<V, E> Clone for CurrentValueSubject<V, E> {
  fn clone(&self) -> Self { CurrentValueSubject { core: self.core.clone(), latest: self.latest.clone() } }
}

impl_subject!(CurrentValueSubject);
