use std::{convert::Infallible, sync::Arc};

use super::subject_core::{SubjectCancellable, SubjectCore, SubjectStatus};
use crate::{event::Completion, subscriber::BoxSubscriber};

/// A multicast channel without memory.
///
/// Subscribers receive only what is sent after they subscribed. Every clone
/// is a handle to the same channel.
///
/// ```
/// use rxsignal::prelude::*;
///
/// let subject = PassthroughSubject::<i32>::new();
/// let _token = subject.clone().sink_value(|v| println!("got {v}"));
/// subject.send(1);
/// subject.finish();
/// ```
pub struct PassthroughSubject<V, E = Infallible> {
  pub(crate) core: Arc<SubjectCore<V, E>>,
}

impl<V: Clone, E: Clone> PassthroughSubject<V, E> {
  pub fn new() -> Self { PassthroughSubject { core: SubjectCore::new() } }

  /// Delivers `value` to every current subscriber. Ignored once terminated.
  pub fn send(&self, value: V) { self.core.send(value) }

  /// Terminates the subject. Only the first terminal event has an effect.
  pub fn send_completion(&self, completion: Completion<E>) { self.core.send_completion(completion) }

  pub fn finish(&self) { self.send_completion(Completion::Finished) }

  pub fn fail(&self, error: E) { self.send_completion(Completion::Failure(error)) }

  pub fn subscriber_count(&self) -> usize { self.core.subscriber_count() }

  pub fn status(&self) -> SubjectStatus<E> { self.core.status() }

  pub(crate) fn attach(&self, subscriber: BoxSubscriber<V, E>) -> SubjectCancellable<V, E> {
    self.core.subscribe(subscriber, None)
  }
}

impl<V: Clone, E: Clone> Default for PassthroughSubject<V, E> {
  fn default() -> Self { Self::new() }
}

impl<V, E> Clone for PassthroughSubject<V, E> {
  fn clone(&self) -> Self { PassthroughSubject { core: self.core.clone() } }
}

impl_subject!(PassthroughSubject);

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use parking_lot::Mutex;

  use crate::{prelude::*, test_util::EventLog};

  #[rxsignal_macro::test]
  fn late_subscriber_misses_earlier_values() {
    let subject = PassthroughSubject::<i32, ()>::new();
    let early = EventLog::new();
    let late = EventLog::new();

    subject.clone().subscribe(early.subscriber());
    subject.send(1);
    subject.clone().subscribe(late.subscriber());
    subject.send(2);
    subject.finish();

    assert_eq!(early.events(), vec![Event::Value(1), Event::Value(2), Event::Completed]);
    assert_eq!(late.events(), vec![Event::Value(2), Event::Completed]);
  }

  #[rxsignal_macro::test]
  fn only_first_terminal_event_counts() {
    let subject = PassthroughSubject::<i32, &str>::new();
    let log = EventLog::new();
    subject.clone().subscribe(log.subscriber());

    subject.fail("first");
    subject.finish();
    subject.send(9);

    assert_eq!(log.events(), vec![Event::Failed("first")]);
    assert_eq!(subject.status(), SubjectStatus::Terminated(Completion::Failure("first")));
  }

  #[rxsignal_macro::test]
  fn subscribing_after_termination_gets_the_terminal_event() {
    let subject = PassthroughSubject::<i32, ()>::new();
    subject.finish();

    let log = EventLog::new();
    let token = subject.clone().subscribe(log.subscriber());
    assert_eq!(log.events(), vec![Event::Completed]);
    assert!(token.is_closed());
    assert_eq!(subject.subscriber_count(), 0);
  }

  #[rxsignal_macro::test]
  fn cancel_unregisters() {
    let subject = PassthroughSubject::<i32>::new();
    let log = EventLog::new();
    let token = subject.clone().subscribe(log.subscriber());
    assert_eq!(subject.subscriber_count(), 1);

    subject.send(1);
    token.cancel();
    subject.send(2);

    assert_eq!(subject.subscriber_count(), 0);
    assert_eq!(log.values(), vec![1]);
  }

  #[rxsignal_macro::test]
  fn cancel_from_earlier_handler_skips_later_subscriber() {
    let subject = PassthroughSubject::<i32>::new();
    let second = EventLog::new();
    let second_token = Arc::new(Mutex::new(None::<AnyCancellable>));

    let c_token = second_token.clone();
    let _first = subject.clone().sink_value(move |_| {
      if let Some(token) = c_token.lock().as_ref() {
        token.cancel();
      }
    });
    *second_token.lock() = Some(subject.clone().subscribe(second.subscriber()));

    subject.send(1);
    assert!(second.values().is_empty());
    assert_eq!(subject.subscriber_count(), 1);
  }

  #[rxsignal_macro::test]
  fn handler_may_emit_into_its_own_subject() {
    let subject = PassthroughSubject::<i32>::new();
    let log = EventLog::new();
    let c_subject = subject.clone();
    let _echo = subject.clone().sink_value(move |v| {
      if v < 3 {
        c_subject.send(v + 1);
      }
    });
    subject.clone().subscribe(log.subscriber());

    subject.send(1);
    // The echo handler is busy, so its own nested emission skips it and
    // only the later subscriber sees 2, ahead of the outer 1.
    assert_eq!(log.values(), vec![2, 1]);
  }

  #[rxsignal_macro::test]
  fn handler_may_terminate_its_own_subject() {
    let subject = PassthroughSubject::<i32>::new();
    let log = EventLog::new();
    let later = EventLog::new();

    let mut values = log.subscriber();
    let done = log.subscriber();
    let c_subject = subject.clone();
    let token = subject.clone().sink(
      move |v| {
        values.on_value(v);
        if v == 2 {
          c_subject.finish();
        }
      },
      move |completion| done.on_completion(completion),
    );
    subject.clone().subscribe(later.subscriber());

    subject.send(1);
    subject.send(2);
    subject.send(3);

    assert_eq!(log.events(), vec![Event::Value(1), Event::Value(2), Event::Completed]);
    assert_eq!(later.events(), vec![Event::Value(1), Event::Completed]);
    assert!(token.is_closed());
    assert_eq!(subject.status(), SubjectStatus::Terminated(Completion::Finished));
    assert_eq!(subject.subscriber_count(), 0);
  }

  #[rxsignal_macro::test]
  fn cancel_while_other_threads_send() {
    let subject = PassthroughSubject::<i32>::new();
    let steady = EventLog::new();
    subject.clone().subscribe(steady.subscriber());

    let senders: Vec<_> = (0..4)
      .map(|t| {
        let subject = subject.clone();
        std::thread::spawn(move || (0..250).for_each(|i| subject.send(t * 250 + i)))
      })
      .collect();
    for _ in 0..100 {
      let churn = EventLog::new();
      let token = subject.clone().subscribe(churn.subscriber());
      token.cancel();
      token.cancel();
      assert!(token.is_closed());
      assert!(!churn.is_terminated());
    }
    for sender in senders {
      sender.join().unwrap();
    }

    assert_eq!(steady.len(), 1000);
    assert_eq!(subject.subscriber_count(), 1);
  }

  #[rxsignal_macro::test]
  fn subject_as_subscriber() {
    let subject = PassthroughSubject::<i32>::new();
    let log = EventLog::new();
    subject.clone().subscribe(log.subscriber());

    from_iter([1, 2]).subscribe(subject.clone());
    assert_eq!(log.events(), vec![Event::Value(1), Event::Value(2), Event::Completed]);
  }

  #[rxsignal_macro::test]
  fn concurrent_senders() {
    let subject = PassthroughSubject::<i32>::new();
    let log = EventLog::new();
    subject.clone().subscribe(log.subscriber());

    let workers: Vec<_> = (0..4)
      .map(|t| {
        let subject = subject.clone();
        std::thread::spawn(move || (0..100).for_each(|i| subject.send(t * 100 + i)))
      })
      .collect();
    for worker in workers {
      worker.join().unwrap();
    }
    assert_eq!(log.len(), 400);
  }
}
