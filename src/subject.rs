//! Multicast channels that are both a subscriber and a publisher.
//!
//! Both flavors share one core: a registry of subscribers plus a terminal
//! status. Values and terminal events must be `Clone`, since every subscriber
//! gets its own copy.

/// Implements `Publisher` and `Subscriber` for a subject handle with an
/// `attach` method.
macro_rules! impl_subject {
  ($ty:ident) => {
    impl<V, E> $crate::publisher::Publisher for $ty<V, E>
    where
      V: Clone + Send + 'static,
      E: Clone + Send + 'static,
    {
      type Output = V;
      type Failure = E;
      type Token = $crate::subject::SubjectCancellable<V, E>;

      fn actual_subscribe<S>(self, subscriber: S) -> Self::Token
      where
        S: $crate::subscriber::Subscriber<V, E> + Send + 'static,
      {
        self.attach(Box::new(subscriber))
      }
    }

    /// Forwards everything into the subject, so it can sit at the end of
    /// another pipeline.
    impl<V, E> $crate::subscriber::Subscriber<V, E> for $ty<V, E>
    where
      V: Clone,
      E: Clone,
    {
      fn on_value(&mut self, value: V) { self.send(value) }

      fn on_completion(self, completion: $crate::event::Completion<E>) { self.send_completion(completion) }

      fn is_closed(&self) -> bool { self.status().is_terminated() }
    }
  };
}

mod current_value;
mod passthrough;
mod subject_core;
mod subscribers;

pub use current_value::CurrentValueSubject;
pub use passthrough::PassthroughSubject;
pub use subject_core::{SubjectCancellable, SubjectStatus};
