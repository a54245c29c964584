//! Type-erased publishers.
//!
//! Boxing lets heterogeneous pipelines with the same output and failure types
//! live in one collection or be returned from one function.

use super::Publisher;
use crate::{cancellable::AnyCancellable, subscriber::BoxSubscriber};

/// Object-safe mirror of [`Publisher`].
pub trait DynPublisher<V, E> {
  fn dyn_subscribe(self: Box<Self>, subscriber: BoxSubscriber<V, E>) -> AnyCancellable;
}

impl<P> DynPublisher<P::Output, P::Failure> for P
where
  P: Publisher,
  P::Output: 'static,
  P::Failure: 'static,
{
  fn dyn_subscribe(self: Box<Self>, subscriber: BoxSubscriber<P::Output, P::Failure>) -> AnyCancellable {
    AnyCancellable::new((*self).actual_subscribe(subscriber))
  }
}

/// A publisher with its concrete type erased. Produced by
/// [`Publisher::box_it`].
pub struct AnyPublisher<V, E>(Box<dyn DynPublisher<V, E> + Send>);

impl<V, E> AnyPublisher<V, E> {
  pub fn new<P>(publisher: P) -> Self
  where
    P: Publisher<Output = V, Failure = E> + Send + 'static,
    V: 'static,
    E: 'static,
  {
    AnyPublisher(Box::new(publisher))
  }
}

impl<V: 'static, E: 'static> Publisher for AnyPublisher<V, E> {
  type Output = V;
  type Failure = E;
  type Token = AnyCancellable;

  fn actual_subscribe<S>(self, subscriber: S) -> Self::Token
  where
    S: crate::subscriber::Subscriber<V, E> + Send + 'static,
  {
    self.0.dyn_subscribe(Box::new(subscriber))
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use parking_lot::Mutex;

  use crate::prelude::*;

  #[rxsignal_macro::test]
  fn heterogeneous_pipelines_in_one_vec() {
    let sources: Vec<AnyPublisher<i32, Infallible>> = vec![
      just(1).box_it(),
      from_iter(vec![2, 3]).map(|v| v * 10).box_it(),
      empty().box_it(),
    ];

    let seen = Arc::new(Mutex::new(vec![]));
    for source in sources {
      let c_seen = seen.clone();
      source.sink_value(move |v| c_seen.lock().push(v));
    }
    assert_eq!(*seen.lock(), vec![1, 20, 30]);
  }
}
