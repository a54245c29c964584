use std::marker::PhantomData;

use super::Publisher;
use crate::{
  cancellable::{Cancellable, SharedCancellable},
  event::Completion,
  subscriber::Subscriber,
};

/// A publisher that never emits a value.
///
/// With `complete_immediately` it finishes on subscribe; otherwise it stays
/// silent until the handle is cancelled.
pub struct Empty<V, E> {
  complete_immediately: bool,
  _event: PhantomData<fn() -> (V, E)>,
}

impl<V, E> Empty<V, E> {
  pub fn new(complete_immediately: bool) -> Self {
    Empty { complete_immediately, _event: PhantomData }
  }
}

impl<V, E> Clone for Empty<V, E> {
  fn clone(&self) -> Self { Empty::new(self.complete_immediately) }
}

/// Finishes right away without values.
pub fn empty<V, E>() -> Empty<V, E> { Empty::new(true) }

/// Never emits anything, not even a terminal event.
pub fn never<V, E>() -> Empty<V, E> { Empty::new(false) }

impl<V, E> Publisher for Empty<V, E> {
  type Output = V;
  type Failure = E;
  type Token = SharedCancellable;

  fn actual_subscribe<S>(self, subscriber: S) -> Self::Token
  where
    S: Subscriber<V, E> + Send + 'static,
  {
    let token = SharedCancellable::default();
    if self.complete_immediately {
      token.cancel();
      subscriber.on_completion(Completion::Finished);
    }
    token
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use parking_lot::Mutex;

  use crate::prelude::*;

  #[rxsignal_macro::test]
  fn empty_finishes() {
    let done = Arc::new(Mutex::new(None));
    let c_done = done.clone();
    let token = empty::<i32, ()>().sink(|_| unreachable!(), move |c| *c_done.lock() = Some(c));
    assert_eq!(*done.lock(), Some(Completion::Finished));
    assert!(token.is_closed());
  }

  #[rxsignal_macro::test]
  fn never_stays_open_until_cancelled() {
    let done = Arc::new(Mutex::new(None));
    let c_done = done.clone();
    let token = never::<i32, ()>().sink(|_| unreachable!(), move |c| *c_done.lock() = Some(c));
    assert!(!token.is_closed());
    token.cancel();
    assert!(token.is_closed());
    assert!(done.lock().is_none());
  }
}
