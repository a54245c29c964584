use std::marker::PhantomData;

use super::Publisher;
use crate::{event::Completion, subscriber::Subscriber};

/// Fails with `error` right away, without emitting a value.
pub fn fail<V, E>(error: E) -> Fail<V, E> { Fail { error, _value: PhantomData } }

pub struct Fail<V, E> {
  error: E,
  _value: PhantomData<fn() -> V>,
}

impl<V, E: Clone> Clone for Fail<V, E> {
  fn clone(&self) -> Self { fail(self.error.clone()) }
}

impl<V, E> Publisher for Fail<V, E> {
  type Output = V;
  type Failure = E;
  type Token = ();

  fn actual_subscribe<S>(self, subscriber: S) -> Self::Token
  where
    S: Subscriber<V, E> + Send + 'static,
  {
    subscriber.on_completion(Completion::Failure(self.error));
  }
}

#[cfg(test)]
mod tests {
  use crate::{prelude::*, test_util::EventLog};

  #[rxsignal_macro::test]
  fn fails_without_values() {
    let log = EventLog::<i32, &str>::new();
    fail("boom").subscribe(log.subscriber());
    assert_eq!(log.events(), vec![Event::Failed("boom")]);
  }
}
