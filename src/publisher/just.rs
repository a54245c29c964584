use std::convert::Infallible;

use super::Publisher;
use crate::{event::Completion, subscriber::Subscriber};

/// Emits `value` once, then finishes.
pub fn just<V>(value: V) -> Just<V> { Just(value) }

#[derive(Clone)]
pub struct Just<V>(V);

impl<V> Publisher for Just<V> {
  type Output = V;
  type Failure = Infallible;
  type Token = ();

  fn actual_subscribe<S>(self, mut subscriber: S) -> Self::Token
  where
    S: Subscriber<V, Infallible> + Send + 'static,
  {
    subscriber.on_value(self.0);
    if !subscriber.is_closed() {
      subscriber.on_completion(Completion::Finished);
    }
  }
}
