use std::convert::Infallible;

use super::Publisher;
use crate::{event::Completion, subscriber::Subscriber};

/// Emits every item of `iter` synchronously, then finishes.
///
/// Production stops as soon as the subscriber reports itself closed, so a
/// handler that cancels its own subscription sees no further values.
///
/// ```
/// use rxsignal::prelude::*;
///
/// let _token = from_iter(0..3).sink_value(|v| println!("{v}"));
/// ```
pub fn from_iter<I>(iter: I) -> FromIter<I>
where
  I: IntoIterator,
{
  FromIter(iter)
}

#[derive(Clone)]
pub struct FromIter<I>(I);

impl<I> Publisher for FromIter<I>
where
  I: IntoIterator,
{
  type Output = I::Item;
  type Failure = Infallible;
  type Token = ();

  fn actual_subscribe<S>(self, mut subscriber: S) -> Self::Token
  where
    S: Subscriber<Self::Output, Self::Failure> + Send + 'static,
  {
    for value in self.0 {
      if subscriber.is_closed() {
        return;
      }
      subscriber.on_value(value);
    }
    if !subscriber.is_closed() {
      subscriber.on_completion(Completion::Finished);
    }
  }
}
