use crate::{publisher::Publisher, subscriber::Subscriber};

#[derive(Clone)]
pub struct Filter<P, F> {
  source: P,
  predicate: F,
}

impl<P, F> Filter<P, F> {
  pub(crate) fn new(source: P, predicate: F) -> Self { Filter { source, predicate } }
}

impl<P, F> Publisher for Filter<P, F>
where
  P: Publisher,
  F: FnMut(&P::Output) -> bool + Send + 'static,
{
  type Output = P::Output;
  type Failure = P::Failure;
  type Token = P::Token;

  fn actual_subscribe<S>(self, subscriber: S) -> Self::Token
  where
    S: Subscriber<Self::Output, Self::Failure> + Send + 'static,
  {
    self
      .source
      .actual_subscribe(FilterSubscriber { downstream: subscriber, predicate: self.predicate })
  }
}

pub struct FilterSubscriber<S, F> {
  downstream: S,
  predicate: F,
}

impl<V, E, S, F> Subscriber<V, E> for FilterSubscriber<S, F>
where
  S: Subscriber<V, E>,
  F: FnMut(&V) -> bool,
{
  fn on_value(&mut self, value: V) {
    if (self.predicate)(&value) {
      self.downstream.on_value(value)
    }
  }

  forward_terminal!(downstream, E);
}

#[cfg(test)]
mod tests {
  use crate::{prelude::*, test_util::EventLog};

  #[rxsignal_macro::test]
  fn keeps_matching_values() {
    let log = EventLog::<i32, Infallible>::new();
    from_iter(0..10).filter(|v| v % 2 == 0).subscribe(log.subscriber());
    assert_eq!(log.values(), vec![0, 2, 4, 6, 8]);
    assert!(log.is_terminated());
  }

  #[rxsignal_macro::test]
  fn failure_passes_through() {
    let log = EventLog::<i32, &str>::new();
    fail("bad").filter(|_| false).subscribe(log.subscriber());
    assert_eq!(log.events(), vec![Event::Failed("bad")]);
  }
}
