use crate::{event::Completion, publisher::Publisher, subscriber::Subscriber};

#[derive(Clone)]
pub struct ReplaceEmpty<P, V> {
  source: P,
  value: V,
}

impl<P, V> ReplaceEmpty<P, V> {
  pub(crate) fn new(source: P, value: V) -> Self { ReplaceEmpty { source, value } }
}

impl<P> Publisher for ReplaceEmpty<P, P::Output>
where
  P: Publisher,
  P::Output: Send + 'static,
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
      .actual_subscribe(ReplaceEmptySubscriber { downstream: subscriber, fallback: Some(self.value) })
  }
}

pub struct ReplaceEmptySubscriber<S, V> {
  downstream: S,
  fallback: Option<V>,
}

impl<V, E, S> Subscriber<V, E> for ReplaceEmptySubscriber<S, V>
where
  S: Subscriber<V, E>,
{
  fn on_value(&mut self, value: V) {
    self.fallback = None;
    self.downstream.on_value(value);
  }

  fn on_completion(mut self, completion: Completion<E>) {
    if completion.is_finished() {
      if let Some(value) = self.fallback.take() {
        self.downstream.on_value(value);
      }
    }
    self.downstream.on_completion(completion);
  }

  fn is_closed(&self) -> bool { self.downstream.is_closed() }
}

#[cfg(test)]
mod tests {
  use crate::{prelude::*, test_util::EventLog};

  #[rxsignal_macro::test]
  fn empty_upstream_gets_the_value() {
    let log = EventLog::<i32, Infallible>::new();
    empty().replace_empty(7).subscribe(log.subscriber());
    assert_eq!(log.events(), vec![Event::Value(7), Event::Completed]);
  }

  #[rxsignal_macro::test]
  fn non_empty_upstream_is_untouched() {
    let log = EventLog::<i32, Infallible>::new();
    just(1).replace_empty(7).subscribe(log.subscriber());
    assert_eq!(log.values(), vec![1]);
  }

  #[rxsignal_macro::test]
  fn failure_is_not_replaced() {
    let log = EventLog::<i32, &str>::new();
    fail("e").replace_empty(7).subscribe(log.subscriber());
    assert_eq!(log.events(), vec![Event::Failed("e")]);
  }
}
