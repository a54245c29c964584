use crate::{publisher::Publisher, subscriber::Subscriber};

#[derive(Clone)]
pub struct CompactMap<P, F> {
  source: P,
  func: F,
}

impl<P, F> CompactMap<P, F> {
  pub(crate) fn new(source: P, func: F) -> Self { CompactMap { source, func } }
}

impl<P, F, B> Publisher for CompactMap<P, F>
where
  P: Publisher,
  F: FnMut(P::Output) -> Option<B> + Send + 'static,
{
  type Output = B;
  type Failure = P::Failure;
  type Token = P::Token;

  fn actual_subscribe<S>(self, subscriber: S) -> Self::Token
  where
    S: Subscriber<B, Self::Failure> + Send + 'static,
  {
    self
      .source
      .actual_subscribe(CompactMapSubscriber { downstream: subscriber, func: self.func })
  }
}

pub struct CompactMapSubscriber<S, F> {
  downstream: S,
  func: F,
}

impl<V, B, E, S, F> Subscriber<V, E> for CompactMapSubscriber<S, F>
where
  S: Subscriber<B, E>,
  F: FnMut(V) -> Option<B>,
{
  fn on_value(&mut self, value: V) {
    if let Some(mapped) = (self.func)(value) {
      self.downstream.on_value(mapped)
    }
  }

  forward_terminal!(downstream, E);
}
