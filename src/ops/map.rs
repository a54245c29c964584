use crate::{publisher::Publisher, subscriber::Subscriber};

#[derive(Clone)]
pub struct Map<P, F> {
  source: P,
  func: F,
}

impl<P, F> Map<P, F> {
  pub(crate) fn new(source: P, func: F) -> Self { Map { source, func } }
}

impl<P, F, B> Publisher for Map<P, F>
where
  P: Publisher,
  F: FnMut(P::Output) -> B + Send + 'static,
{
  type Output = B;
  type Failure = P::Failure;
  type Token = P::Token;

  fn actual_subscribe<S>(self, subscriber: S) -> Self::Token
  where
    S: Subscriber<B, Self::Failure> + Send + 'static,
  {
    self.source.actual_subscribe(MapSubscriber { downstream: subscriber, func: self.func })
  }
}

pub struct MapSubscriber<S, F> {
  downstream: S,
  func: F,
}

impl<V, B, E, S, F> Subscriber<V, E> for MapSubscriber<S, F>
where
  S: Subscriber<B, E>,
  F: FnMut(V) -> B,
{
  fn on_value(&mut self, value: V) { self.downstream.on_value((self.func)(value)) }

  forward_terminal!(downstream, E);
}
