use std::{convert::Infallible, marker::PhantomData};

use crate::{event::Completion, publisher::Publisher, subscriber::Subscriber};

/// Gives a publisher that cannot fail the failure type `E`, so it can be
/// combined with fallible ones.
pub struct SetFailureType<P, E> {
  source: P,
  _failure: PhantomData<fn() -> E>,
}

impl<P, E> SetFailureType<P, E> {
  pub(crate) fn new(source: P) -> Self { SetFailureType { source, _failure: PhantomData } }
}

impl<P: Clone, E> Clone for SetFailureType<P, E> {
  fn clone(&self) -> Self { SetFailureType::new(self.source.clone()) }
}

impl<P, E> Publisher for SetFailureType<P, E>
where
  P: Publisher<Failure = Infallible>,
  E: 'static,
{
  type Output = P::Output;
  type Failure = E;
  type Token = P::Token;

  fn actual_subscribe<S>(self, subscriber: S) -> Self::Token
  where
    S: Subscriber<Self::Output, E> + Send + 'static,
  {
    self.source.actual_subscribe(WidenFailure { downstream: subscriber, _failure: PhantomData })
  }
}

pub struct WidenFailure<S, E> {
  downstream: S,
  _failure: PhantomData<fn() -> E>,
}

impl<V, E, S> Subscriber<V, Infallible> for WidenFailure<S, E>
where
  S: Subscriber<V, E>,
{
  #[inline]
  fn on_value(&mut self, value: V) { self.downstream.on_value(value) }

  fn on_completion(self, completion: Completion<Infallible>) {
    match completion {
      Completion::Finished => self.downstream.on_completion(Completion::Finished),
      Completion::Failure(never) => match never {},
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.downstream.is_closed() }
}
