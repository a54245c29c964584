use crate::{
  cancellable::{Cancellable, SharedCancellable},
  event::Completion,
  publisher::Publisher,
  subscriber::Subscriber,
};

/// Emits everything from the source, then, if it finished, everything from
/// `next`.
#[derive(Clone)]
pub struct Append<P, Q> {
  source: P,
  next: Q,
}

impl<P, Q> Append<P, Q> {
  pub(crate) fn new(source: P, next: Q) -> Self { Append { source, next } }
}

impl<P, Q> Publisher for Append<P, Q>
where
  P: Publisher,
  Q: Publisher<Output = P::Output, Failure = P::Failure> + Send + 'static,
{
  type Output = P::Output;
  type Failure = P::Failure;
  type Token = SharedCancellable;

  fn actual_subscribe<S>(self, subscriber: S) -> Self::Token
  where
    S: Subscriber<Self::Output, Self::Failure> + Send + 'static,
  {
    let token = SharedCancellable::default();
    let upstream = self.source.actual_subscribe(AppendSubscriber {
      downstream: subscriber,
      next: self.next,
      token: token.clone(),
    });
    token.add(upstream);
    token
  }
}

pub struct AppendSubscriber<S, Q> {
  downstream: S,
  next: Q,
  token: SharedCancellable,
}

impl<V, E, S, Q> Subscriber<V, E> for AppendSubscriber<S, Q>
where
  S: Subscriber<V, E> + Send + 'static,
  Q: Publisher<Output = V, Failure = E>,
{
  #[inline]
  fn on_value(&mut self, value: V) { self.downstream.on_value(value) }

  fn on_completion(self, completion: Completion<E>) {
    match completion {
      Completion::Finished if !self.token.is_closed() => {
        let next = self.next.actual_subscribe(self.downstream);
        self.token.add(next);
      }
      Completion::Finished => {}
      failure => self.downstream.on_completion(failure),
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.downstream.is_closed() }
}
