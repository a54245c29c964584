use crate::{publisher::Publisher, subscriber::Subscriber};

/// Suppresses a value that duplicates the previously *emitted* one.
#[derive(Clone)]
pub struct RemoveDuplicates<P, F> {
  source: P,
  is_duplicate: F,
}

impl<P, F> RemoveDuplicates<P, F> {
  pub(crate) fn new(source: P, is_duplicate: F) -> Self { RemoveDuplicates { source, is_duplicate } }
}

impl<P, F> Publisher for RemoveDuplicates<P, F>
where
  P: Publisher,
  P::Output: Clone + Send + 'static,
  F: FnMut(&P::Output, &P::Output) -> bool + Send + 'static,
{
  type Output = P::Output;
  type Failure = P::Failure;
  type Token = P::Token;

  fn actual_subscribe<S>(self, subscriber: S) -> Self::Token
  where
    S: Subscriber<Self::Output, Self::Failure> + Send + 'static,
  {
    self.source.actual_subscribe(RemoveDuplicatesSubscriber {
      downstream: subscriber,
      is_duplicate: self.is_duplicate,
      last: None,
    })
  }
}

pub struct RemoveDuplicatesSubscriber<S, F, V> {
  downstream: S,
  is_duplicate: F,
  last: Option<V>,
}

impl<V, E, S, F> Subscriber<V, E> for RemoveDuplicatesSubscriber<S, F, V>
where
  S: Subscriber<V, E>,
  F: FnMut(&V, &V) -> bool,
  V: Clone,
{
  fn on_value(&mut self, value: V) {
    if let Some(last) = &self.last {
      if (self.is_duplicate)(last, &value) {
        return;
      }
    }
    self.last = Some(value.clone());
    self.downstream.on_value(value);
  }

  forward_terminal!(downstream, E);
}
