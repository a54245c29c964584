use crate::{publisher::Publisher, subscriber::Subscriber};

/// Emits a fixed list of values, then everything from the source.
#[derive(Clone)]
pub struct Prepend<P, V> {
  source: P,
  items: Vec<V>,
}

impl<P, V> Prepend<P, V> {
  pub(crate) fn new(source: P, items: Vec<V>) -> Self { Prepend { source, items } }
}

impl<P> Publisher for Prepend<P, P::Output>
where
  P: Publisher,
{
  type Output = P::Output;
  type Failure = P::Failure;
  type Token = Option<P::Token>;

  fn actual_subscribe<S>(self, mut subscriber: S) -> Self::Token
  where
    S: Subscriber<Self::Output, Self::Failure> + Send + 'static,
  {
    for item in self.items {
      if subscriber.is_closed() {
        return None;
      }
      subscriber.on_value(item);
    }
    if subscriber.is_closed() {
      return None;
    }
    Some(self.source.actual_subscribe(subscriber))
  }
}

#[cfg(test)]
mod tests {
  use crate::{prelude::*, test_util::EventLog};

  #[rxsignal_macro::test]
  fn items_come_first() {
    let log = EventLog::<i32, Infallible>::new();
    from_iter([3, 4]).prepend([1, 2]).subscribe(log.subscriber());
    assert_eq!(log.values(), vec![1, 2, 3, 4]);
    assert!(log.is_terminated());
  }

  #[rxsignal_macro::test]
  fn prepended_before_live_values() {
    let subject = PassthroughSubject::<i32>::new();
    let log = EventLog::new();
    subject.clone().prepend([0]).subscribe(log.subscriber());
    subject.send(1);
    assert_eq!(log.values(), vec![0, 1]);
  }
}
