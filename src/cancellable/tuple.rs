use super::Cancellable;

/// Two handles cancelled together.
pub struct TupleCancellable<A, B> {
  first: A,
  second: B,
}

impl<A, B> TupleCancellable<A, B> {
  pub fn new(first: A, second: B) -> Self { TupleCancellable { first, second } }
}

impl<A, B> Cancellable for TupleCancellable<A, B>
where
  A: Cancellable,
  B: Cancellable,
{
  fn cancel(&self) {
    self.first.cancel();
    self.second.cancel();
  }

  fn is_closed(&self) -> bool { self.first.is_closed() && self.second.is_closed() }
}
