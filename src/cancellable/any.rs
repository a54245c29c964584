use std::fmt::{Debug, Formatter};

use super::{CancelBag, Cancellable};

/// Type-erased cancellation handle, the return type of every user-facing
/// `subscribe`.
pub struct AnyCancellable(Box<dyn Cancellable + Send>);

impl AnyCancellable {
  pub fn new<C: Cancellable + Send + 'static>(inner: C) -> Self { AnyCancellable(Box::new(inner)) }

  /// Moves the handle into `bag`; it is cancelled together with the bag.
  pub fn store(self, bag: &CancelBag) { bag.insert(self) }
}

impl Cancellable for AnyCancellable {
  #[inline]
  fn cancel(&self) { self.0.cancel() }

  #[inline]
  fn is_closed(&self) -> bool { self.0.is_closed() }
}

impl Debug for AnyCancellable {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("AnyCancellable").field("is_closed", &self.is_closed()).finish()
  }
}
