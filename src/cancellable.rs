//! Handles that detach a subscription.
//!
//! Every `subscribe` returns something implementing [`Cancellable`]. Calling
//! [`Cancellable::cancel`] is idempotent and propagates upstream
//! synchronously. Dropping a handle does **not** cancel it; use
//! [`Cancellable::cancel_when_dropped`] or store it in a [`CancelBag`] for
//! scoped teardown.

use std::sync::Arc;

mod any;
mod bag;
mod shared;
mod tuple;

pub use any::AnyCancellable;
pub use bag::{CancelBag, CancelGuard};
pub use shared::SharedCancellable;
pub use tuple::TupleCancellable;

pub trait Cancellable {
  /// Detach the subscription. Calling it again is a no-op.
  fn cancel(&self);

  /// `true` once nothing is left to release, either because the handle was
  /// cancelled or because the work it guarded is over.
  fn is_closed(&self) -> bool;

  /// Activates RAII behavior: the returned guard cancels when dropped.
  ///
  /// **Attention:** if the guard is not bound to a variable it is dropped,
  /// and the subscription cancelled, immediately.
  fn cancel_when_dropped(self) -> CancelGuard<Self>
  where
    Self: Sized,
  {
    CancelGuard::new(self)
  }
}

/// Handle of a subscription that finished synchronously while subscribing.
impl Cancellable for () {
  #[inline]
  fn cancel(&self) {}

  #[inline]
  fn is_closed(&self) -> bool { true }
}

impl<T: Cancellable> Cancellable for Option<T> {
  fn cancel(&self) {
    if let Some(inner) = self {
      inner.cancel();
    }
  }

  fn is_closed(&self) -> bool { self.as_ref().map_or(true, |inner| inner.is_closed()) }
}

impl<T: Cancellable + ?Sized> Cancellable for Box<T> {
  #[inline]
  fn cancel(&self) { (**self).cancel() }

  #[inline]
  fn is_closed(&self) -> bool { (**self).is_closed() }
}

impl<T: Cancellable + ?Sized> Cancellable for Arc<T> {
  #[inline]
  fn cancel(&self) { (**self).cancel() }

  #[inline]
  fn is_closed(&self) -> bool { (**self).is_closed() }
}
