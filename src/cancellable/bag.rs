use std::mem;

use parking_lot::Mutex;
use smallvec::SmallVec;
use tracing::trace;

use super::{AnyCancellable, Cancellable};

/// An owned collection of handles with an explicit scope.
///
/// Handles can be inserted concurrently from several threads. `cancel_all`
/// drains and cancels everything collected so far; dropping the bag does the
/// same.
#[derive(Default)]
pub struct CancelBag {
  handles: Mutex<SmallVec<[AnyCancellable; 4]>>,
}

impl CancelBag {
  pub fn new() -> Self { Self::default() }

  pub fn insert(&self, handle: AnyCancellable) { self.handles.lock().push(handle); }

  pub fn len(&self) -> usize { self.handles.lock().len() }

  pub fn is_empty(&self) -> bool { self.handles.lock().is_empty() }

  /// Cancels every stored handle and empties the bag. The bag stays usable.
  pub fn cancel_all(&self) {
    let drained = mem::take(&mut *self.handles.lock());
    if drained.is_empty() {
      return;
    }
    trace!(handles = drained.len(), "cancelling bag");
    for handle in drained {
      handle.cancel();
    }
  }
}

impl Drop for CancelBag {
  fn drop(&mut self) { self.cancel_all() }
}

/// An RAII "scoped subscription": cancels the wrapped handle when dropped.
#[derive(Debug)]
#[must_use]
pub struct CancelGuard<T: Cancellable>(Option<T>);

impl<T: Cancellable> CancelGuard<T> {
  pub fn new(handle: T) -> Self { CancelGuard(Some(handle)) }

  /// Returns the handle without cancelling it.
  pub fn into_inner(mut self) -> Option<T> { self.0.take() }
}

impl<T: Cancellable> Cancellable for CancelGuard<T> {
  #[inline]
  fn cancel(&self) { self.0.cancel() }

  #[inline]
  fn is_closed(&self) -> bool { self.0.is_closed() }
}

impl<T: Cancellable> Drop for CancelGuard<T> {
  #[inline]
  fn drop(&mut self) { self.0.cancel() }
}
