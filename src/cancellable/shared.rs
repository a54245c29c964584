use std::{
  fmt::{Debug, Formatter},
  mem,
  sync::Arc,
};

use parking_lot::Mutex;
use smallvec::SmallVec;

use super::Cancellable;

type BoxCancellable = Box<dyn Cancellable + Send>;

/// A cloneable composite handle.
///
/// Operators that own several upstream subscriptions (merge, zip, flat_map,
/// delay, ...) collect them here. Every clone shares one state: cancelling any
/// clone cancels every handle added so far, and a handle added after the
/// composite was cancelled is cancelled on the spot. Dropping the composite
/// does not cancel anything.
#[derive(Clone, Default)]
pub struct SharedCancellable(Arc<Mutex<Inner>>);

const MIN_PRUNE_AT: usize = 8;

#[derive(Default)]
struct Inner {
  closed: bool,
  teardown: SmallVec<[BoxCancellable; 1]>,
  /// Finished handles are swept once `teardown` grows to this length; the
  /// bound then doubles past the survivors, keeping `add` amortized O(1).
  prune_at: usize,
}

impl SharedCancellable {
  pub fn add<C: Cancellable + Send + 'static>(&self, handle: C) {
    let mut inner = self.0.lock();
    if inner.closed {
      drop(inner);
      handle.cancel();
    } else {
      if inner.teardown.len() >= inner.prune_at {
        inner.teardown.retain(|h| !h.is_closed());
        inner.prune_at = (inner.teardown.len() * 2).max(MIN_PRUNE_AT);
      }
      inner.teardown.push(Box::new(handle));
    }
  }

  /// Number of handles currently held. Finished ones are swept lazily.
  pub fn teardown_size(&self) -> usize { self.0.lock().teardown.len() }
}

impl Cancellable for SharedCancellable {
  fn cancel(&self) {
    let teardown = {
      let mut inner = self.0.lock();
      if inner.closed {
        return;
      }
      inner.closed = true;
      mem::take(&mut inner.teardown)
    };
    tracing::trace!(handles = teardown.len(), "cancelling composite handle");
    for handle in teardown {
      handle.cancel();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.0.lock().closed }
}

impl Debug for SharedCancellable {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let inner = self.0.lock();
    f.debug_struct("SharedCancellable")
      .field("closed", &inner.closed)
      .field("teardown_count", &inner.teardown.len())
      .finish()
  }
}
