//! Shared mutable cells used to hand one downstream to several upstream
//! callbacks.

use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

use crate::{event::Completion, subscriber::Subscriber};

/// `Arc<Mutex<T>>` with the accessor names used across the operators.
#[derive(Default)]
pub struct MutArc<T>(Arc<Mutex<T>>);

impl<T> MutArc<T> {
  pub fn own(t: T) -> Self { Self(Arc::new(Mutex::new(t))) }

  #[inline]
  pub fn rc_deref(&self) -> MutexGuard<'_, T> { self.0.lock() }

  #[inline]
  pub fn rc_deref_mut(&self) -> MutexGuard<'_, T> { self.0.lock() }

  #[inline]
  pub fn try_rc_deref_mut(&self) -> Option<MutexGuard<'_, T>> { self.0.try_lock() }
}

impl<T> Clone for MutArc<T> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

/// A shared downstream slot. Values are delivered while the lock is held, so
/// concurrent producers never reach the subscriber at the same time. The
/// terminal event takes the subscriber out first and delivers outside the
/// lock.
impl<S, V, E> Subscriber<V, E> for MutArc<Option<S>>
where
  S: Subscriber<V, E>,
{
  fn on_value(&mut self, value: V) {
    if let Some(inner) = self.rc_deref_mut().as_mut() {
      inner.on_value(value);
    }
  }

  fn on_completion(self, completion: Completion<E>) {
    let inner = self.rc_deref_mut().take();
    if let Some(inner) = inner {
      inner.on_completion(completion);
    }
  }

  fn is_closed(&self) -> bool { self.rc_deref().as_ref().map_or(true, |s| s.is_closed()) }
}
