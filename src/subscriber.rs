//! The consuming side of a channel.
//!
//! A [`Subscriber`] receives values through `on_value` and exactly one
//! terminal event through `on_completion`. Taking `self` by value in
//! `on_completion` makes "nothing after the terminal event" a property of the
//! type system: once a subscriber completed, nobody owns it anymore.

use std::{
  convert::Infallible,
  sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
  },
};

use crate::{cancellable::Cancellable, event::Completion};

// ============================================================================
// Subscriber Trait
// ============================================================================

pub trait Subscriber<V, E> {
  /// Receive the next value.
  fn on_value(&mut self, value: V);

  /// Receive the terminal event. Consumes the subscriber.
  fn on_completion(self, completion: Completion<E>);

  /// `true` once the subscriber will not accept anything anymore.
  ///
  /// Synchronous sources poll this between values to stop early when the
  /// downstream cancelled.
  fn is_closed(&self) -> bool;
}

// ============================================================================
// DynSubscriber - object-safe Subscriber
// ============================================================================

/// Mirror of [`Subscriber`] usable behind a `Box<dyn _>`.
pub trait DynSubscriber<V, E> {
  fn box_on_value(&mut self, value: V);
  fn box_on_completion(self: Box<Self>, completion: Completion<E>);
  fn box_is_closed(&self) -> bool;
}

impl<T, V, E> DynSubscriber<V, E> for T
where
  T: Subscriber<V, E>,
{
  fn box_on_value(&mut self, value: V) { self.on_value(value) }
  fn box_on_completion(self: Box<Self>, completion: Completion<E>) { self.on_completion(completion) }
  fn box_is_closed(&self) -> bool { self.is_closed() }
}

/// A type-erased subscriber that can cross threads.
pub type BoxSubscriber<V, E> = Box<dyn DynSubscriber<V, E> + Send>;

impl<V, E> Subscriber<V, E> for Box<dyn DynSubscriber<V, E> + Send> {
  #[inline]
  fn on_value(&mut self, value: V) { (**self).box_on_value(value) }

  #[inline]
  fn on_completion(self, completion: Completion<E>) { self.box_on_completion(completion) }

  #[inline]
  fn is_closed(&self) -> bool { (**self).box_is_closed() }
}

// ============================================================================
// Sink - closure adapter
// ============================================================================

/// Subscriber built from a value callback and a completion callback.
pub struct Sink<N, C> {
  on_value: N,
  on_completion: C,
}

impl<N, C> Sink<N, C> {
  pub fn new(on_value: N, on_completion: C) -> Self { Sink { on_value, on_completion } }
}

impl<V, E, N, C> Subscriber<V, E> for Sink<N, C>
where
  N: FnMut(V),
  C: FnOnce(Completion<E>),
{
  #[inline]
  fn on_value(&mut self, value: V) { (self.on_value)(value) }

  #[inline]
  fn on_completion(self, completion: Completion<E>) { (self.on_completion)(completion) }

  #[inline]
  fn is_closed(&self) -> bool { false }
}

/// Value-only subscriber for channels that cannot fail.
#[derive(Clone)]
pub struct FnSubscriber<F>(pub F);

impl<F, V> Subscriber<V, Infallible> for FnSubscriber<F>
where
  F: FnMut(V),
{
  #[inline]
  fn on_value(&mut self, value: V) { (self.0)(value) }

  #[inline]
  fn on_completion(self, _: Completion<Infallible>) {}

  #[inline]
  fn is_closed(&self) -> bool { false }
}

// ============================================================================
// Guarded - the subscriber side of an `AnyCancellable` returned to users
// ============================================================================

/// Wraps the final subscriber of a pipeline.
///
/// The flag is shared with the [`GuardCancellable`] handed back to the caller.
/// Once it is set, either by `cancel()` or by a terminal event, every later
/// event is dropped, including deliveries that were already queued on a
/// scheduler when the cancel happened.
pub struct Guarded<S> {
  inner: S,
  closed: Arc<AtomicBool>,
}

impl<S> Guarded<S> {
  pub fn new(inner: S) -> (Self, Arc<AtomicBool>) {
    let closed = Arc::new(AtomicBool::new(false));
    (Guarded { inner, closed: closed.clone() }, closed)
  }
}

impl<V, E, S> Subscriber<V, E> for Guarded<S>
where
  S: Subscriber<V, E>,
{
  fn on_value(&mut self, value: V) {
    if !self.closed.load(Ordering::Acquire) {
      self.inner.on_value(value);
    }
  }

  fn on_completion(self, completion: Completion<E>) {
    if !self.closed.swap(true, Ordering::AcqRel) {
      self.inner.on_completion(completion);
    }
  }

  fn is_closed(&self) -> bool { self.closed.load(Ordering::Acquire) || self.inner.is_closed() }
}

/// Handle paired with a [`Guarded`] subscriber.
pub struct GuardCancellable<T> {
  closed: Arc<AtomicBool>,
  upstream: T,
}

impl<T> GuardCancellable<T> {
  pub fn new(closed: Arc<AtomicBool>, upstream: T) -> Self { GuardCancellable { closed, upstream } }
}

impl<T: Cancellable> Cancellable for GuardCancellable<T> {
  fn cancel(&self) {
    if !self.closed.swap(true, Ordering::AcqRel) {
      self.upstream.cancel();
    }
  }

  fn is_closed(&self) -> bool { self.closed.load(Ordering::Acquire) }
}
