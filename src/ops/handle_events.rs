use crate::{
  cancellable::Cancellable,
  event::Completion,
  publisher::Publisher,
  rc::MutArc,
  subscriber::Subscriber,
};

type CancelHook = Option<Box<dyn FnOnce() + Send>>;

/// Side effects run by [`Publisher::handle_events`]. Every hook is optional.
///
/// ```
/// use rxsignal::prelude::*;
///
/// let _token = from_iter([1, 2])
///   .handle_events(EventHooks::new().on_value(|v| println!("saw {v}")))
///   .sink_value(|_| {});
/// ```
pub struct EventHooks<V, E> {
  on_subscribe: Option<Box<dyn FnOnce() + Send>>,
  on_value: Option<Box<dyn FnMut(&V) + Send>>,
  on_completion: Option<Box<dyn FnOnce(&Completion<E>) + Send>>,
  on_cancel: CancelHook,
}

impl<V, E> Default for EventHooks<V, E> {
  fn default() -> Self { EventHooks { on_subscribe: None, on_value: None, on_completion: None, on_cancel: None } }
}

impl<V, E> EventHooks<V, E> {
  pub fn new() -> Self { Self::default() }

  /// Runs once, before the upstream is subscribed.
  pub fn on_subscribe(mut self, hook: impl FnOnce() + Send + 'static) -> Self {
    self.on_subscribe = Some(Box::new(hook));
    self
  }

  /// Runs for every value, before it is forwarded.
  pub fn on_value(mut self, hook: impl FnMut(&V) + Send + 'static) -> Self {
    self.on_value = Some(Box::new(hook));
    self
  }

  /// Runs with the terminal event, before it is forwarded.
  pub fn on_completion(mut self, hook: impl FnOnce(&Completion<E>) + Send + 'static) -> Self {
    self.on_completion = Some(Box::new(hook));
    self
  }

  /// Runs when the subscription is cancelled before a terminal event.
  pub fn on_cancel(mut self, hook: impl FnOnce() + Send + 'static) -> Self {
    self.on_cancel = Some(Box::new(hook));
    self
  }
}

pub struct HandleEvents<P: Publisher> {
  source: P,
  hooks: EventHooks<P::Output, P::Failure>,
}

impl<P: Publisher> HandleEvents<P> {
  pub(crate) fn new(source: P, hooks: EventHooks<P::Output, P::Failure>) -> Self { HandleEvents { source, hooks } }
}

impl<P> Publisher for HandleEvents<P>
where
  P: Publisher,
  P::Output: 'static,
  P::Failure: 'static,
{
  type Output = P::Output;
  type Failure = P::Failure;
  type Token = HookCancellable<P::Token>;

  fn actual_subscribe<S>(self, subscriber: S) -> Self::Token
  where
    S: Subscriber<Self::Output, Self::Failure> + Send + 'static,
  {
    let EventHooks { on_subscribe, on_value, on_completion, on_cancel } = self.hooks;
    if let Some(hook) = on_subscribe {
      hook();
    }
    let cancel_hook = MutArc::own(on_cancel);
    let upstream = self.source.actual_subscribe(HookSubscriber {
      downstream: subscriber,
      on_value,
      on_completion,
      cancel_hook: cancel_hook.clone(),
    });
    HookCancellable { upstream, cancel_hook }
  }
}

pub struct HookSubscriber<S, V, E> {
  downstream: S,
  on_value: Option<Box<dyn FnMut(&V) + Send>>,
  on_completion: Option<Box<dyn FnOnce(&Completion<E>) + Send>>,
  cancel_hook: MutArc<CancelHook>,
}

impl<V, E, S> Subscriber<V, E> for HookSubscriber<S, V, E>
where
  S: Subscriber<V, E>,
{
  fn on_value(&mut self, value: V) {
    if let Some(hook) = self.on_value.as_mut() {
      hook(&value);
    }
    self.downstream.on_value(value);
  }

  fn on_completion(self, completion: Completion<E>) {
    // A finished subscription can no longer be cancelled.
    let cancel_hook = self.cancel_hook.rc_deref_mut().take();
    drop(cancel_hook);
    if let Some(hook) = self.on_completion {
      hook(&completion);
    }
    self.downstream.on_completion(completion);
  }

  #[inline]
  fn is_closed(&self) -> bool { self.downstream.is_closed() }
}

/// Runs the cancel hook, at most once, then cancels upstream.
pub struct HookCancellable<T> {
  upstream: T,
  cancel_hook: MutArc<CancelHook>,
}

impl<T: Cancellable> Cancellable for HookCancellable<T> {
  fn cancel(&self) {
    let hook = self.cancel_hook.rc_deref_mut().take();
    if let Some(hook) = hook {
      hook();
    }
    self.upstream.cancel();
  }

  #[inline]
  fn is_closed(&self) -> bool { self.upstream.is_closed() }
}
