use crate::{
  cancellable::{Cancellable, SharedCancellable},
  event::Completion,
  publisher::Publisher,
  rc::MutArc,
  subscriber::Subscriber,
};

/// Maps every upstream value to an inner publisher and merges all inner
/// publishers into one stream, without a concurrency limit.
///
/// Finishes once the upstream and every inner publisher finished. The first
/// failure anywhere cancels everything else and is forwarded.
#[derive(Clone)]
pub struct FlatMap<P, F> {
  source: P,
  func: F,
}

impl<P, F> FlatMap<P, F> {
  pub(crate) fn new(source: P, func: F) -> Self { FlatMap { source, func } }
}

impl<P, F, Q> Publisher for FlatMap<P, F>
where
  P: Publisher,
  F: FnMut(P::Output) -> Q + Send + 'static,
  Q: Publisher<Failure = P::Failure>,
{
  type Output = Q::Output;
  type Failure = P::Failure;
  type Token = SharedCancellable;

  fn actual_subscribe<S>(self, subscriber: S) -> Self::Token
  where
    S: Subscriber<Self::Output, Self::Failure> + Send + 'static,
  {
    let token = SharedCancellable::default();
    let outer = FlatMapOuter {
      func: self.func,
      state: MutArc::own(FlatMapState { downstream: Some(subscriber), subscribed: 0, outer_done: false }),
      token: token.clone(),
    };
    token.add(self.source.actual_subscribe(outer));
    token
  }
}

struct FlatMapState<S> {
  downstream: Option<S>,
  /// Inner publishers subscribed and not yet finished.
  subscribed: usize,
  outer_done: bool,
}

impl<S> FlatMapState<S> {
  fn is_closed<V, E>(&self) -> bool
  where
    S: Subscriber<V, E>,
  {
    self.downstream.as_ref().map_or(true, |d| d.is_closed())
  }
}

fn fail_all<S, V, E>(state: &MutArc<FlatMapState<S>>, token: &SharedCancellable, error: E)
where
  S: Subscriber<V, E>,
{
  token.cancel();
  let downstream = state.rc_deref_mut().downstream.take();
  if let Some(downstream) = downstream {
    downstream.on_completion(Completion::Failure(error));
  }
}

pub struct FlatMapOuter<S, F> {
  func: F,
  state: MutArc<FlatMapState<S>>,
  token: SharedCancellable,
}

impl<V, E, S, F, Q> Subscriber<V, E> for FlatMapOuter<S, F>
where
  F: FnMut(V) -> Q,
  Q: Publisher<Failure = E>,
  S: Subscriber<Q::Output, E> + Send + 'static,
{
  fn on_value(&mut self, value: V) {
    {
      let mut state = self.state.rc_deref_mut();
      if state.downstream.is_none() {
        return;
      }
      state.subscribed += 1;
    }
    let inner = (self.func)(value);
    let handle = inner.actual_subscribe(FlatMapInner { state: self.state.clone(), token: self.token.clone() });
    self.token.add(handle);
  }

  fn on_completion(self, completion: Completion<E>) {
    match completion {
      Completion::Finished => {
        let downstream = {
          let mut state = self.state.rc_deref_mut();
          state.outer_done = true;
          if state.subscribed == 0 { state.downstream.take() } else { None }
        };
        if let Some(downstream) = downstream {
          downstream.on_completion(Completion::Finished);
        }
      }
      Completion::Failure(error) => fail_all(&self.state, &self.token, error),
    }
  }

  fn is_closed(&self) -> bool { self.state.rc_deref().is_closed::<Q::Output, E>() }
}

pub struct FlatMapInner<S> {
  state: MutArc<FlatMapState<S>>,
  token: SharedCancellable,
}

impl<V, E, S> Subscriber<V, E> for FlatMapInner<S>
where
  S: Subscriber<V, E>,
{
  fn on_value(&mut self, value: V) {
    if let Some(downstream) = self.state.rc_deref_mut().downstream.as_mut() {
      downstream.on_value(value);
    }
  }

  fn on_completion(self, completion: Completion<E>) {
    match completion {
      Completion::Finished => {
        let downstream = {
          let mut state = self.state.rc_deref_mut();
          state.subscribed -= 1;
          if state.subscribed == 0 && state.outer_done { state.downstream.take() } else { None }
        };
        if let Some(downstream) = downstream {
          downstream.on_completion(Completion::Finished);
        }
      }
      Completion::Failure(error) => fail_all(&self.state, &self.token, error),
    }
  }

  fn is_closed(&self) -> bool { self.state.rc_deref().is_closed::<V, E>() }
}
