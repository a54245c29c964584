use std::collections::VecDeque;

use crate::{
  cancellable::{Cancellable, SharedCancellable},
  event::Completion,
  publisher::Publisher,
  rc::MutArc,
  subscriber::Subscriber,
};

/// Pairs the n-th value of one side with the n-th value of the other.
///
/// Unmatched values wait in a per-side queue. The zipped stream finishes when
/// both sides finished; whatever is still queued then is discarded.
#[derive(Clone)]
pub struct Zip<A, B> {
  first: A,
  second: B,
}

impl<A, B> Zip<A, B> {
  pub(crate) fn new(first: A, second: B) -> Self { Zip { first, second } }
}

impl<A, B> Publisher for Zip<A, B>
where
  A: Publisher,
  B: Publisher<Failure = A::Failure>,
  A::Output: Send + 'static,
  B::Output: Send + 'static,
{
  type Output = (A::Output, B::Output);
  type Failure = A::Failure;
  type Token = SharedCancellable;

  fn actual_subscribe<S>(self, subscriber: S) -> Self::Token
  where
    S: Subscriber<Self::Output, Self::Failure> + Send + 'static,
  {
    let token = SharedCancellable::default();
    let state = MutArc::own(ZipState {
      downstream: Some(subscriber),
      left: VecDeque::new(),
      right: VecDeque::new(),
      done: [false, false],
    });
    let left = ZipLeft { state: state.clone(), token: token.clone() };
    token.add(self.first.actual_subscribe(left));
    if !token.is_closed() {
      let right = ZipRight { state, token: token.clone() };
      token.add(self.second.actual_subscribe(right));
    }
    token
  }
}

struct ZipState<S, VA, VB> {
  downstream: Option<S>,
  left: VecDeque<VA>,
  right: VecDeque<VB>,
  done: [bool; 2],
}

impl<S, VA, VB> ZipState<S, VA, VB> {
  /// Records that `side` finished; hands out the downstream once both did.
  fn finish(&mut self, side: usize) -> Option<S> {
    self.done[side] = true;
    if self.done == [true, true] {
      self.left.clear();
      self.right.clear();
      self.downstream.take()
    } else {
      None
    }
  }
}

fn complete_zip<S, VA, VB, E>(state: &MutArc<ZipState<S, VA, VB>>, token: &SharedCancellable, side: usize, completion: Completion<E>)
where
  S: Subscriber<(VA, VB), E>,
{
  let downstream = match &completion {
    Completion::Finished => state.rc_deref_mut().finish(side),
    Completion::Failure(_) => {
      token.cancel();
      let downstream = state.rc_deref_mut().downstream.take();
      downstream
    }
  };
  if let Some(downstream) = downstream {
    downstream.on_completion(completion);
  }
}

pub struct ZipLeft<S, VA, VB> {
  state: MutArc<ZipState<S, VA, VB>>,
  token: SharedCancellable,
}

pub struct ZipRight<S, VA, VB> {
  state: MutArc<ZipState<S, VA, VB>>,
  token: SharedCancellable,
}

impl<S, VA, VB, E> Subscriber<VA, E> for ZipLeft<S, VA, VB>
where
  S: Subscriber<(VA, VB), E>,
{
  fn on_value(&mut self, value: VA) {
    let mut state = self.state.rc_deref_mut();
    let state = &mut *state;
    let Some(downstream) = state.downstream.as_mut() else { return };
    match state.right.pop_front() {
      Some(other) => downstream.on_value((value, other)),
      None => state.left.push_back(value),
    }
  }

  fn on_completion(self, completion: Completion<E>) { complete_zip(&self.state, &self.token, 0, completion) }

  fn is_closed(&self) -> bool {
    self.state.rc_deref().downstream.as_ref().map_or(true, |d| d.is_closed())
  }
}

impl<S, VA, VB, E> Subscriber<VB, E> for ZipRight<S, VA, VB>
where
  S: Subscriber<(VA, VB), E>,
{
  fn on_value(&mut self, value: VB) {
    let mut state = self.state.rc_deref_mut();
    let state = &mut *state;
    let Some(downstream) = state.downstream.as_mut() else { return };
    match state.left.pop_front() {
      Some(other) => downstream.on_value((other, value)),
      None => state.right.push_back(value),
    }
  }

  fn on_completion(self, completion: Completion<E>) { complete_zip(&self.state, &self.token, 1, completion) }

  fn is_closed(&self) -> bool {
    self.state.rc_deref().downstream.as_ref().map_or(true, |d| d.is_closed())
  }
}
