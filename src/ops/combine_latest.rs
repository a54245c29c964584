use crate::{
  cancellable::{Cancellable, SharedCancellable},
  event::Completion,
  publisher::Publisher,
  rc::MutArc,
  subscriber::Subscriber,
};

/// Emits the pair of latest values every time either side emits, once both
/// sides have emitted at least once.
#[derive(Clone)]
pub struct CombineLatest<A, B> {
  first: A,
  second: B,
}

impl<A, B> CombineLatest<A, B> {
  pub(crate) fn new(first: A, second: B) -> Self { CombineLatest { first, second } }
}

impl<A, B> Publisher for CombineLatest<A, B>
where
  A: Publisher,
  B: Publisher<Failure = A::Failure>,
  A::Output: Clone + Send + 'static,
  B::Output: Clone + Send + 'static,
{
  type Output = (A::Output, B::Output);
  type Failure = A::Failure;
  type Token = SharedCancellable;

  fn actual_subscribe<S>(self, subscriber: S) -> Self::Token
  where
    S: Subscriber<Self::Output, Self::Failure> + Send + 'static,
  {
    let token = SharedCancellable::default();
    let state = MutArc::own(CombineState {
      downstream: Some(subscriber),
      latest_left: None,
      latest_right: None,
      done: [false, false],
    });
    let left = CombineLeft { state: state.clone(), token: token.clone() };
    token.add(self.first.actual_subscribe(left));
    if !token.is_closed() {
      let right = CombineRight { state, token: token.clone() };
      token.add(self.second.actual_subscribe(right));
    }
    token
  }
}

struct CombineState<S, VA, VB> {
  downstream: Option<S>,
  latest_left: Option<VA>,
  latest_right: Option<VB>,
  done: [bool; 2],
}

impl<S, VA: Clone, VB: Clone> CombineState<S, VA, VB> {
  fn emit<E>(&mut self)
  where
    S: Subscriber<(VA, VB), E>,
  {
    if let (Some(downstream), Some(left), Some(right)) =
      (self.downstream.as_mut(), self.latest_left.as_ref(), self.latest_right.as_ref())
    {
      downstream.on_value((left.clone(), right.clone()));
    }
  }
}

fn complete_combine<S, VA, VB, E>(
  state: &MutArc<CombineState<S, VA, VB>>, token: &SharedCancellable, side: usize, completion: Completion<E>,
) where
  S: Subscriber<(VA, VB), E>,
{
  let downstream = match &completion {
    Completion::Finished => {
      let mut state = state.rc_deref_mut();
      state.done[side] = true;
      if state.done == [true, true] { state.downstream.take() } else { None }
    }
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

pub struct CombineLeft<S, VA, VB> {
  state: MutArc<CombineState<S, VA, VB>>,
  token: SharedCancellable,
}

pub struct CombineRight<S, VA, VB> {
  state: MutArc<CombineState<S, VA, VB>>,
  token: SharedCancellable,
}

impl<S, VA, VB, E> Subscriber<VA, E> for CombineLeft<S, VA, VB>
where
  S: Subscriber<(VA, VB), E>,
  VA: Clone,
  VB: Clone,
{
  fn on_value(&mut self, value: VA) {
    let mut state = self.state.rc_deref_mut();
    state.latest_left = Some(value);
    state.emit::<E>();
  }

  fn on_completion(self, completion: Completion<E>) {
    complete_combine(&self.state, &self.token, 0, completion)
  }

  fn is_closed(&self) -> bool {
    self.state.rc_deref().downstream.as_ref().map_or(true, |d| d.is_closed())
  }
}

impl<S, VA, VB, E> Subscriber<VB, E> for CombineRight<S, VA, VB>
where
  S: Subscriber<(VA, VB), E>,
  VA: Clone,
  VB: Clone,
{
  fn on_value(&mut self, value: VB) {
    let mut state = self.state.rc_deref_mut();
    state.latest_right = Some(value);
    state.emit::<E>();
  }

  fn on_completion(self, completion: Completion<E>) {
    complete_combine(&self.state, &self.token, 1, completion)
  }

  fn is_closed(&self) -> bool {
    self.state.rc_deref().downstream.as_ref().map_or(true, |d| d.is_closed())
  }
}
