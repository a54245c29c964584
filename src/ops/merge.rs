use crate::{
  cancellable::{Cancellable, SharedCancellable},
  event::Completion,
  publisher::Publisher,
  rc::MutArc,
  subscriber::Subscriber,
};

/// Interleaves two publishers of the same type by arrival order.
///
/// Finishes once both sides finished; the first failure from either side
/// cancels the other and is forwarded.
///
/// ```
/// use rxsignal::prelude::*;
///
/// let numbers = PassthroughSubject::<i32>::new();
/// let even = numbers.clone().filter(|v| v % 2 == 0);
/// let odd = numbers.clone().filter(|v| v % 2 != 0);
///
/// let _token = even.merge(odd).sink_value(|v| println!("{v}"));
/// numbers.send(1);
/// ```
#[derive(Clone)]
pub struct Merge<A, B> {
  first: A,
  second: B,
}

impl<A, B> Merge<A, B> {
  pub(crate) fn new(first: A, second: B) -> Self { Merge { first, second } }
}

impl<A, B> Publisher for Merge<A, B>
where
  A: Publisher,
  B: Publisher<Output = A::Output, Failure = A::Failure>,
{
  type Output = A::Output;
  type Failure = A::Failure;
  type Token = SharedCancellable;

  fn actual_subscribe<S>(self, subscriber: S) -> Self::Token
  where
    S: Subscriber<Self::Output, Self::Failure> + Send + 'static,
  {
    let token = SharedCancellable::default();
    let merge = MergeSubscriber {
      state: MutArc::own(MergeState { downstream: Some(subscriber), live: 2 }),
      token: token.clone(),
    };
    token.add(self.first.actual_subscribe(merge.clone()));
    if !token.is_closed() {
      token.add(self.second.actual_subscribe(merge));
    }
    token
  }
}

struct MergeState<S> {
  downstream: Option<S>,
  live: usize,
}

pub struct MergeSubscriber<S> {
  state: MutArc<MergeState<S>>,
  token: SharedCancellable,
}

impl<S> Clone for MergeSubscriber<S> {
  fn clone(&self) -> Self { MergeSubscriber { state: self.state.clone(), token: self.token.clone() } }
}

impl<V, E, S> Subscriber<V, E> for MergeSubscriber<S>
where
  S: Subscriber<V, E>,
{
  fn on_value(&mut self, value: V) {
    if let Some(downstream) = self.state.rc_deref_mut().downstream.as_mut() {
      downstream.on_value(value);
    }
  }

  fn on_completion(self, completion: Completion<E>) {
    let downstream = match &completion {
      Completion::Finished => {
        let mut state = self.state.rc_deref_mut();
        state.live -= 1;
        if state.live == 0 { state.downstream.take() } else { None }
      }
      Completion::Failure(_) => {
        self.token.cancel();
        let downstream = self.state.rc_deref_mut().downstream.take();
        downstream
      }
    };
    if let Some(downstream) = downstream {
      downstream.on_completion(completion);
    }
  }

  fn is_closed(&self) -> bool {
    self.state.rc_deref().downstream.as_ref().map_or(true, |d| d.is_closed())
  }
}
