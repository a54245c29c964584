//! The producing side of a channel and the operator chaining API.
//!
//! A [`Publisher`] is a *description* of a production recipe; nothing runs
//! until it is subscribed. Subscribing consumes the description, so
//! subscribing twice means cloning it first, and every clone starts an
//! independent run. Subjects are the exception: clones are handles to one
//! shared multicast channel.

use std::{convert::Infallible, fmt::Debug};

use crate::{
  cancellable::{AnyCancellable, Cancellable},
  event::Completion,
  ops::{
    append::Append,
    combine_latest::CombineLatest,
    compact_map::CompactMap,
    delay::Delay,
    filter::Filter,
    flat_map::FlatMap,
    handle_events::{EventHooks, HandleEvents},
    map::Map,
    merge::Merge,
    prepend::Prepend,
    print::print_hooks,
    receive_on::ReceiveOn,
    remove_duplicates::RemoveDuplicates,
    replace_empty::ReplaceEmpty,
    set_failure_type::SetFailureType,
    subscribe_on::SubscribeOn,
    zip::Zip,
  },
  scheduler::{Duration, Scheduler},
  subscriber::{GuardCancellable, Guarded, Sink, Subscriber},
};

mod boxed;
mod empty;
mod fail;
mod from_iter;
mod just;

pub use boxed::{AnyPublisher, DynPublisher};
pub use empty::{empty, never, Empty};
pub use fail::{fail, Fail};
pub use from_iter::{from_iter, FromIter};
pub use just::{just, Just};

/// The core trait: anything that can be subscribed to.
///
/// Implementors provide [`Publisher::actual_subscribe`]; every operator is a
/// provided method that wraps `self` in a new publisher.
pub trait Publisher: Sized {
  type Output;
  type Failure;
  /// Handle returned by [`Publisher::actual_subscribe`].
  type Token: Cancellable + Send + 'static;

  /// Starts production towards `subscriber`.
  ///
  /// This is the raw protocol used between operators. Callers outside the
  /// crate should prefer [`Publisher::subscribe`] / [`Publisher::sink`],
  /// which also guarantee that nothing reaches the subscriber once its handle
  /// was cancelled.
  fn actual_subscribe<S>(self, subscriber: S) -> Self::Token
  where
    S: Subscriber<Self::Output, Self::Failure> + Send + 'static;

  // ==================== Subscribing ====================

  /// Subscribes `subscriber` and returns the handle that detaches it.
  fn subscribe<S>(self, subscriber: S) -> AnyCancellable
  where
    S: Subscriber<Self::Output, Self::Failure> + Send + 'static,
  {
    let (guarded, closed) = Guarded::new(subscriber);
    let upstream = self.actual_subscribe(guarded);
    AnyCancellable::new(GuardCancellable::new(closed, upstream))
  }

  /// Subscribes with a value callback and a completion callback.
  fn sink<N, C>(self, on_value: N, on_completion: C) -> AnyCancellable
  where
    N: FnMut(Self::Output) + Send + 'static,
    C: FnOnce(Completion<Self::Failure>) + Send + 'static,
  {
    self.subscribe(Sink::new(on_value, on_completion))
  }

  /// Subscribes with a value callback only. Available for channels that
  /// cannot fail.
  fn sink_value<N>(self, on_value: N) -> AnyCancellable
  where
    Self: Publisher<Failure = Infallible>,
    N: FnMut(Self::Output) + Send + 'static,
  {
    self.sink(on_value, |_| {})
  }

  // ==================== Stateless operators ====================

  /// Emits only the values for which `predicate` returns `true`.
  fn filter<F>(self, predicate: F) -> Filter<Self, F>
  where
    F: FnMut(&Self::Output) -> bool,
  {
    Filter::new(self, predicate)
  }

  /// Transforms every value with `f`.
  fn map<B, F>(self, f: F) -> Map<Self, F>
  where
    F: FnMut(Self::Output) -> B,
  {
    Map::new(self, f)
  }

  /// Transforms every value with `f` and drops the `None` results.
  fn compact_map<B, F>(self, f: F) -> CompactMap<Self, F>
  where
    F: FnMut(Self::Output) -> Option<B>,
  {
    CompactMap::new(self, f)
  }

  // ==================== Stateful operators ====================

  /// Drops a value equal to the previously emitted one.
  #[allow(clippy::type_complexity)]
  fn remove_duplicates(self) -> RemoveDuplicates<Self, fn(&Self::Output, &Self::Output) -> bool>
  where
    Self::Output: PartialEq + Clone,
  {
    RemoveDuplicates::new(self, <Self::Output as PartialEq>::eq)
  }

  /// Drops a value when `is_duplicate(previous, current)` returns `true`.
  fn remove_duplicates_by<F>(self, is_duplicate: F) -> RemoveDuplicates<Self, F>
  where
    Self::Output: Clone,
    F: FnMut(&Self::Output, &Self::Output) -> bool,
  {
    RemoveDuplicates::new(self, is_duplicate)
  }

  /// Emits `value` if the upstream finishes without emitting anything.
  fn replace_empty(self, value: Self::Output) -> ReplaceEmpty<Self, Self::Output> {
    ReplaceEmpty::new(self, value)
  }

  // ==================== Combining operators ====================

  /// Subscribes to `f(value)` for every upstream value and merges what the
  /// inner publishers emit.
  fn flat_map<Q, F>(self, f: F) -> FlatMap<Self, F>
  where
    F: FnMut(Self::Output) -> Q,
    Q: Publisher<Failure = Self::Failure>,
  {
    FlatMap::new(self, f)
  }

  /// Emits `items` before anything from upstream.
  fn prepend<I>(self, items: I) -> Prepend<Self, Self::Output>
  where
    I: IntoIterator<Item = Self::Output>,
  {
    Prepend::new(self, items.into_iter().collect())
  }

  /// Continues with `other` once upstream finished.
  fn append<Q>(self, other: Q) -> Append<Self, Q>
  where
    Q: Publisher<Output = Self::Output, Failure = Self::Failure>,
  {
    Append::new(self, other)
  }

  /// Interleaves the values of `self` and `other` in arrival order.
  fn merge<Q>(self, other: Q) -> Merge<Self, Q>
  where
    Q: Publisher<Output = Self::Output, Failure = Self::Failure>,
  {
    Merge::new(self, other)
  }

  /// Pairs the latest value of each side every time either side emits.
  fn combine_latest<Q>(self, other: Q) -> CombineLatest<Self, Q>
  where
    Q: Publisher<Failure = Self::Failure>,
  {
    CombineLatest::new(self, other)
  }

  /// Pairs values of both sides first-in first-out.
  fn zip<Q>(self, other: Q) -> Zip<Self, Q>
  where
    Q: Publisher<Failure = Self::Failure>,
  {
    Zip::new(self, other)
  }

  // ==================== Scheduling operators ====================

  /// Re-emits every event, terminal included, `duration` later on
  /// `scheduler`.
  fn delay<Sch>(self, duration: Duration, scheduler: Sch) -> Delay<Self, Sch>
  where
    Sch: Scheduler,
  {
    Delay::new(self, duration, scheduler)
  }

  /// Performs the upstream subscription on `scheduler`.
  fn subscribe_on<Sch>(self, scheduler: Sch) -> SubscribeOn<Self, Sch>
  where
    Sch: Scheduler,
  {
    SubscribeOn::new(self, scheduler)
  }

  /// Delivers every downstream event through `scheduler`.
  fn receive_on<Sch>(self, scheduler: Sch) -> ReceiveOn<Self, Sch>
  where
    Sch: Scheduler,
  {
    ReceiveOn::new(self, scheduler)
  }

  // ==================== Observation ====================

  /// Runs the side effects in `hooks` as events pass through unchanged.
  fn handle_events(self, hooks: EventHooks<Self::Output, Self::Failure>) -> HandleEvents<Self> {
    HandleEvents::new(self, hooks)
  }

  /// Logs every event through `tracing` at `info` level, prefixed with
  /// `label`.
  fn print(self, label: impl Into<String>) -> HandleEvents<Self>
  where
    Self::Output: Debug + 'static,
    Self::Failure: Debug + 'static,
  {
    let hooks = print_hooks(label.into(), |line: String| {
      tracing::info!(target: "rxsignal::print", "{line}")
    });
    HandleEvents::new(self, hooks)
  }

  /// Like [`Publisher::print`] but hands every line to `writer`.
  fn print_to<W>(self, label: impl Into<String>, writer: W) -> HandleEvents<Self>
  where
    Self::Output: Debug + 'static,
    Self::Failure: Debug + 'static,
    W: FnMut(String) + Send + 'static,
  {
    HandleEvents::new(self, print_hooks(label.into(), writer))
  }

  // ==================== Type plumbing ====================

  /// Widens a publisher that cannot fail to failure type `E`.
  fn set_failure_type<E>(self) -> SetFailureType<Self, E>
  where
    Self: Publisher<Failure = Infallible>,
  {
    SetFailureType::new(self)
  }

  /// Erases the concrete pipeline type.
  fn box_it(self) -> AnyPublisher<Self::Output, Self::Failure>
  where
    Self: Send + 'static,
    Self::Output: 'static,
    Self::Failure: 'static,
  {
    AnyPublisher::new(self)
  }
}
