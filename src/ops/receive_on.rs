use crate::{
  cancellable::{Cancellable, SharedCancellable, TupleCancellable},
  event::Completion,
  publisher::Publisher,
  rc::MutArc,
  scheduler::{Duration, Scheduler},
  subscriber::Subscriber,
};

/// Delivers every event through `scheduler`, whatever context produced it.
///
/// Each event becomes one task; a scheduler runs the tasks of one instance in
/// order, so the downstream sees events in production order.
#[derive(Clone)]
pub struct ReceiveOn<P, Sch> {
  source: P,
  scheduler: Sch,
}

impl<P, Sch> ReceiveOn<P, Sch> {
  pub(crate) fn new(source: P, scheduler: Sch) -> Self { ReceiveOn { source, scheduler } }
}

impl<P, Sch> Publisher for ReceiveOn<P, Sch>
where
  P: Publisher,
  P::Output: Send + 'static,
  P::Failure: Send + 'static,
  Sch: Scheduler,
{
  type Output = P::Output;
  type Failure = P::Failure;
  type Token = TupleCancellable<P::Token, SharedCancellable>;

  fn actual_subscribe<S>(self, subscriber: S) -> Self::Token
  where
    S: Subscriber<Self::Output, Self::Failure> + Send + 'static,
  {
    let pending = SharedCancellable::default();
    let scheduled = ScheduledSubscriber::new(subscriber, self.scheduler, None, pending.clone());
    TupleCancellable::new(self.source.actual_subscribe(scheduled), pending)
  }
}

/// Re-issues every event as a task on a scheduler, optionally after a delay.
///
/// Outstanding task handles live in `pending`, so cancelling it drops every
/// event that has not been delivered yet.
pub struct ScheduledSubscriber<S, Sch> {
  downstream: MutArc<Option<S>>,
  scheduler: Sch,
  delay: Option<Duration>,
  pending: SharedCancellable,
}

impl<S, Sch> ScheduledSubscriber<S, Sch> {
  pub(crate) fn new(downstream: S, scheduler: Sch, delay: Option<Duration>, pending: SharedCancellable) -> Self {
    ScheduledSubscriber { downstream: MutArc::own(Some(downstream)), scheduler, delay, pending }
  }
}

impl<V, E, S, Sch> Subscriber<V, E> for ScheduledSubscriber<S, Sch>
where
  S: Subscriber<V, E> + Send + 'static,
  V: Send + 'static,
  E: Send + 'static,
  Sch: Scheduler,
{
  fn on_value(&mut self, value: V) {
    if self.pending.is_closed() {
      return;
    }
    let mut downstream = self.downstream.clone();
    let task = self
      .scheduler
      .schedule(move || Subscriber::<V, E>::on_value(&mut downstream, value), self.delay);
    self.pending.add(task);
  }

  fn on_completion(self, completion: Completion<E>) {
    if self.pending.is_closed() {
      return;
    }
    let downstream = self.downstream;
    let task = self
      .scheduler
      .schedule(move || Subscriber::<V, E>::on_completion(downstream, completion), self.delay);
    self.pending.add(task);
  }

  fn is_closed(&self) -> bool { self.pending.is_closed() || Subscriber::<V, E>::is_closed(&self.downstream) }
}

#[cfg(test)]
mod tests {
  use std::{sync::Arc, thread};

  use parking_lot::Mutex;

  use crate::{prelude::*, test_util::EventLog};

  #[rxsignal_macro::test]
  fn events_wait_for_the_scheduler() {
    let scheduler = TestScheduler::new();
    let log = EventLog::<i32, Infallible>::new();
    from_iter([1, 2]).receive_on(scheduler.clone()).subscribe(log.subscriber());

    assert_eq!(log.len(), 0);
    scheduler.flush();
    assert_eq!(log.events(), vec![Event::Value(1), Event::Value(2), Event::Completed]);
  }

  #[rxsignal_macro::test]
  fn long_backlog_is_delivered() {
    let scheduler = TestScheduler::new();
    let log = EventLog::<i32, Infallible>::new();
    from_iter(0..50_000).receive_on(scheduler.clone()).subscribe(log.subscriber());

    assert_eq!(scheduler.pending_count(), 50_001);
    scheduler.flush();
    assert_eq!(log.len(), 50_001);
    assert_eq!(log.values().last(), Some(&49_999));
  }

  #[rxsignal_macro::test]
  fn cancel_drops_queued_events() {
    let scheduler = TestScheduler::new();
    let log = EventLog::<i32, Infallible>::new();
    let token = from_iter([1, 2, 3]).receive_on(scheduler.clone()).subscribe(log.subscriber());
    token.cancel();
    scheduler.flush();
    assert_eq!(log.len(), 0);
  }

  #[rxsignal_macro::test]
  fn delivers_on_the_queue_worker_in_order() {
    let scheduler = QueueScheduler::builder().name("receive-on-test").build().unwrap();
    let seen = Arc::new(Mutex::new(vec![]));
    let (done_tx, done_rx) = std::sync::mpsc::channel();
    let c_seen = seen.clone();
    let _token = from_iter(0..50).receive_on(scheduler.clone()).sink(
      move |v| c_seen.lock().push((v, thread::current().name().map(str::to_owned))),
      move |_| done_tx.send(()).unwrap(),
    );

    done_rx.recv().unwrap();
    let seen = seen.lock();
    assert_eq!(seen.iter().map(|(v, _)| *v).collect::<Vec<_>>(), (0..50).collect::<Vec<_>>());
    assert!(seen.iter().all(|(_, name)| name.as_deref() == Some("receive-on-test")));
  }
}
