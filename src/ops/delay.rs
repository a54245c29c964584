use super::receive_on::ScheduledSubscriber;
use crate::{
  cancellable::{SharedCancellable, TupleCancellable},
  publisher::Publisher,
  scheduler::{Duration, Scheduler},
  subscriber::Subscriber,
};

/// Shifts every event, the terminal one included, `delay` later in time.
///
/// Relative order is preserved. Cancelling suppresses every event that has
/// not fired yet.
#[derive(Clone)]
pub struct Delay<P, Sch> {
  source: P,
  delay: Duration,
  scheduler: Sch,
}

impl<P, Sch> Delay<P, Sch> {
  pub(crate) fn new(source: P, delay: Duration, scheduler: Sch) -> Self { Delay { source, delay, scheduler } }
}

impl<P, Sch> Publisher for Delay<P, Sch>
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
    let delayed = ScheduledSubscriber::new(subscriber, self.scheduler, Some(self.delay), pending.clone());
    TupleCancellable::new(self.source.actual_subscribe(delayed), pending)
  }
}

#[cfg(test)]
mod tests {
  use crate::{prelude::*, test_util::EventLog};

  #[rxsignal_macro::test]
  fn shifts_every_event() {
    let scheduler = TestScheduler::new();
    let log = EventLog::<i32, Infallible>::new();
    from_iter([1, 2, 3]).delay(Duration::from_millis(50), scheduler.clone()).subscribe(log.subscriber());

    scheduler.advance_by(Duration::from_millis(49));
    assert_eq!(log.len(), 0);
    scheduler.advance_by(Duration::from_millis(1));
    assert_eq!(log.events(), vec![Event::Value(1), Event::Value(2), Event::Value(3), Event::Completed]);
  }

  #[rxsignal_macro::test]
  fn keeps_relative_spacing() {
    let scheduler = TestScheduler::new();
    let subject = PassthroughSubject::<&str>::new();
    let log = EventLog::new();
    subject.clone().delay(Duration::from_millis(10), scheduler.clone()).subscribe(log.subscriber());

    subject.send("a");
    scheduler.advance_by(Duration::from_millis(5));
    subject.send("b");
    scheduler.advance_by(Duration::from_millis(5));
    assert_eq!(log.values(), vec!["a"]);
    scheduler.advance_by(Duration::from_millis(5));
    assert_eq!(log.values(), vec!["a", "b"]);
  }

  #[rxsignal_macro::test]
  fn cancel_before_firing_suppresses_everything() {
    let scheduler = TestScheduler::new();
    let log = EventLog::<i32, Infallible>::new();
    let token =
      from_iter([1, 2, 3]).delay(Duration::from_millis(10), scheduler.clone()).subscribe(log.subscriber());
    token.cancel();
    token.cancel();
    scheduler.flush();
    assert_eq!(log.len(), 0);
  }

  #[rxsignal_macro::test]
  fn failure_is_delayed_too() {
    let scheduler = TestScheduler::new();
    let log = EventLog::<i32, &str>::new();
    fail("late").delay(Duration::from_secs(1), scheduler.clone()).subscribe(log.subscriber());
    assert_eq!(log.len(), 0);
    scheduler.advance_by(Duration::from_secs(1));
    assert_eq!(log.events(), vec![Event::Failed("late")]);
  }

  #[rxsignal_macro::test]
  fn queue_scheduler_handed_over_by_value() {
    let (tx, rx) = std::sync::mpsc::channel::<Event<i32, Infallible>>();
    let c_tx = tx.clone();
    let started = Instant::now();
    let _token = from_iter([1, 2, 3])
      .delay(Duration::from_millis(20), QueueScheduler::new().unwrap())
      .sink(move |v| c_tx.send(Event::Value(v)).unwrap(), move |c| tx.send(c.into()).unwrap());

    let got: Vec<_> = (0..4).map(|_| rx.recv_timeout(Duration::from_secs(2)).unwrap()).collect();
    assert_eq!(got, vec![Event::Value(1), Event::Value(2), Event::Value(3), Event::Completed]);
    assert!(started.elapsed() >= Duration::from_millis(20));
  }
}
