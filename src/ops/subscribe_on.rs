use crate::{
  cancellable::SharedCancellable,
  publisher::Publisher,
  scheduler::Scheduler,
  subscriber::Subscriber,
};

/// Runs the upstream subscription itself as a task on `scheduler`.
///
/// For synchronous sources this moves production onto the scheduler as well.
/// Events produced later by asynchronous sources keep their own context.
#[derive(Clone)]
pub struct SubscribeOn<P, Sch> {
  source: P,
  scheduler: Sch,
}

impl<P, Sch> SubscribeOn<P, Sch> {
  pub(crate) fn new(source: P, scheduler: Sch) -> Self { SubscribeOn { source, scheduler } }
}

impl<P, Sch> Publisher for SubscribeOn<P, Sch>
where
  P: Publisher + Send + 'static,
  Sch: Scheduler,
{
  type Output = P::Output;
  type Failure = P::Failure;
  type Token = SharedCancellable;

  fn actual_subscribe<S>(self, subscriber: S) -> Self::Token
  where
    S: Subscriber<Self::Output, Self::Failure> + Send + 'static,
  {
    let token = SharedCancellable::default();
    let c_token = token.clone();
    let source = self.source;
    let task = self.scheduler.schedule(
      move || {
        let upstream = source.actual_subscribe(subscriber);
        c_token.add(upstream);
      },
      None,
    );
    token.add(task);
    token
  }
}

#[cfg(test)]
mod tests {
  use std::{sync::Arc, thread};

  use parking_lot::Mutex;

  use crate::{prelude::*, test_util::EventLog};

  #[rxsignal_macro::test]
  fn subscription_waits_for_the_scheduler() {
    let scheduler = TestScheduler::new();
    let subject = PassthroughSubject::<i32>::new();
    let log = EventLog::new();
    subject.clone().subscribe_on(scheduler.clone()).subscribe(log.subscriber());

    assert_eq!(subject.subscriber_count(), 0);
    subject.send(1);
    scheduler.flush();
    assert_eq!(subject.subscriber_count(), 1);
    subject.send(2);
    assert_eq!(log.values(), vec![2]);
  }

  #[rxsignal_macro::test]
  fn cancel_before_the_task_runs() {
    let scheduler = TestScheduler::new();
    let subject = PassthroughSubject::<i32>::new();
    let token = subject.clone().subscribe_on(scheduler.clone()).sink_value(|_| {});
    token.cancel();
    scheduler.flush();
    assert_eq!(subject.subscriber_count(), 0);
  }

  #[rxsignal_macro::test]
  fn cancel_after_the_task_ran() {
    let scheduler = TestScheduler::new();
    let subject = PassthroughSubject::<i32>::new();
    let token = subject.clone().subscribe_on(scheduler.clone()).sink_value(|_| {});
    scheduler.flush();
    assert_eq!(subject.subscriber_count(), 1);
    token.cancel();
    assert_eq!(subject.subscriber_count(), 0);
  }

  #[rxsignal_macro::test]
  fn synchronous_source_produces_on_the_worker() {
    let scheduler = QueueScheduler::builder().name("subscribe-on-test").build().unwrap();
    let threads = Arc::new(Mutex::new(vec![]));
    let (done_tx, done_rx) = std::sync::mpsc::channel();
    let c_threads = threads.clone();
    let _token = from_iter([1, 2, 3]).subscribe_on(scheduler.clone()).sink(
      move |_| c_threads.lock().push(thread::current().name().map(str::to_owned)),
      move |_| done_tx.send(()).unwrap(),
    );

    done_rx.recv().unwrap();
    let threads = threads.lock();
    assert_eq!(threads.len(), 3);
    assert!(threads.iter().all(|name| name.as_deref() == Some("subscribe-on-test")));
  }
}
