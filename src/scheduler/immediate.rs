use super::{Duration, Instant, Scheduler, TaskHandle};

/// Runs every task synchronously on the calling thread.
///
/// A requested delay is ignored: the task still runs before `schedule`
/// returns.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImmediateScheduler;

impl Scheduler for ImmediateScheduler {
  fn schedule<F>(&self, task: F, _delay: Option<Duration>) -> TaskHandle
  where
    F: FnOnce() + Send + 'static,
  {
    let handle = TaskHandle::default();
    handle.run(Box::new(task));
    handle
  }

  fn now(&self) -> Instant { Instant::now() }
}
