//! Scheduler driven by a tokio runtime.

use tokio::{
  runtime::Handle,
  sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
  time::{sleep_until, Instant as TokioInstant},
};
use tracing::debug;

use super::{Duration, Instant, Scheduler, Task, TaskHandle, TimerQueue};
use crate::error::SchedulerError;

struct Job {
  fire_at: Instant,
  task: Task,
  handle: TaskHandle,
}

/// Runs tasks on a single driver task spawned on a tokio runtime.
///
/// The driver owns the timer heap, so tasks of one scheduler never run
/// concurrently even on a multi-thread runtime. Once every clone of the
/// scheduler is dropped, the driver finishes the tasks still pending and
/// stops.
#[derive(Clone)]
pub struct TokioScheduler {
  jobs: UnboundedSender<Job>,
}

impl TokioScheduler {
  /// Spawns the driver on `handle`.
  pub fn new(handle: &Handle) -> Self {
    let (jobs, rx) = mpsc::unbounded_channel();
    handle.spawn(drive(rx));
    TokioScheduler { jobs }
  }

  /// Spawns the driver on the runtime of the calling thread.
  pub fn current() -> Result<Self, SchedulerError> {
    let handle = Handle::try_current().map_err(|_| SchedulerError::NoRuntime)?;
    Ok(Self::new(&handle))
  }
}

impl Scheduler for TokioScheduler {
  fn schedule<F>(&self, task: F, delay: Option<Duration>) -> TaskHandle
  where
    F: FnOnce() + Send + 'static,
  {
    let handle = TaskHandle::default();
    let job = Job {
      fire_at: Instant::now() + delay.unwrap_or_default(),
      task: Box::new(task),
      handle: handle.clone(),
    };
    if self.jobs.send(job).is_err() {
      debug!("tokio scheduler driver is gone, task dropped");
    }
    handle
  }

  fn now(&self) -> Instant { Instant::now() }
}

async fn drive(mut rx: UnboundedReceiver<Job>) {
  let mut timers = TimerQueue::default();
  let mut open = true;
  loop {
    while let Some(entry) = timers.pop_due(Instant::now()) {
      entry.run();
    }

    let deadline = timers.next_deadline();
    if !open && deadline.is_none() {
      break;
    }
    let wake_at = TokioInstant::from_std(deadline.unwrap_or_else(Instant::now));
    tokio::select! {
      job = rx.recv(), if open => match job {
        Some(Job { fire_at, task, handle }) => timers.push(fire_at, task, handle),
        None => open = false,
      },
      _ = sleep_until(wake_at), if deadline.is_some() => {}
    }
  }
  debug!("tokio scheduler driver stopped");
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use parking_lot::Mutex;

  use super::*;

  #[rxsignal_macro::test(shared)]
  async fn orders_by_fire_time() {
    let scheduler = TokioScheduler::current().unwrap();
    let log = Arc::new(Mutex::new(vec![]));
    let (done_tx, done_rx) = tokio::sync::oneshot::channel();

    let c_log = log.clone();
    scheduler.schedule(
      move || {
        c_log.lock().push(2);
        let _ = done_tx.send(());
      },
      Some(Duration::from_millis(20)),
    );
    let c_log = log.clone();
    scheduler.schedule(move || c_log.lock().push(1), None);

    done_rx.await.unwrap();
    assert_eq!(*log.lock(), vec![1, 2]);
  }

  #[rxsignal_macro::test(shared)]
  async fn pending_tasks_outlive_the_last_handle() {
    let scheduler = TokioScheduler::current().unwrap();
    let (done_tx, done_rx) = tokio::sync::oneshot::channel();
    scheduler.schedule(
      move || {
        let _ = done_tx.send(());
      },
      Some(Duration::from_millis(20)),
    );
    drop(scheduler);

    done_rx.await.unwrap();
  }

  #[rxsignal_macro::test]
  fn current_outside_runtime_fails() {
    assert!(matches!(TokioScheduler::current(), Err(SchedulerError::NoRuntime)));
  }
}
