//! Prelude module for convenient imports.

pub use std::convert::Infallible;

#[cfg(feature = "tokio-scheduler")]
pub use crate::scheduler::TokioScheduler;
pub use crate::{
  cancellable::{AnyCancellable, CancelBag, CancelGuard, Cancellable, SharedCancellable},
  error::SchedulerError,
  event::{Completion, Event},
  ops::handle_events::EventHooks,
  publisher::{empty, fail, from_iter, just, never, AnyPublisher, Publisher},
  scheduler::{
    Duration, ImmediateScheduler, Instant, QueueScheduler, Scheduler, TaskHandle, TestScheduler,
  },
  subject::{CurrentValueSubject, PassthroughSubject, SubjectStatus},
  subscriber::{BoxSubscriber, Sink, Subscriber},
};
