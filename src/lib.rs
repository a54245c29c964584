//! # rxsignal: a small reactive stream runtime
//!
//! Producers emit values followed by at most one terminal event; operators
//! compose into pipelines; subscribers consume and hold a cancellation
//! handle. Everything is thread-safe, and crossing execution contexts is done
//! with explicit [`Scheduler`](scheduler::Scheduler) values.
//!
//! ## Quick Start
//!
//! ```rust
//! use rxsignal::prelude::*;
//!
//! let bag = CancelBag::new();
//! from_iter(0..10)
//!   .filter(|v| v % 2 == 0)
//!   .map(|v| v * 2)
//!   .sink_value(|v| println!("Value: {v}"))
//!   .store(&bag);
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Publisher`] | Description of a stream; every operator is a method on it |
//! | [`Subscriber`] | Consumes `on_value` and one `on_completion` |
//! | [`Cancellable`] | Handle that detaches a subscription |
//! | [`PassthroughSubject`] / [`CurrentValueSubject`] | Multicast channels driven from outside |
//! | [`Scheduler`] | Where and when `delay`, `subscribe_on` and `receive_on` run work |
//!
//! ## Feature Flags
//!
//! - **`tokio-scheduler`**: a [`TokioScheduler`](scheduler::TokioScheduler)
//!   driven by a tokio runtime.
//!
//! [`Publisher`]: publisher::Publisher
//! [`Subscriber`]: subscriber::Subscriber
//! [`Cancellable`]: cancellable::Cancellable
//! [`PassthroughSubject`]: subject::PassthroughSubject
//! [`CurrentValueSubject`]: subject::CurrentValueSubject
//! [`Scheduler`]: scheduler::Scheduler

pub mod cancellable;
pub mod error;
pub mod event;
pub mod ops;
pub mod prelude;
pub mod publisher;
pub mod rc;
pub mod scheduler;
pub mod subject;
pub mod subscriber;
#[cfg(test)]
mod test_util;

pub use prelude::*;

#[cfg(doctest)]
mod __markdown_doctests {
  mod readme {
    #![doc = include_str!("../README.md")]
  }
}
