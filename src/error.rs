use std::io;

use thiserror::Error;

/// Failures raised while constructing a scheduler.
///
/// Stream failures never use this type; they travel as
/// [`Completion::Failure`](crate::event::Completion::Failure).
#[derive(Debug, Error)]
pub enum SchedulerError {
  #[error("failed to spawn scheduler worker `{name}`")]
  Spawn {
    name: String,
    #[source]
    source: io::Error,
  },

  #[error("no tokio runtime is running on this thread")]
  NoRuntime,
}
