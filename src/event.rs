//! The events that travel through a pipeline.

/// How a subscription ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Completion<E> {
  Finished,
  Failure(E),
}

impl<E> Completion<E> {
  #[inline]
  pub fn is_finished(&self) -> bool { matches!(self, Completion::Finished) }

  #[inline]
  pub fn is_failure(&self) -> bool { matches!(self, Completion::Failure(_)) }

  pub fn map_failure<F, E2>(self, f: F) -> Completion<E2>
  where
    F: FnOnce(E) -> E2,
  {
    match self {
      Completion::Finished => Completion::Finished,
      Completion::Failure(e) => Completion::Failure(f(e)),
    }
  }

  pub fn into_result(self) -> Result<(), E> {
    match self {
      Completion::Finished => Ok(()),
      Completion::Failure(e) => Err(e),
    }
  }
}

/// One signal on a channel: any number of `Value`s followed by at most one of
/// `Completed` / `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Event<V, E> {
  Value(V),
  Completed,
  Failed(E),
}

impl<V, E> Event<V, E> {
  #[inline]
  pub fn is_terminal(&self) -> bool { !matches!(self, Event::Value(_)) }
}

impl<V, E> From<Completion<E>> for Event<V, E> {
  fn from(completion: Completion<E>) -> Self {
    match completion {
      Completion::Finished => Event::Completed,
      Completion::Failure(e) => Event::Failed(e),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[rxsignal_macro::test]
  fn completion_into_event() {
    let done: Event<i32, &str> = Completion::Finished.into();
    assert_eq!(done, Event::Completed);
    assert!(done.is_terminal());

    let failed: Event<i32, &str> = Completion::Failure("boom").into();
    assert_eq!(failed, Event::Failed("boom"));
    assert!(!Event::<i32, &str>::Value(1).is_terminal());
  }

  #[rxsignal_macro::test]
  fn completion_helpers() {
    let c: Completion<i32> = Completion::Failure(2);
    assert!(c.is_failure());
    assert_eq!(c.map_failure(|e| e * 10), Completion::Failure(20));
    assert_eq!(Completion::<i32>::Finished.into_result(), Ok(()));
  }
}
