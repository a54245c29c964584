//! Recording helpers shared by the unit tests.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::{
  event::{Completion, Event},
  subscriber::Subscriber,
};

/// Collects every event a pipeline delivers, in order.
pub(crate) struct EventLog<V, E>(Arc<Mutex<Vec<Event<V, E>>>>);

impl<V, E> Clone for EventLog<V, E> {
  fn clone(&self) -> Self { EventLog(self.0.clone()) }
}

impl<V, E> EventLog<V, E> {
  pub(crate) fn new() -> Self { EventLog(Arc::new(Mutex::new(vec![]))) }

  pub(crate) fn subscriber(&self) -> LogSubscriber<V, E> { LogSubscriber(self.0.clone()) }

  pub(crate) fn events(&self) -> Vec<Event<V, E>>
  where
    V: Clone,
    E: Clone,
  {
    self.0.lock().clone()
  }

  pub(crate) fn values(&self) -> Vec<V>
  where
    V: Clone,
  {
    self
      .0
      .lock()
      .iter()
      .filter_map(|e| match e {
        Event::Value(v) => Some(v.clone()),
        _ => None,
      })
      .collect()
  }

  pub(crate) fn is_terminated(&self) -> bool { self.0.lock().last().is_some_and(Event::is_terminal) }

  pub(crate) fn len(&self) -> usize { self.0.lock().len() }
}

pub(crate) struct LogSubscriber<V, E>(Arc<Mutex<Vec<Event<V, E>>>>);

impl<V, E> Subscriber<V, E> for LogSubscriber<V, E> {
  fn on_value(&mut self, value: V) { self.0.lock().push(Event::Value(value)) }

  fn on_completion(self, completion: Completion<E>) { self.0.lock().push(completion.into()) }

  fn is_closed(&self) -> bool { false }
}
