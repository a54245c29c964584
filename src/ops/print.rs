use std::{fmt::Debug, sync::Arc};

use super::handle_events::EventHooks;
use crate::{event::Completion, rc::MutArc};

/// Formats events as `"<label>: receive value: (1)"` lines and hands them to
/// a writer. An empty label drops the `"<label>: "` prefix.
struct Printer<W> {
  prefix: Arc<str>,
  writer: MutArc<W>,
}

impl<W> Clone for Printer<W> {
  fn clone(&self) -> Self { Printer { prefix: self.prefix.clone(), writer: self.writer.clone() } }
}

impl<W: FnMut(String)> Printer<W> {
  fn line(&self, event: std::fmt::Arguments<'_>) {
    let line = format!("{}{}", self.prefix, event);
    let mut writer = self.writer.rc_deref_mut();
    (*writer)(line);
  }
}

pub(crate) fn print_hooks<V, E, W>(label: String, writer: W) -> EventHooks<V, E>
where
  V: Debug + 'static,
  E: Debug + 'static,
  W: FnMut(String) + Send + 'static,
{
  let prefix: Arc<str> = if label.is_empty() { Arc::from("") } else { Arc::from(format!("{label}: ")) };
  let printer = Printer { prefix, writer: MutArc::own(writer) };
  let (on_subscribe, on_value, on_completion, on_cancel) =
    (printer.clone(), printer.clone(), printer.clone(), printer);

  EventHooks::new()
    .on_subscribe(move || on_subscribe.line(format_args!("receive subscription")))
    .on_value(move |value| on_value.line(format_args!("receive value: ({value:?})")))
    .on_completion(move |completion| match completion {
      Completion::Finished => on_completion.line(format_args!("receive finished")),
      Completion::Failure(error) => on_completion.line(format_args!("receive error: ({error:?})")),
    })
    .on_cancel(move || on_cancel.line(format_args!("receive cancel")))
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use parking_lot::Mutex;

  use crate::prelude::*;

  fn collect(lines: &Arc<Mutex<Vec<String>>>) -> impl FnMut(String) + Send + 'static {
    let lines = lines.clone();
    move |line| lines.lock().push(line)
  }

  #[rxsignal_macro::test]
  fn prints_a_finite_run() {
    let lines = Arc::new(Mutex::new(vec![]));
    from_iter([1, 2]).print_to("numbers", collect(&lines)).sink_value(|_| {});
    assert_eq!(*lines.lock(), vec![
      "numbers: receive subscription",
      "numbers: receive value: (1)",
      "numbers: receive value: (2)",
      "numbers: receive finished",
    ]);
  }

  #[rxsignal_macro::test]
  fn prints_failure_and_cancel_without_label() {
    let lines = Arc::new(Mutex::new(vec![]));
    fail::<i32, _>("oops").print_to("", collect(&lines)).sink(|_| {}, |_| {});
    assert_eq!(*lines.lock(), vec!["receive subscription", "receive error: (\"oops\")"]);

    lines.lock().clear();
    let token = never::<i32, ()>().print_to("idle", collect(&lines)).sink(|_| {}, |_| {});
    token.cancel();
    assert_eq!(*lines.lock(), vec!["idle: receive subscription", "idle: receive cancel"]);
  }

  #[rxsignal_macro::test]
  fn print_goes_through_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().with_env_filter("rxsignal=info").try_init();
    let log = crate::test_util::EventLog::<i32, Infallible>::new();
    just(5).print("traced").subscribe(log.subscriber());
    assert_eq!(log.values(), vec![5]);
  }
}
