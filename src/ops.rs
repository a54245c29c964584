//! Operator publishers. Each is built by a provided method on
//! [`Publisher`](crate::publisher::Publisher).

/// Implements `on_completion` and `is_closed` by handing off to `$field`.
macro_rules! forward_terminal {
  ($field:ident, $err:ty) => {
    #[inline]
    fn on_completion(self, completion: $crate::event::Completion<$err>) { self.$field.on_completion(completion) }

    #[inline]
    fn is_closed(&self) -> bool { self.$field.is_closed() }
  };
}

pub mod append;
pub mod combine_latest;
pub mod compact_map;
pub mod delay;
pub mod filter;
pub mod flat_map;
pub mod handle_events;
pub mod map;
pub mod merge;
pub mod prepend;
pub mod print;
pub mod receive_on;
pub mod remove_duplicates;
pub mod replace_empty;
pub mod set_failure_type;
pub mod subscribe_on;
pub mod zip;
