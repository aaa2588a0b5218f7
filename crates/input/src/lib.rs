//! Input events: the decoded, device-independent commands the run loop consumes.
//!
//! # Invariants
//! - The state machine consumes `InputEvent`s, never raw key codes.
//! - Events are drained once per tick, in arrival order.

pub mod action;
pub mod queue;

pub use action::{InputEvent, ParseEventError, parse_script};
pub use queue::EventQueue;
