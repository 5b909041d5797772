//! Hotpotato execution layer.
//!
//! This crate contains the deterministic transition logic applied behind the
//! consensus boundary: the per-variant transaction handlers and the
//! end-of-block blow-up policy.
//!
//! ## Determinism requirements
//! - Do not use wall-clock time inside execution.
//! - Do not let iteration order of hash-based collections influence outputs.
//! - Transitions are pure: `(State, input) -> State`, with the previous state
//!   kept untouched on any rejection.
//!
//! Replaying an identical ordered sequence of transactions and block
//! boundaries from the same initial state must yield an identical state on
//! every replica.

pub mod handler;
pub mod scheduler;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

pub use handler::{deliver, validate, ValidationError};
pub use scheduler::{end_block, BLOW_UP_INTERVAL};
