//! Common types for hotpotato: the signed transaction envelope, the game
//! state, and the values crossing the application boundary. Everything that
//! is signed or hashed has an explicit canonical encoding; no generic
//! serialization is used anywhere a replica could diverge on bytes.

pub mod api;
pub mod execution;
pub mod game;

pub use api::{
    Code, CommitResponse, InitResponse, QueryResponse, Snapshot, Status, TxResponse,
};
pub use execution::{
    snapshot_namespace, transaction_namespace, Payload, SubmissionError, Transaction, NAMESPACE,
};
pub use game::{Fuse, State, StateInvariantError, MAX_PLAYERS};

#[cfg(test)]
mod tests;
