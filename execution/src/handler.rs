//! Per-variant transaction handlers.
//!
//! Every handler is a pure function over `(State, Transaction)` and comes in
//! two passes sharing one rule set: `validate` (the pre-consensus check pass,
//! which never produces a state) and `deliver` (the consensus-ordered pass,
//! which re-validates independently and returns the successor state).
//! Dispatch is an exhaustive match on the closed [`Payload`] set in both
//! passes, so the two can never disagree on which variants are handled.

use commonware_cryptography::ed25519::PublicKey;
use hotpotato_types::{Fuse, Payload, State, Transaction};
use thiserror::Error as ThisError;

/// Game-rule rejections. All are recoverable: the submitter gets the reason
/// and the state is left untouched.
#[derive(Clone, Copy, Debug, ThisError, PartialEq, Eq)]
pub enum ValidationError {
    #[error("cannot toss the potato to yourself")]
    SelfTransfer,
    #[error("sender does not hold the potato")]
    NotHolder,
    #[error("receiver has not joined the game")]
    UnknownReceiver,
    #[error("sender already joined the game")]
    AlreadyJoined,
}

/// Check pass: apply the full rule set against `state` without producing a
/// successor. Advisory only; consensus ordering may change validity between
/// this pass and deliver.
pub fn validate(state: &State, transaction: &Transaction) -> Result<(), ValidationError> {
    match &transaction.payload {
        Payload::NewPlayer => validate_new_player(state, &transaction.public),
        Payload::TossPotato { receiver } => validate_toss(state, &transaction.public, receiver),
    }
}

/// Deliver pass: re-validate, then return the successor state. On error the
/// caller keeps the previous state; there is no partial transition.
pub fn deliver(state: &State, transaction: &Transaction) -> Result<State, ValidationError> {
    validate(state, transaction)?;

    let next = match &transaction.payload {
        Payload::NewPlayer => apply_new_player(state, &transaction.public),
        Payload::TossPotato { receiver } => apply_toss(state, receiver),
    };
    debug_assert!(next.validate_invariants().is_ok());

    Ok(next)
}

fn validate_new_player(state: &State, sender: &PublicKey) -> Result<(), ValidationError> {
    if state.player_index(sender).is_some() {
        return Err(ValidationError::AlreadyJoined);
    }

    Ok(())
}

fn validate_toss(
    state: &State,
    sender: &PublicKey,
    receiver: &PublicKey,
) -> Result<(), ValidationError> {
    if sender == receiver {
        return Err(ValidationError::SelfTransfer);
    }
    // Also covers the pre-game case: with no holder assigned, nobody can toss.
    if state.holder() != Some(sender) {
        return Err(ValidationError::NotHolder);
    }
    if state.player_index(receiver).is_none() {
        return Err(ValidationError::UnknownReceiver);
    }

    Ok(())
}

fn apply_new_player(state: &State, sender: &PublicKey) -> State {
    let mut next = state.clone();
    next.players.push(sender.clone());
    next.losses.push(0);
    if next.players.len() == 2 {
        // The newly admitted second player starts holding the potato, and the
        // fuse is lit for scheduling at the next block boundary.
        next.potato_holder = Some(1);
        next.fuse = Fuse::Lit;
    }

    next
}

fn apply_toss(state: &State, receiver: &PublicKey) -> State {
    let mut next = state.clone();
    next.potato_holder = state.player_index(receiver);

    next
}
