//! End-of-block blow-up scheduling.
//!
//! Invoked exactly once per block boundary, independent of any transaction.
//! All timing derives from block heights recorded in state, never from the
//! wall clock, so every replica resolves the fuse identically.

use hotpotato_types::{Fuse, State};
use tracing::{debug, info};

/// Default number of blocks between scheduled blow-ups.
pub const BLOW_UP_INTERVAL: u64 = 100;

/// Pure block-boundary transition: resolve a lit fuse into a concrete
/// deadline, fire the blow-up when its height is reached, and record the
/// block height.
pub fn end_block(state: &State, height: u64, interval: u64) -> State {
    let mut next = state.clone();
    match state.fuse {
        Fuse::BurnsAt(deadline) if deadline == height => {
            // Whoever holds the potato now takes the loss.
            if let Some(holder) = state.potato_holder {
                next.losses[holder as usize] += 1;
                info!(height, holder, "potato blew up");
            }
            next.fuse = Fuse::BurnsAt(height + interval);
        }
        Fuse::Lit => {
            // The deadline derives from the height recorded before this
            // block, so it lands a full interval after the game started.
            let deadline = state.last_block_height + interval;
            next.fuse = Fuse::BurnsAt(deadline);
            debug!(height, deadline, "blow-up scheduled");
        }
        _ => {}
    }
    next.last_block_height = height;

    next
}
