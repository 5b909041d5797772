//! Consensus-facing application for hotpotato.
//!
//! Implements the callback bodies an external consensus engine drives
//! (init / check / deliver / end-block / commit / query) over an owned game
//! [`State`](hotpotato_types::State). The engine owns all scheduling and
//! ordering; this crate only guarantees that identical callback sequences
//! produce identical states and commit hashes on every replica.

use hotpotato_execution::BLOW_UP_INTERVAL;

mod application;
pub use application::Application;


/// How `query` renders its value bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnapshotMode {
    /// Canonical bytes of a [`Snapshot`](hotpotato_types::Snapshot) signed
    /// with the application's session key.
    Signed,
    /// Canonical bytes of the compact [`Status`](hotpotato_types::Status)
    /// view, unauthenticated.
    Summary,
}

/// Configuration for the application.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Blocks between scheduled blow-ups.
    pub blow_up_interval: u64,

    /// How query responses are rendered.
    pub snapshot_mode: SnapshotMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            blow_up_interval: BLOW_UP_INTERVAL,
            snapshot_mode: SnapshotMode::Signed,
        }
    }
}
