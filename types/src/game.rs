//! Game state for hot potato.
//!
//! The state is a value: every accepted transition produces a fresh `State`
//! and the previous one is discarded wholesale, which keeps replica
//! comparisons and concurrent reads trivial.

use bytes::{Buf, BufMut};
use commonware_codec::{Encode, EncodeSize, Error, Read, ReadExt, ReadRangeExt, Write};
use commonware_cryptography::{
    ed25519::PublicKey,
    sha256::{Digest, Sha256},
    Digestible, Hasher,
};
use thiserror::Error as ThisError;

/// Upper bound on decoded player lists.
pub const MAX_PLAYERS: usize = 1024;

#[derive(Debug, ThisError, PartialEq, Eq)]
pub enum StateInvariantError {
    #[error("losses misaligned with players (players={players}, losses={losses})")]
    LossesMisaligned { players: usize, losses: usize },
    #[error("potato holder out of range (holder={holder}, players={players})")]
    HolderOutOfRange { holder: u32, players: usize },
    #[error("potato holder must be assigned exactly when two or more players joined")]
    HolderPresence,
    #[error("fuse must be unlit until two or more players joined")]
    FusePresence,
}

/// Blow-up schedule for the potato currently in play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Fuse {
    /// The game has not started (fewer than two players).
    #[default]
    Unlit,
    /// The second player joined; a deadline is assigned at the next block
    /// boundary.
    Lit,
    /// The potato blows up when a block with this height ends.
    BurnsAt(u64),
}

impl Write for Fuse {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            Self::Unlit => 0u8.write(writer),
            Self::Lit => 1u8.write(writer),
            Self::BurnsAt(height) => {
                2u8.write(writer);
                height.write(writer);
            }
        }
    }
}

impl Read for Fuse {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let fuse = match u8::read(reader)? {
            0 => Self::Unlit,
            1 => Self::Lit,
            2 => Self::BurnsAt(u64::read(reader)?),
            i => return Err(Error::InvalidEnum(i)),
        };

        Ok(fuse)
    }
}

impl EncodeSize for Fuse {
    fn encode_size(&self) -> usize {
        1 + match self {
            Self::Unlit | Self::Lit => 0,
            Self::BurnsAt(height) => height.encode_size(),
        }
    }
}

/// The authoritative game state.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct State {
    /// Players in insertion order. A player is never removed.
    pub players: Vec<PublicKey>,
    /// Blow-up counts, index-aligned with `players`. Entries only increase.
    pub losses: Vec<u64>,
    /// Index of the player currently holding the potato. Assigned once the
    /// second player joins.
    pub potato_holder: Option<u32>,
    pub fuse: Fuse,
    pub last_block_height: u64,
}

impl State {
    pub fn player_index(&self, player: &PublicKey) -> Option<u32> {
        self.players
            .iter()
            .position(|candidate| candidate == player)
            .map(|index| index as u32)
    }

    /// The player currently holding the potato, if the game has started.
    pub fn holder(&self) -> Option<&PublicKey> {
        self.potato_holder
            .and_then(|index| self.players.get(index as usize))
    }

    pub fn validate_invariants(&self) -> Result<(), StateInvariantError> {
        if self.losses.len() != self.players.len() {
            return Err(StateInvariantError::LossesMisaligned {
                players: self.players.len(),
                losses: self.losses.len(),
            });
        }
        let started = self.players.len() >= 2;
        match self.potato_holder {
            Some(holder) => {
                if !started {
                    return Err(StateInvariantError::HolderPresence);
                }
                if holder as usize >= self.players.len() {
                    return Err(StateInvariantError::HolderOutOfRange {
                        holder,
                        players: self.players.len(),
                    });
                }
            }
            None if started => return Err(StateInvariantError::HolderPresence),
            None => {}
        }
        if started == matches!(self.fuse, Fuse::Unlit) {
            return Err(StateInvariantError::FusePresence);
        }
        Ok(())
    }
}

impl Write for State {
    fn write(&self, writer: &mut impl BufMut) {
        self.players.write(writer);
        self.losses.write(writer);
        self.potato_holder.write(writer);
        self.fuse.write(writer);
        self.last_block_height.write(writer);
    }
}

impl Read for State {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let players = Vec::<PublicKey>::read_range(reader, 0..=MAX_PLAYERS)?;
        let losses = Vec::<u64>::read_range(reader, 0..=MAX_PLAYERS)?;
        let potato_holder = Option::<u32>::read(reader)?;
        let fuse = Fuse::read(reader)?;
        let last_block_height = u64::read(reader)?;

        let state = Self {
            players,
            losses,
            potato_holder,
            fuse,
            last_block_height,
        };
        if state.losses.len() != state.players.len() {
            return Err(Error::Invalid("State", "losses misaligned with players"));
        }
        if let Some(holder) = state.potato_holder {
            if holder as usize >= state.players.len() {
                return Err(Error::Invalid("State", "potato holder out of range"));
            }
        }
        Ok(state)
    }
}

impl EncodeSize for State {
    fn encode_size(&self) -> usize {
        self.players.encode_size()
            + self.losses.encode_size()
            + self.potato_holder.encode_size()
            + self.fuse.encode_size()
            + self.last_block_height.encode_size()
    }
}

impl Digestible for State {
    type Digest = Digest;

    /// The commit hash replicas compare to confirm agreement.
    fn digest(&self) -> Digest {
        Sha256::hash(&self.encode())
    }
}
