//! Types crossing the application boundary: query views, signed state
//! snapshots, and the responses returned from the consensus callbacks.

use crate::execution::{snapshot_namespace, NAMESPACE};
use crate::game::{State, MAX_PLAYERS};
use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, Read, ReadExt, ReadRangeExt, Write};
use commonware_cryptography::{
    ed25519::{self, PublicKey},
    sha256::Digest,
    Signer, Verifier,
};

/// Compact, non-authenticated view of the game, suitable for explorers and
/// debugging clients.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Status {
    pub players: Vec<PublicKey>,
    pub losses: Vec<u64>,
    pub potato_holder: Option<PublicKey>,
}

impl Status {
    pub fn from_state(state: &State) -> Self {
        Self {
            players: state.players.clone(),
            losses: state.losses.clone(),
            potato_holder: state.holder().cloned(),
        }
    }
}

impl Write for Status {
    fn write(&self, writer: &mut impl BufMut) {
        self.players.write(writer);
        self.losses.write(writer);
        self.potato_holder.write(writer);
    }
}

impl Read for Status {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let players = Vec::<PublicKey>::read_range(reader, 0..=MAX_PLAYERS)?;
        let losses = Vec::<u64>::read_range(reader, 0..=MAX_PLAYERS)?;
        let potato_holder = Option::<PublicKey>::read(reader)?;

        Ok(Self {
            players,
            losses,
            potato_holder,
        })
    }
}

impl EncodeSize for Status {
    fn encode_size(&self) -> usize {
        self.players.encode_size()
            + self.losses.encode_size()
            + self.potato_holder.encode_size()
    }
}

/// A full state snapshot signed by the serving application's session key,
/// verifiable by any holder of its public key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub height: u64,
    pub state: State,

    pub public: ed25519::PublicKey,
    pub signature: ed25519::Signature,
}

impl Snapshot {
    fn envelope(height: &u64, state: &State) -> Vec<u8> {
        let mut envelope = Vec::new();
        height.write(&mut envelope);
        state.write(&mut envelope);

        envelope
    }

    pub fn sign(private: &ed25519::PrivateKey, height: u64, state: State) -> Self {
        let signature = private.sign(
            &snapshot_namespace(NAMESPACE),
            &Self::envelope(&height, &state),
        );

        Self {
            height,
            state,
            public: private.public_key(),
            signature,
        }
    }

    /// Verify the snapshot was produced by `identity`.
    pub fn verify(&self, identity: &PublicKey) -> bool {
        self.public == *identity
            && self.public.verify(
                &snapshot_namespace(NAMESPACE),
                &Self::envelope(&self.height, &self.state),
                &self.signature,
            )
    }
}

impl Write for Snapshot {
    fn write(&self, writer: &mut impl BufMut) {
        self.height.write(writer);
        self.state.write(writer);
        self.public.write(writer);
        self.signature.write(writer);
    }
}

impl Read for Snapshot {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let height = u64::read(reader)?;
        let state = State::read(reader)?;
        let public = ed25519::PublicKey::read(reader)?;
        let signature = ed25519::Signature::read(reader)?;

        Ok(Self {
            height,
            state,
            public,
            signature,
        })
    }
}

impl EncodeSize for Snapshot {
    fn encode_size(&self) -> usize {
        self.height.encode_size()
            + self.state.encode_size()
            + self.public.encode_size()
            + self.signature.encode_size()
    }
}

/// Accept/reject code mirrored from the consensus engine's callback
/// contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Code {
    Ok,
    Err,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxResponse {
    pub code: Code,
    pub info: String,
}

impl TxResponse {
    pub fn ok() -> Self {
        Self {
            code: Code::Ok,
            info: String::new(),
        }
    }

    pub fn reject(info: impl Into<String>) -> Self {
        Self {
            code: Code::Err,
            info: info.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InitResponse {
    pub version: String,
    pub app_hash: Digest,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommitResponse {
    pub app_hash: Digest,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryResponse {
    pub code: Code,
    pub value: Vec<u8>,
    pub height: u64,
}
