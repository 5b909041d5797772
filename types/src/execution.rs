use bytes::{Buf, BufMut};
use commonware_codec::{DecodeExt, Encode, EncodeSize, Error, FixedSize, Read, ReadExt, Write};
use commonware_cryptography::{
    ed25519::{self, PublicKey},
    sha256::{Digest, Sha256},
    Digestible, Hasher, Signer, Verifier,
};
use commonware_utils::union;
use thiserror::Error as ThisError;

pub const NAMESPACE: &[u8] = b"_HOTPOTATO";
pub const TRANSACTION_SUFFIX: &[u8] = b"_TX";
pub const SNAPSHOT_SUFFIX: &[u8] = b"_SNAPSHOT";

#[inline]
pub fn transaction_namespace(namespace: &[u8]) -> Vec<u8> {
    union(namespace, TRANSACTION_SUFFIX)
}

#[inline]
pub fn snapshot_namespace(namespace: &[u8]) -> Vec<u8> {
    union(namespace, SNAPSHOT_SUFFIX)
}

/// Rejection reasons for submitted transaction bytes, before any game rule
/// is consulted.
#[derive(Debug, ThisError)]
pub enum SubmissionError {
    #[error("malformed transaction: {0}")]
    Decode(Error),
    #[error("unrecognized payload type {0}")]
    UnrecognizedPayload(u8),
    #[error("signature does not verify")]
    InvalidSignature,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    /// Join the game.
    /// Binary: [0]
    NewPlayer,

    /// Pass the potato to another player.
    /// Binary: [1] [receiver:32]
    TossPotato { receiver: PublicKey },
}

impl Write for Payload {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            Self::NewPlayer => 0u8.write(writer),
            Self::TossPotato { receiver } => {
                1u8.write(writer);
                receiver.write(writer);
            }
        }
    }
}

impl Read for Payload {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let payload = match u8::read(reader)? {
            0 => Self::NewPlayer,
            1 => Self::TossPotato {
                receiver: PublicKey::read(reader)?,
            },
            i => return Err(Error::InvalidEnum(i)),
        };

        Ok(payload)
    }
}

impl EncodeSize for Payload {
    fn encode_size(&self) -> usize {
        u8::SIZE
            + match self {
                Self::NewPlayer => 0,
                Self::TossPotato { .. } => PublicKey::SIZE,
            }
    }
}

/// A signed message envelope. The sender's public key doubles as the player
/// identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub public: ed25519::PublicKey,
    pub payload: Payload,
    pub sequence: u64,

    pub signature: ed25519::Signature,
}

impl Transaction {
    /// Canonical envelope bytes the signature is computed over: a strict
    /// prefix of the wire encoding, so a signature can never be detached and
    /// reattached to a different envelope.
    fn envelope(public: &PublicKey, payload: &Payload, sequence: &u64) -> Vec<u8> {
        let mut envelope = Vec::new();
        public.write(&mut envelope);
        payload.write(&mut envelope);
        sequence.write(&mut envelope);

        envelope
    }

    pub fn sign(private: &ed25519::PrivateKey, sequence: u64, payload: Payload) -> Self {
        let public = private.public_key();
        let signature = private.sign(
            &transaction_namespace(NAMESPACE),
            &Self::envelope(&public, &payload, &sequence),
        );

        Self {
            public,
            payload,
            sequence,
            signature,
        }
    }

    pub fn verify(&self) -> bool {
        self.public.verify(
            &transaction_namespace(NAMESPACE),
            &Self::envelope(&self.public, &self.payload, &self.sequence),
            &self.signature,
        )
    }

    /// Decode wire bytes and authenticate the embedded signature. The sole
    /// entry point transaction bytes pass through before reaching handlers.
    pub fn decode_authenticated(bytes: &[u8]) -> Result<Self, SubmissionError> {
        // The payload tag is the only enum in the wire encoding, so an
        // InvalidEnum can only mean an unhandled payload variant.
        let transaction = Self::decode(bytes).map_err(|err| match err {
            Error::InvalidEnum(tag) => SubmissionError::UnrecognizedPayload(tag),
            err => SubmissionError::Decode(err),
        })?;
        if !transaction.verify() {
            return Err(SubmissionError::InvalidSignature);
        }

        Ok(transaction)
    }
}

impl Write for Transaction {
    fn write(&self, writer: &mut impl BufMut) {
        self.public.write(writer);
        self.payload.write(writer);
        self.sequence.write(writer);
        self.signature.write(writer);
    }
}

impl Read for Transaction {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let public = ed25519::PublicKey::read(reader)?;
        let payload = Payload::read(reader)?;
        let sequence = u64::read(reader)?;
        let signature = ed25519::Signature::read(reader)?;

        Ok(Self {
            public,
            payload,
            sequence,
            signature,
        })
    }
}

impl EncodeSize for Transaction {
    fn encode_size(&self) -> usize {
        self.public.encode_size()
            + self.payload.encode_size()
            + self.sequence.encode_size()
            + self.signature.encode_size()
    }
}

impl Digestible for Transaction {
    type Digest = Digest;

    fn digest(&self) -> Digest {
        let mut hasher = Sha256::new();
        hasher.update(self.public.as_ref());
        hasher.update(self.payload.encode().as_ref());
        hasher.update(&self.sequence.to_be_bytes());
        // We don't include the signature as part of the digest (any valid
        // signature will be valid for the transaction)
        hasher.finalize()
    }
}
