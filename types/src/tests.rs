use super::*;
use commonware_codec::{DecodeExt, Encode, FixedSize, ReadExt};
use commonware_cryptography::{
    ed25519::{PrivateKey, PublicKey},
    Digestible, Signer,
};
use commonware_math::algebra::Random;
use rand::{rngs::StdRng, SeedableRng};

fn keypair(seed: u64) -> (PrivateKey, PublicKey) {
    let mut rng = StdRng::seed_from_u64(seed);
    let private = PrivateKey::random(&mut rng);
    let public = private.public_key();
    (private, public)
}

fn sample_state() -> State {
    let (_, a) = keypair(1);
    let (_, b) = keypair(2);
    let (_, c) = keypair(3);
    State {
        players: vec![a, b, c],
        losses: vec![2, 0, 1],
        potato_holder: Some(1),
        fuse: Fuse::BurnsAt(105),
        last_block_height: 42,
    }
}

#[test]
fn test_payload_roundtrip() {
    let (_, receiver) = keypair(7);
    for payload in [Payload::NewPlayer, Payload::TossPotato { receiver }] {
        let encoded = payload.encode();
        let decoded = Payload::read(&mut &encoded[..]).unwrap();
        assert_eq!(payload, decoded);
    }
}

#[test]
fn test_payload_unknown_tag_rejected() {
    assert!(Payload::read(&mut &[9u8][..]).is_err());
}

#[test]
fn test_fuse_roundtrip() {
    for fuse in [Fuse::Unlit, Fuse::Lit, Fuse::BurnsAt(105)] {
        let encoded = fuse.encode();
        let decoded = Fuse::read(&mut &encoded[..]).unwrap();
        assert_eq!(fuse, decoded);
    }
}

#[test]
fn test_transaction_roundtrip() {
    let (private, _) = keypair(1);
    let (_, receiver) = keypair(2);

    let transaction = Transaction::sign(&private, 3, Payload::TossPotato { receiver });
    let encoded = transaction.encode();
    let decoded = Transaction::decode(&encoded[..]).unwrap();
    assert_eq!(transaction, decoded);
    assert!(decoded.verify());
}

#[test]
fn test_transaction_decode_rejects_truncation() {
    let (private, _) = keypair(1);
    let transaction = Transaction::sign(&private, 0, Payload::NewPlayer);
    let encoded = transaction.encode();
    assert!(Transaction::decode(&encoded[..encoded.len() - 1]).is_err());
}

#[test]
fn test_signature_covers_every_envelope_field() {
    let (private, public) = keypair(1);
    let (_, receiver) = keypair(2);
    let (_, other) = keypair(3);

    let signed = Transaction::sign(
        &private,
        3,
        Payload::TossPotato {
            receiver: receiver.clone(),
        },
    );
    assert!(signed.verify());

    // Tampered sequence.
    let mut tampered = signed.clone();
    tampered.sequence = 4;
    assert!(!tampered.verify());

    // Tampered payload.
    let mut tampered = signed.clone();
    tampered.payload = Payload::TossPotato { receiver: other };
    assert!(!tampered.verify());

    // Tampered sender.
    let (other_private, other_public) = keypair(4);
    let mut tampered = signed.clone();
    tampered.public = other_public;
    assert!(!tampered.verify());

    // Signature from a different envelope cannot be substituted.
    let mut tampered = signed.clone();
    tampered.signature = Transaction::sign(&other_private, 3, Payload::NewPlayer).signature;
    assert!(!tampered.verify());

    assert_eq!(signed.public, public);
}

#[test]
fn test_decode_authenticated_accepts_valid_bytes() {
    let (private, _) = keypair(1);
    let transaction = Transaction::sign(&private, 0, Payload::NewPlayer);
    let encoded = transaction.encode();

    let decoded = Transaction::decode_authenticated(&encoded).unwrap();
    assert_eq!(decoded, transaction);
}

#[test]
fn test_decode_authenticated_rejects_tampering() {
    let (private, _) = keypair(1);
    let mut tampered = Transaction::sign(&private, 7, Payload::NewPlayer);
    tampered.sequence = 8;
    let encoded = tampered.encode();

    assert!(matches!(
        Transaction::decode_authenticated(&encoded),
        Err(SubmissionError::InvalidSignature)
    ));
}

#[test]
fn test_decode_authenticated_rejects_unknown_payload_tag() {
    let (private, _) = keypair(1);
    let transaction = Transaction::sign(&private, 0, Payload::NewPlayer);
    let mut encoded = transaction.encode().to_vec();
    // The payload tag sits immediately after the fixed-size sender key.
    encoded[PublicKey::SIZE] = 9;

    assert!(matches!(
        Transaction::decode_authenticated(&encoded),
        Err(SubmissionError::UnrecognizedPayload(9))
    ));
}

#[test]
fn test_decode_authenticated_rejects_garbage() {
    assert!(matches!(
        Transaction::decode_authenticated(&[0u8; 4]),
        Err(SubmissionError::Decode(_))
    ));
}

#[test]
fn test_transaction_digest_ignores_signature() {
    let (private, _) = keypair(1);
    let one = Transaction::sign(&private, 0, Payload::NewPlayer);
    let mut two = one.clone();
    two.signature = Transaction::sign(&private, 1, Payload::NewPlayer).signature;
    assert_eq!(one.digest(), two.digest());
}

#[test]
fn test_state_roundtrip() {
    let state = sample_state();
    state.validate_invariants().expect("valid fixture");
    let encoded = state.encode();
    let decoded = State::decode(&encoded[..]).unwrap();
    assert_eq!(state, decoded);
}

#[test]
fn test_state_digest_is_stable() {
    let state = sample_state();
    assert_eq!(state.digest(), state.clone().digest());

    let mut advanced = state.clone();
    advanced.last_block_height += 1;
    assert_ne!(state.digest(), advanced.digest());
}

#[test]
fn test_state_decode_rejects_misaligned_losses() {
    let mut state = sample_state();
    state.losses.pop();
    let encoded = state.encode();
    assert!(State::decode(&encoded[..]).is_err());
}

#[test]
fn test_state_decode_rejects_holder_out_of_range() {
    let mut state = sample_state();
    state.potato_holder = Some(3);
    let encoded = state.encode();
    assert!(State::decode(&encoded[..]).is_err());
}

#[test]
fn test_state_invariants() {
    let state = State::default();
    state.validate_invariants().expect("empty state is valid");

    let mut broken = sample_state();
    broken.losses.pop();
    assert!(matches!(
        broken.validate_invariants(),
        Err(StateInvariantError::LossesMisaligned { .. })
    ));

    let mut broken = sample_state();
    broken.potato_holder = None;
    assert!(matches!(
        broken.validate_invariants(),
        Err(StateInvariantError::HolderPresence)
    ));

    let mut broken = sample_state();
    broken.fuse = Fuse::Unlit;
    assert!(matches!(
        broken.validate_invariants(),
        Err(StateInvariantError::FusePresence)
    ));
}

#[test]
fn test_status_roundtrip() {
    let state = sample_state();
    let status = Status::from_state(&state);
    assert_eq!(status.potato_holder.as_ref(), state.holder());

    let encoded = status.encode();
    let decoded = Status::read(&mut &encoded[..]).unwrap();
    assert_eq!(status, decoded);
}

#[test]
fn test_snapshot_sign_and_verify() {
    let (private, public) = keypair(10);
    let (_, impostor) = keypair(11);
    let state = sample_state();

    let snapshot = Snapshot::sign(&private, state.last_block_height, state.clone());
    assert!(snapshot.verify(&public));
    assert!(!snapshot.verify(&impostor));

    let encoded = snapshot.encode();
    let decoded = Snapshot::decode(&encoded[..]).unwrap();
    assert_eq!(decoded, snapshot);
    assert!(decoded.verify(&public));
    assert_eq!(decoded.state, state);
}

#[test]
fn test_snapshot_tamper_fails_verification() {
    let (private, public) = keypair(10);
    let state = sample_state();

    let mut snapshot = Snapshot::sign(&private, 42, state);
    snapshot.height = 43;
    assert!(!snapshot.verify(&public));
}
