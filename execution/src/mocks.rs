use commonware_cryptography::{
    ed25519::{PrivateKey, PublicKey},
    Signer,
};
use commonware_math::algebra::Random;
use rand::{rngs::StdRng, SeedableRng};

/// Creates a deterministic Ed25519 keypair for a player.
pub fn account_keypair(seed: u64) -> (PrivateKey, PublicKey) {
    let mut rng = StdRng::seed_from_u64(seed);
    let private = PrivateKey::random(&mut rng);
    let public = private.public_key();
    (private, public)
}
