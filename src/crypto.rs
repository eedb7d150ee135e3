//! Hashing and signature collaborators
//!
//! The ledger only needs two things from cryptography: a collision-resistant
//! content hash for transactions and blocks, and an opaque
//! `verify(message, signature, key)` check. Both are kept behind this module so
//! the rest of the crate never touches secp256k1 types directly.

use bitcoin_hashes::{sha256d, Hash as BitcoinHash, HashEngine};
use secp256k1::{ecdsa::Signature, Message, PublicKey, Secp256k1, SecretKey, VerifyOnly};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::constants::COMPACT_SIGNATURE_SIZE;
use crate::types::*;

/// Opaque signature check consumed by transaction validation
pub trait SignatureVerifier {
    /// Returns true only if `signature` is a valid signature of `message` under `key`.
    fn verify(&self, message: &[u8], signature: &[u8], key: &[u8]) -> bool;
}

impl<V: SignatureVerifier + ?Sized> SignatureVerifier for &V {
    fn verify(&self, message: &[u8], signature: &[u8], key: &[u8]) -> bool {
        (**self).verify(message, signature, key)
    }
}

/// ECDSA over secp256k1: compact 64-byte signatures, SEC1-serialized public keys,
/// messages reduced to a SHA-256 digest before signing.
pub struct Secp256k1Verifier {
    secp: Secp256k1<VerifyOnly>,
}

impl Secp256k1Verifier {
    pub fn new() -> Self {
        Self {
            secp: Secp256k1::verification_only(),
        }
    }
}

impl Default for Secp256k1Verifier {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Secp256k1Verifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secp256k1Verifier").finish_non_exhaustive()
    }
}

impl SignatureVerifier for Secp256k1Verifier {
    fn verify(&self, message: &[u8], signature: &[u8], key: &[u8]) -> bool {
        if signature.len() != COMPACT_SIGNATURE_SIZE {
            return false;
        }

        let pubkey = match PublicKey::from_slice(key) {
            Ok(pk) => pk,
            Err(_) => return false,
        };

        let signature = match Signature::from_compact(signature) {
            Ok(sig) => sig,
            Err(_) => return false,
        };

        let message = Message::from_digest(message_digest(message));
        self.secp.verify_ecdsa(&message, &signature, &pubkey).is_ok()
    }
}

/// Sign `message` so that [`Secp256k1Verifier`] accepts it.
///
/// Block assembly and wallets live outside this crate; this is what they call.
pub fn sign(secret_key: &SecretKey, message: &[u8]) -> ByteString {
    let secp = Secp256k1::signing_only();
    let message = Message::from_digest(message_digest(message));
    secp.sign_ecdsa(&message, secret_key)
        .serialize_compact()
        .to_vec()
}

/// Serialized (compressed) public key for `secret_key`, as stored in an output's `owner`
pub fn public_key_bytes(secret_key: &SecretKey) -> ByteString {
    let secp = Secp256k1::signing_only();
    PublicKey::from_secret_key(&secp, secret_key)
        .serialize()
        .to_vec()
}

/// Double SHA-256 over a sequence of byte chunks
pub fn double_sha256<'a, I>(chunks: I) -> Hash
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut engine = sha256d::Hash::engine();
    for chunk in chunks {
        engine.input(chunk);
    }
    sha256d::Hash::from_engine(engine).into_inner()
}

fn message_digest(message: &[u8]) -> [u8; 32] {
    Sha256::digest(message).into()
}
