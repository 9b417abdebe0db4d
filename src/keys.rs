use crate::Address;
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use serde_big_array::BigArray;
use std::fmt::{Debug, Formatter};

pub const SIGNATURE_BYTE_COUNT: usize = 64;

/// An Ed25519 signature authorizing one transaction input.
#[derive(Clone, Hash, Serialize, Deserialize, Eq, PartialEq)]
pub struct Signature(#[serde(with = "BigArray")] [u8; SIGNATURE_BYTE_COUNT]);

impl Signature {
    pub const fn from_raw(raw_bytes: [u8; SIGNATURE_BYTE_COUNT]) -> Self {
        Self(raw_bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_BYTE_COUNT] {
        &self.0
    }
}

impl Debug for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Signature({})", hex::encode(&self.0[..8]))
    }
}

/// Decides whether a signature over the given message was produced by the owner of the address.
/// The validator only ever asks this question, it never needs to know how keys work.
pub trait SignatureVerifier {
    fn verify(&self, address: &Address, message: &[u8], signature: &Signature) -> bool;
}

/// Verifies Ed25519 signatures.
#[derive(Debug, Default, Copy, Clone)]
pub struct Ed25519Verifier;

impl SignatureVerifier for Ed25519Verifier {
    fn verify(&self, address: &Address, message: &[u8], signature: &Signature) -> bool {
        // Addresses are not checked on creation, so a malformed point simply fails verification.
        let verifying_key = match VerifyingKey::from_bytes(address.as_bytes()) {
            Ok(key) => key,
            Err(_) => return false,
        };
        let signature = ed25519_dalek::Signature::from_bytes(signature.as_bytes());
        verifying_key.verify_strict(message, &signature).is_ok()
    }
}

/// A signing key together with the address it controls.
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self {
            signing_key: SigningKey::generate(rng),
        }
    }

    /// Deterministic keypair, useful for tests and reproducible simulations.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&seed),
        }
    }

    pub fn address(&self) -> Address {
        Address::new(self.signing_key.verifying_key().to_bytes())
    }

    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature::from_raw(self.signing_key.sign(message).to_bytes())
    }
}
