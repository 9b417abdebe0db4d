use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const ADDRESS_BYTE_COUNT: usize = 32;

/// The recipient of a transaction output.
/// An address is the raw Ed25519 public key of the owner, so whoever holds the matching
/// secret key can spend the outputs locked to it.
#[derive(Debug, Copy, Clone, Hash, Serialize, Deserialize, Eq, PartialEq)]
pub struct Address([u8; ADDRESS_BYTE_COUNT]);

impl Address {
    pub const fn new(public_key: [u8; ADDRESS_BYTE_COUNT]) -> Self {
        Self(public_key)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_BYTE_COUNT] {
        &self.0
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}
