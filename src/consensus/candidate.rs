use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Index of a node in the simulated network.
pub type PeerIndex = usize;

/// A transaction as seen by the consensus simulation. Only its identity matters.
#[derive(Debug, Copy, Clone, Hash, Ord, PartialOrd, Eq, PartialEq, Serialize, Deserialize)]
pub struct ProposedTransaction(u32);

impl ProposedTransaction {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u32 {
        self.0
    }
}

impl Display for ProposedTransaction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "tx#{}", self.0)
    }
}

/// A report that `sender` proposed `transaction` in the current round.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct Candidate<T> {
    pub transaction: T,
    pub sender: PeerIndex,
}

impl<T> Candidate<T> {
    pub fn new(transaction: T, sender: PeerIndex) -> Self {
        Self {
            transaction,
            sender,
        }
    }
}
