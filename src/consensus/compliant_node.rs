use crate::consensus::{Candidate, NetworkParams, Node, PeerIndex};
use std::collections::HashSet;
use std::hash::Hash;
use tracing::debug;

/// A node that follows the rules.
///
/// Every round it forwards the transactions its trusted followees proposed in the previous round.
/// A followee that proposes nothing in a round is considered malicious from then on, and its
/// proposals are ignored for the rest of the simulation, even if it starts contributing again.
#[derive(Debug, Clone)]
pub struct CompliantNode<T> {
    num_rounds: usize,
    round: usize,
    followees: Vec<bool>,
    // Only ever goes from false to true.
    suspicious: Vec<bool>,
    pending: HashSet<T>,
}

impl<T: Clone + Eq + Hash> CompliantNode<T> {
    pub fn new(params: &NetworkParams) -> Self {
        Self {
            num_rounds: params.num_rounds,
            round: 0,
            followees: vec![],
            suspicious: vec![],
            pending: HashSet::new(),
        }
    }

    /// The number of rounds ingested so far.
    pub fn round(&self) -> usize {
        self.round
    }

    /// Returns true once the node has used up its round budget.
    pub fn is_finished(&self) -> bool {
        self.round == self.num_rounds
    }

    pub fn is_suspicious(&self, peer: PeerIndex) -> bool {
        self.suspicious.get(peer).copied().unwrap_or(false)
    }

    pub fn suspicious_peers(&self) -> Vec<PeerIndex> {
        self.suspicious
            .iter()
            .enumerate()
            .filter(|(_, suspicious)| **suspicious)
            .map(|(peer, _)| peer)
            .collect()
    }

    /// Marks every followee that did not send anything this round.
    fn update_suspicious(&mut self, candidates: &[Candidate<T>]) {
        let senders = candidates
            .iter()
            .map(|candidate| candidate.sender)
            .collect::<HashSet<PeerIndex>>();
        for (peer, follows) in self.followees.iter().enumerate() {
            if *follows && !senders.contains(&peer) && !self.suspicious[peer] {
                debug!(peer, round = self.round, "followee went silent, marking suspicious");
                self.suspicious[peer] = true;
            }
        }
    }
}

impl<T: Clone + Eq + Hash> Node<T> for CompliantNode<T> {
    fn configure(&mut self, followees: Vec<bool>) {
        self.suspicious = vec![false; followees.len()];
        self.followees = followees;
    }

    fn seed_transactions(&mut self, transactions: HashSet<T>) {
        self.pending = transactions;
    }

    fn emit(&self) -> HashSet<T> {
        self.pending.clone()
    }

    fn ingest(&mut self, candidates: &[Candidate<T>]) {
        if self.is_finished() {
            return;
        }
        self.update_suspicious(candidates);
        self.pending = candidates
            .iter()
            .filter(|candidate| !self.is_suspicious(candidate.sender))
            .map(|candidate| candidate.transaction.clone())
            .collect();
        self.round += 1;
    }
}
