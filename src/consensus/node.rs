use crate::consensus::Candidate;
use std::collections::HashSet;

/// Parameters the harness hands to every node it creates.
/// Only `num_rounds` affects how a node behaves, the probabilities describe the network the node
/// is placed in.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NetworkParams {
    // Probability that a node follows any other given node.
    pub p_graph: f64,
    // Probability that a node is malicious.
    pub p_malicious: f64,
    // Probability that a node initially knows a given transaction.
    pub p_tx_distribution: f64,
    pub num_rounds: usize,
}

/// The round protocol every participant in the simulation follows.
///
/// Before round 0 the harness calls `configure` and `seed_transactions` once. Then, each round,
/// it calls `emit` on every node, routes the result to each node's followers and finally calls
/// `ingest` on every node with what it received.
pub trait Node<T> {
    /// `followees[i]` is true if this node listens to node `i`.
    fn configure(&mut self, followees: Vec<bool>);

    fn seed_transactions(&mut self, transactions: HashSet<T>);

    /// The transactions this node forwards to its followers this round.
    fn emit(&self) -> HashSet<T>;

    fn ingest(&mut self, candidates: &[Candidate<T>]);

    fn is_malicious(&self) -> bool {
        false
    }
}
