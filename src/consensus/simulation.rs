use crate::consensus::{
    Candidate, CompliantNode, MaliciousNode, Node, PeerIndex, ProposedTransaction,
};
use crate::{ConfigError, SimulationConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeSet, HashSet};
use std::fmt::{Display, Formatter};
use tracing::{debug, info};

/// Drives a network of compliant and malicious nodes through the round protocol and delivers
/// the messages between them.
pub struct Simulation {
    config: SimulationConfig,
    seed: u64,
    nodes: Vec<Box<dyn Node<ProposedTransaction>>>,
    // followees[i][j] is true if node i follows node j.
    followees: Vec<Vec<bool>>,
}

impl Simulation {
    /// Builds the network: picks malicious nodes, draws the follow graph and distributes the
    /// initial transactions. All randomness comes from the configured seed.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);
        let params = config.network_params();
        let num_nodes = config.num_nodes;

        let mut nodes: Vec<Box<dyn Node<ProposedTransaction>>> = (0..num_nodes)
            .map(|_| -> Box<dyn Node<ProposedTransaction>> {
                if rng.gen_bool(config.p_malicious) {
                    Box::new(MaliciousNode::new(config.malicious_behavior))
                } else {
                    Box::new(CompliantNode::new(&params))
                }
            })
            .collect();

        let followees = (0..num_nodes)
            .map(|i| {
                (0..num_nodes)
                    .map(|j| i != j && rng.gen_bool(config.p_graph))
                    .collect::<Vec<bool>>()
            })
            .collect::<Vec<Vec<bool>>>();
        for (node, mask) in nodes.iter_mut().zip(&followees) {
            node.configure(mask.clone());
        }

        // Bounded by validate().
        let num_transactions = u32::try_from(config.num_transactions).unwrap_or(u32::MAX);
        for node in nodes.iter_mut() {
            let initial = (0..num_transactions)
                .filter(|_| rng.gen_bool(config.p_tx_distribution))
                .map(ProposedTransaction::new)
                .collect::<HashSet<ProposedTransaction>>();
            node.seed_transactions(initial);
        }

        info!(
            seed,
            num_nodes,
            malicious = nodes.iter().filter(|node| node.is_malicious()).count(),
            "simulation network created"
        );
        Ok(Self {
            config,
            seed,
            nodes,
            followees,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Runs every round and reports what the compliant nodes ended up agreeing on.
    pub fn run(mut self) -> SimulationReport {
        for round in 0..self.config.num_rounds {
            self.run_round(round);
        }
        self.report()
    }

    fn run_round(&mut self, round: usize) {
        let proposals = self
            .nodes
            .iter()
            .map(|node| node.emit())
            .collect::<Vec<HashSet<ProposedTransaction>>>();

        let mut inboxes: Vec<Vec<Candidate<ProposedTransaction>>> = vec![vec![]; self.nodes.len()];
        for (follower, mask) in self.followees.iter().enumerate() {
            for (sender, follows) in mask.iter().enumerate() {
                if *follows {
                    inboxes[follower].extend(
                        proposals[sender]
                            .iter()
                            .map(|transaction| Candidate::new(*transaction, sender)),
                    );
                }
            }
        }

        for (node, inbox) in self.nodes.iter_mut().zip(&inboxes) {
            node.ingest(inbox);
        }
        debug!(
            round,
            messages = inboxes.iter().map(Vec::len).sum::<usize>(),
            "round delivered"
        );
    }

    fn report(&self) -> SimulationReport {
        let compliant = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| !node.is_malicious())
            .map(|(index, node)| (index, node.emit().into_iter().collect::<BTreeSet<_>>()))
            .collect::<Vec<(PeerIndex, BTreeSet<ProposedTransaction>)>>();
        let report = SimulationReport {
            seed: self.seed,
            num_rounds: self.config.num_rounds,
            num_nodes: self.nodes.len(),
            compliant,
        };
        info!(
            compliant = report.compliant.len(),
            agreed = report.agreement().len(),
            unanimous = report.is_unanimous(),
            "simulation finished"
        );
        report
    }
}

/// The final transaction sets of the compliant nodes.
#[derive(Debug, Clone)]
pub struct SimulationReport {
    pub seed: u64,
    pub num_rounds: usize,
    pub num_nodes: usize,
    pub compliant: Vec<(PeerIndex, BTreeSet<ProposedTransaction>)>,
}

impl SimulationReport {
    /// Transactions every compliant node believes in.
    pub fn agreement(&self) -> BTreeSet<ProposedTransaction> {
        let mut sets = self.compliant.iter().map(|(_, set)| set);
        match sets.next() {
            None => BTreeSet::new(),
            Some(first) => sets.fold(first.clone(), |agreed, set| {
                agreed.intersection(set).copied().collect()
            }),
        }
    }

    /// Returns true if all compliant nodes ended with the same set.
    pub fn is_unanimous(&self) -> bool {
        self.compliant
            .windows(2)
            .all(|pair| pair[0].1 == pair[1].1)
    }
}

impl Display for SimulationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Seed: {}, nodes: {}, compliant: {}, rounds: {}",
            self.seed,
            self.num_nodes,
            self.compliant.len(),
            self.num_rounds
        )?;
        for (index, transactions) in &self.compliant {
            writeln!(f, "Node {}: {} transactions", index, transactions.len())?;
        }
        write!(
            f,
            "Agreed on {} transactions, unanimous: {}",
            self.agreement().len(),
            self.is_unanimous()
        )
    }
}
