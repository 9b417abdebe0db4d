pub mod candidate;
pub mod compliant_node;
pub mod malicious_node;
pub mod node;
pub mod simulation;

pub use self::{
    candidate::{Candidate, PeerIndex, ProposedTransaction},
    compliant_node::CompliantNode,
    malicious_node::{MaliciousBehavior, MaliciousNode},
    node::{NetworkParams, Node},
    simulation::{Simulation, SimulationReport},
};
