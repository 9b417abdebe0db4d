use crate::consensus::{Candidate, Node};
use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::hash::Hash;
use std::str::FromStr;

/// How a malicious node misbehaves.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaliciousBehavior {
    /// Never proposes anything.
    #[default]
    Silent,
    /// Keeps proposing its initial transactions and ignores everything it receives.
    Stubborn,
    /// Proposes its initial transactions on even rounds only.
    Intermittent,
}

impl Display for MaliciousBehavior {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MaliciousBehavior::Silent => "silent",
            MaliciousBehavior::Stubborn => "stubborn",
            MaliciousBehavior::Intermittent => "intermittent",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for MaliciousBehavior {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "silent" => Ok(MaliciousBehavior::Silent),
            "stubborn" => Ok(MaliciousBehavior::Stubborn),
            "intermittent" => Ok(MaliciousBehavior::Intermittent),
            other => Err(ConfigError::UnknownBehavior(other.to_string())),
        }
    }
}

/// A node that does not follow the rules, used to put compliant nodes under pressure.
#[derive(Debug, Clone)]
pub struct MaliciousNode<T> {
    behavior: MaliciousBehavior,
    round: usize,
    initial: HashSet<T>,
}

impl<T: Clone + Eq + Hash> MaliciousNode<T> {
    pub fn new(behavior: MaliciousBehavior) -> Self {
        Self {
            behavior,
            round: 0,
            initial: HashSet::new(),
        }
    }

    pub fn behavior(&self) -> MaliciousBehavior {
        self.behavior
    }
}

impl<T: Clone + Eq + Hash> Node<T> for MaliciousNode<T> {
    fn configure(&mut self, _followees: Vec<bool>) {}

    fn seed_transactions(&mut self, transactions: HashSet<T>) {
        self.initial = transactions;
    }

    fn emit(&self) -> HashSet<T> {
        match self.behavior {
            MaliciousBehavior::Silent => HashSet::new(),
            MaliciousBehavior::Stubborn => self.initial.clone(),
            MaliciousBehavior::Intermittent if self.round % 2 == 0 => self.initial.clone(),
            MaliciousBehavior::Intermittent => HashSet::new(),
        }
    }

    fn ingest(&mut self, _candidates: &[Candidate<T>]) {
        self.round += 1;
    }

    fn is_malicious(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(behavior: MaliciousBehavior) -> MaliciousNode<u32> {
        let mut node = MaliciousNode::new(behavior);
        node.seed_transactions([1, 2].iter().copied().collect());
        node
    }

    #[test]
    fn silent_never_proposes() {
        let mut node = seeded(MaliciousBehavior::Silent);
        assert!(node.emit().is_empty());
        node.ingest(&[Candidate::new(3, 0)]);
        assert!(node.emit().is_empty());
    }

    #[test]
    fn stubborn_ignores_input() {
        let mut node = seeded(MaliciousBehavior::Stubborn);
        node.ingest(&[Candidate::new(3, 0)]);
        assert_eq!(node.emit(), [1, 2].iter().copied().collect::<HashSet<u32>>());
    }

    #[test]
    fn intermittent_alternates() {
        let mut node = seeded(MaliciousBehavior::Intermittent);
        assert_eq!(node.emit().len(), 2);
        node.ingest(&[]);
        assert!(node.emit().is_empty());
        node.ingest(&[]);
        assert_eq!(node.emit().len(), 2);
    }

    #[test]
    fn behavior_parsing() {
        assert_eq!(
            "stubborn".parse::<MaliciousBehavior>().unwrap(),
            MaliciousBehavior::Stubborn
        );
        assert!("loud".parse::<MaliciousBehavior>().is_err());
        assert_eq!(MaliciousBehavior::Intermittent.to_string(), "intermittent");
        assert_eq!(MaliciousBehavior::default(), MaliciousBehavior::Silent);
    }
}
