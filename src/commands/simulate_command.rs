use crate::commands::parse_optional;
use crate::consensus::{MaliciousBehavior, Simulation};
use crate::SimulationConfig;
use clap::{Arg, ArgMatches, Command};
use std::error::Error;

struct SimulateCliOptions {
    config: Option<String>,
    num_nodes: Option<usize>,
    num_transactions: Option<usize>,
    p_graph: Option<f64>,
    p_malicious: Option<f64>,
    p_tx_distribution: Option<f64>,
    num_rounds: Option<usize>,
    seed: Option<u64>,
    malicious_behavior: Option<MaliciousBehavior>,
}

impl SimulateCliOptions {
    pub fn parse(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            config: matches.value_of("config").map(str::to_string),
            num_nodes: parse_optional(matches, "nodes")?,
            num_transactions: parse_optional(matches, "transactions")?,
            p_graph: parse_optional(matches, "p_graph")?,
            p_malicious: parse_optional(matches, "p_malicious")?,
            p_tx_distribution: parse_optional(matches, "p_tx_distribution")?,
            num_rounds: parse_optional(matches, "rounds")?,
            seed: parse_optional(matches, "seed")?,
            malicious_behavior: parse_optional(matches, "malicious_behavior")?,
        })
    }

    /// Loads the config file, if any, and applies the command line overrides on top of it.
    fn into_config(self) -> Result<SimulationConfig, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::from_toml_file(path)?,
            None => SimulationConfig::default(),
        };
        if let Some(num_nodes) = self.num_nodes {
            config.num_nodes = num_nodes;
        }
        if let Some(num_transactions) = self.num_transactions {
            config.num_transactions = num_transactions;
        }
        if let Some(p_graph) = self.p_graph {
            config.p_graph = p_graph;
        }
        if let Some(p_malicious) = self.p_malicious {
            config.p_malicious = p_malicious;
        }
        if let Some(p_tx_distribution) = self.p_tx_distribution {
            config.p_tx_distribution = p_tx_distribution;
        }
        if let Some(num_rounds) = self.num_rounds {
            config.num_rounds = num_rounds;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(malicious_behavior) = self.malicious_behavior {
            config.malicious_behavior = malicious_behavior;
        }
        config.validate()?;
        Ok(config)
    }
}

fn value_arg(name: &'static str, value_name: &'static str, help: &'static str) -> Arg<'static> {
    Arg::new(name)
        .long(name)
        .value_name(value_name)
        .help(help)
        .takes_value(true)
        .required(false)
}

pub fn simulate_command() -> Command<'static> {
    Command::new("simulate")
        .version("0.1")
        .about("Runs the consensus simulation between compliant and malicious nodes.")
        .arg(value_arg(
            "config",
            "FILE",
            "TOML file with the simulation parameters. Flags override its values.",
        ))
        .arg(value_arg("nodes", "N", "Number of nodes in the network."))
        .arg(value_arg(
            "transactions",
            "N",
            "Number of distinct transactions distributed initially.",
        ))
        .arg(value_arg(
            "p_graph",
            "PROBABILITY",
            "Probability that a node follows any other given node.",
        ))
        .arg(value_arg(
            "p_malicious",
            "PROBABILITY",
            "Probability that a node is malicious.",
        ))
        .arg(value_arg(
            "p_tx_distribution",
            "PROBABILITY",
            "Probability that a node initially knows a given transaction.",
        ))
        .arg(value_arg("rounds", "N", "Number of rounds to simulate."))
        .arg(value_arg("seed", "SEED", "Seed for a reproducible run."))
        .arg(value_arg(
            "malicious_behavior",
            "silent|stubborn|intermittent",
            "How malicious nodes misbehave.",
        ))
}

pub fn run_simulate_command(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let config = SimulateCliOptions::parse(matches)?.into_config()?;
    let report = Simulation::new(config)?.run();
    println!("{}", report);
    Ok(())
}
