use crate::{
    Address, Amount, Keypair, LedgerValidator, Transaction, TransactionBuilder, TransactionError,
    TransactionOutput, Utxo, UtxoPool,
};
use clap::{Arg, ArgMatches, Command};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::error::Error;

const GENESIS_AMOUNT: Amount = 100;
// Probability that a generated transfer is signed by someone other than the owner.
const FORGERY_PROBABILITY: f64 = 0.1;
// Probability that a generated transfer pays out more than it spends.
const OVERSPEND_PROBABILITY: f64 = 0.1;

struct LedgerCliOptions {
    accounts: usize,
    epochs: usize,
    transactions_per_epoch: usize,
    seed: u64,
}

impl LedgerCliOptions {
    pub fn parse(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            accounts: matches.value_of_t::<usize>("accounts")?,
            epochs: matches.value_of_t::<usize>("epochs")?,
            transactions_per_epoch: matches.value_of_t::<usize>("transactions_per_epoch")?,
            seed: matches.value_of_t::<u64>("seed")?,
        })
    }
}

pub fn ledger_command() -> Command<'static> {
    Command::new("ledger")
        .version("0.1")
        .about("Proposes random transfers between accounts and settles them epoch by epoch.")
        .arg(
            Arg::new("accounts")
                .long("accounts")
                .value_name("N")
                .help("Number of accounts, each funded by a genesis transaction.")
                .takes_value(true)
                .default_value("5"),
        )
        .arg(
            Arg::new("epochs")
                .long("epochs")
                .value_name("N")
                .help("Number of epochs to settle.")
                .takes_value(true)
                .default_value("10"),
        )
        .arg(
            Arg::new("transactions_per_epoch")
                .long("transactions_per_epoch")
                .value_name("N")
                .help("Number of transfers proposed in every epoch.")
                .takes_value(true)
                .default_value("8"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_name("SEED")
                .help("Seed for keys and transfers.")
                .takes_value(true)
                .default_value("0"),
        )
}

pub fn run_ledger_command(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let options = LedgerCliOptions::parse(matches)?;
    let mut rng = StdRng::seed_from_u64(options.seed);
    let accounts = (0..options.accounts)
        .map(|_| Keypair::generate(&mut rng))
        .collect::<Vec<Keypair>>();
    if accounts.is_empty() {
        return Err("At least one account is required.".into());
    }

    let genesis = accounts
        .iter()
        .map(|account| Transaction::coinbase(account.address(), GENESIS_AMOUNT))
        .collect::<Result<Vec<Transaction>, TransactionError>>()?;
    let mut validator = LedgerValidator::new(UtxoPool::from_transactions(&genesis));
    println!(
        "Genesis: {} accounts, {} coins",
        accounts.len(),
        validator.pool().total_amount()
    );

    for epoch in 0..options.epochs {
        let proposed = propose_transfers(
            &mut rng,
            &accounts,
            validator.pool(),
            options.transactions_per_epoch,
        )?;
        let accepted = validator.apply_epoch(&proposed);
        println!(
            "Epoch {}: proposed {}, accepted {}, unspent outputs {}, coins {}",
            epoch,
            proposed.len(),
            accepted.len(),
            validator.pool().len(),
            validator.pool().total_amount()
        );
    }

    for (address, balance) in balances(validator.pool()) {
        println!("{}: {}", address, balance);
    }
    Ok(())
}

/// Creates transfers that each spend one random unspent output. Some of them claim the same
/// output, some are forged and some overspend, so the validator has something to reject.
fn propose_transfers(
    rng: &mut StdRng,
    accounts: &[Keypair],
    pool: &UtxoPool,
    count: usize,
) -> Result<Vec<Transaction>, TransactionError> {
    let owners = accounts
        .iter()
        .map(|account| (account.address(), account))
        .collect::<HashMap<Address, &Keypair>>();
    // Sorted so that the same seed always proposes the same transfers.
    let mut unspent = pool
        .iter()
        .map(|(utxo, output)| (*utxo, output.clone()))
        .collect::<Vec<(Utxo, TransactionOutput)>>();
    unspent.sort_by_key(|(utxo, _)| *utxo);

    let mut proposed = Vec::with_capacity(count);
    if unspent.is_empty() {
        return Ok(proposed);
    }
    for _ in 0..count {
        let (utxo, output) = &unspent[rng.gen_range(0..unspent.len())];
        let owner = match owners.get(output.to()) {
            Some(owner) => *owner,
            None => continue,
        };
        let recipient = &accounts[rng.gen_range(0..accounts.len())];
        let amount = rng.gen_range(0..=output.amount());
        let mut change = output.amount() - amount;
        if rng.gen_bool(OVERSPEND_PROBABILITY) {
            change += 1;
        }
        let signer = if rng.gen_bool(FORGERY_PROBABILITY) {
            &accounts[rng.gen_range(0..accounts.len())]
        } else {
            owner
        };

        let transaction = TransactionBuilder::new()
            .add_input(*utxo.transaction_id(), *utxo.output_index())
            .add_output(recipient.address(), amount)
            .add_output(owner.address(), change)
            .sign_input(0, signer)?
            .build()?;
        proposed.push(transaction);
    }
    Ok(proposed)
}

/// Sums the unspent outputs per address, ordered by address for stable output.
fn balances(pool: &UtxoPool) -> Vec<(String, Amount)> {
    let mut balances = HashMap::new();
    for (_, output) in pool.iter() {
        *balances.entry(output.to().to_string()).or_insert(0) += output.amount();
    }
    let mut balances = balances.into_iter().collect::<Vec<(String, Amount)>>();
    balances.sort();
    balances
}
