use crate::{
    Amount, Ed25519Verifier, SignatureVerifier, Transaction, TransactionOutput, Utxo, UtxoPool,
};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, info};

/// Why a transaction was rejected. It never leaves this module: callers only learn whether a
/// transaction was accepted, the reason is logged.
#[derive(Debug, Error)]
enum Rejection {
    #[error("input {index} claims {utxo} which is not in the pool")]
    MissingUtxo { index: usize, utxo: Utxo },

    #[error("input {index} has an invalid signature for {utxo}")]
    InvalidSignature { index: usize, utxo: Utxo },

    #[error("input {index} claims {utxo} more than once")]
    DoubleSpend { index: usize, utxo: Utxo },

    #[error("output {index} has a negative amount: {amount}")]
    NegativeOutput { index: usize, amount: Amount },

    #[error("inputs sum to {inputs} which is less than outputs sum {outputs}")]
    InsufficientInputs { inputs: i128, outputs: i128 },
}

/// The public ledger. It owns the pool of unspent outputs, decides which transactions are legal
/// against it and commits the legal ones.
pub struct LedgerValidator<V = Ed25519Verifier> {
    pool: UtxoPool,
    verifier: V,
}

impl LedgerValidator<Ed25519Verifier> {
    pub fn new(pool: UtxoPool) -> Self {
        Self::with_verifier(pool, Ed25519Verifier)
    }
}

impl<V: SignatureVerifier> LedgerValidator<V> {
    pub fn with_verifier(pool: UtxoPool, verifier: V) -> Self {
        Self { pool, verifier }
    }

    pub fn pool(&self) -> &UtxoPool {
        &self.pool
    }

    /// Returns true if:
    ///   (1) all outputs claimed by the transaction are in the current pool,
    ///   (2) the signatures on each input are valid,
    ///   (3) no output is claimed multiple times,
    ///   (4) all output amounts are non-negative, and
    ///   (5) the sum of input amounts is greater than or equal to the sum of output amounts.
    pub fn validate(&self, transaction: &Transaction) -> bool {
        match self.check(transaction) {
            Ok(()) => true,
            Err(rejection) => {
                debug!(transaction = %transaction.id(), %rejection, "transaction rejected");
                false
            }
        }
    }

    /// Handles one epoch: goes through the proposed transactions in the given order and accepts
    /// each one that is valid against the pool as updated by the transactions accepted before it.
    /// Returns the accepted transactions in acceptance order.
    ///
    /// The accepted set is mutually consistent, but not necessarily the largest possible one.
    pub fn apply_epoch(&mut self, proposed: &[Transaction]) -> Vec<Transaction> {
        let mut accepted = Vec::new();
        for transaction in proposed {
            if self.validate(transaction) {
                self.pool.apply(transaction);
                accepted.push(transaction.clone());
            }
        }
        info!(
            proposed = proposed.len(),
            accepted = accepted.len(),
            pool_size = self.pool.len(),
            "epoch applied"
        );
        accepted
    }

    fn check(&self, transaction: &Transaction) -> Result<(), Rejection> {
        let input_sum = self.check_inputs(transaction)?;
        Self::check_outputs(transaction.outputs())?;
        Self::check_fee(input_sum, transaction.outputs())
    }

    /// Validates every input in order and returns the total amount they claim.
    fn check_inputs(&self, transaction: &Transaction) -> Result<i128, Rejection> {
        let mut claimed = HashSet::new();
        let mut input_sum: i128 = 0;
        for (index, input) in transaction.inputs().iter().enumerate() {
            let utxo = input.utxo();
            let output = self
                .pool
                .get(&utxo)
                .ok_or(Rejection::MissingUtxo { index, utxo })?;
            if !self.is_signature_valid(transaction, index, output) {
                return Err(Rejection::InvalidSignature { index, utxo });
            }
            if !claimed.insert(utxo) {
                return Err(Rejection::DoubleSpend { index, utxo });
            }
            input_sum += output.amount() as i128;
        }
        Ok(input_sum)
    }

    fn is_signature_valid(
        &self,
        transaction: &Transaction,
        index: usize,
        spent_output: &TransactionOutput,
    ) -> bool {
        let signature = match transaction.inputs()[index].signature() {
            Some(signature) => signature,
            None => return false,
        };
        match transaction.signing_payload(index) {
            Ok(payload) => self.verifier.verify(spent_output.to(), &payload, signature),
            Err(_) => false,
        }
    }

    fn check_outputs(outputs: &[TransactionOutput]) -> Result<(), Rejection> {
        match outputs
            .iter()
            .enumerate()
            .find(|(_, output)| output.amount() < 0)
        {
            Some((index, output)) => Err(Rejection::NegativeOutput {
                index,
                amount: output.amount(),
            }),
            None => Ok(()),
        }
    }

    fn check_fee(input_sum: i128, outputs: &[TransactionOutput]) -> Result<(), Rejection> {
        let output_sum = outputs
            .iter()
            .map(|output| output.amount() as i128)
            .sum::<i128>();
        if input_sum >= output_sum {
            Ok(())
        } else {
            Err(Rejection::InsufficientInputs {
                inputs: input_sum,
                outputs: output_sum,
            })
        }
    }
}
