use crate::{OutputIndex, Transaction, TransactionOutput, Utxo};
use std::collections::HashMap;

/// A pool of confirmed and unspent transaction outputs.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct UtxoPool {
    // Unspent transaction outputs, indexed by their transaction ID and their index in the
    // transaction.
    utxos: HashMap<Utxo, TransactionOutput>,
}

impl UtxoPool {
    pub fn new() -> Self {
        Self {
            utxos: HashMap::new(),
        }
    }

    /// Makes every output of the transaction spendable.
    /// Used to seed a pool from coinbase transactions.
    pub fn from_transactions<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let mut pool = Self::new();
        for transaction in transactions {
            pool.add_outputs_of(transaction);
        }
        pool
    }

    pub fn get(&self, utxo: &Utxo) -> Option<&TransactionOutput> {
        self.utxos.get(utxo)
    }

    pub fn contains(&self, utxo: &Utxo) -> bool {
        self.utxos.contains_key(utxo)
    }

    pub fn len(&self) -> usize {
        self.utxos.len()
    }

    /// Returns all unspent outputs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&Utxo, &TransactionOutput)> {
        self.utxos.iter()
    }

    /// The sum of all unspent amounts. Widened so that large pools cannot overflow.
    pub fn total_amount(&self) -> i128 {
        self.utxos
            .values()
            .map(|output| output.amount() as i128)
            .sum()
    }

    /// Removes the outputs claimed by the transaction's inputs and inserts its own outputs.
    ///
    /// Preconditions:
    ///   - The transaction has been validated against this pool.
    pub fn apply(&mut self, transaction: &Transaction) {
        for input in transaction.inputs() {
            self.utxos.remove(&input.utxo());
        }
        self.add_outputs_of(transaction);
    }

    fn add_outputs_of(&mut self, transaction: &Transaction) {
        for (index, output) in transaction.outputs().iter().enumerate() {
            let utxo = Utxo::new(*transaction.id(), OutputIndex::new(index as u32));
            self.utxos.insert(utxo, output.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Keypair, TransactionBuilder};

    #[test]
    fn seeded_from_coinbase() {
        let alice = Keypair::from_seed([1; 32]);
        let coinbase = Transaction::coinbase(alice.address(), 25).unwrap();
        let pool = UtxoPool::from_transactions(&[coinbase.clone()]);
        assert_eq!(pool.len(), 1);
        let utxo = Utxo::new(*coinbase.id(), OutputIndex::new(0));
        assert_eq!(pool.get(&utxo).unwrap().amount(), 25);
        assert_eq!(pool.total_amount(), 25);
    }

    #[test]
    fn total_amount_does_not_overflow() {
        let alice = Keypair::from_seed([1; 32]);
        let bob = Keypair::from_seed([2; 32]);
        let pool = UtxoPool::from_transactions(&[
            Transaction::coinbase(alice.address(), i64::MAX).unwrap(),
            Transaction::coinbase(bob.address(), i64::MAX).unwrap(),
        ]);
        assert_eq!(pool.total_amount(), 2 * i64::MAX as i128);
    }

    #[test]
    fn apply_moves_outputs() {
        let alice = Keypair::from_seed([1; 32]);
        let bob = Keypair::from_seed([2; 32]);
        let coinbase = Transaction::coinbase(alice.address(), 25).unwrap();
        let mut pool = UtxoPool::from_transactions(&[coinbase.clone()]);

        let transfer = TransactionBuilder::new()
            .add_input(*coinbase.id(), OutputIndex::new(0))
            .add_output(bob.address(), 20)
            .add_output(alice.address(), 5)
            .build()
            .unwrap();
        pool.apply(&transfer);

        assert!(!pool.contains(&Utxo::new(*coinbase.id(), OutputIndex::new(0))));
        assert_eq!(pool.len(), 2);
        let to_bob = pool
            .get(&Utxo::new(*transfer.id(), OutputIndex::new(0)))
            .unwrap();
        assert_eq!(to_bob.to(), &bob.address());
        assert_eq!(to_bob.amount(), 20);
    }
}
