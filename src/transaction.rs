use crate::{Address, Keypair, Sha256, Signature, TransactionError, Utxo};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Amounts are signed so that a malformed transaction with a negative output can be
/// represented, and then rejected by the validator.
pub type Amount = i64;

/// A double SHA-256 hash of the transaction data.
#[derive(Debug, Hash, Ord, PartialOrd, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub struct TransactionId(Sha256);

impl Display for TransactionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TransactionId {
    pub fn new(data: Sha256) -> Self {
        Self(data)
    }
}

/// The index of the transaction output, the first one is 0.
#[derive(Debug, Hash, Ord, PartialOrd, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub struct OutputIndex(u32);

impl Display for OutputIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl OutputIndex {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct TransactionInput {
    // A pointer to the transaction containing the output to be spent.
    utxo_id: TransactionId,
    // The position of the output to be spent in that transaction.
    output_index: OutputIndex,
    // Proof that the owner of the referenced output authorized this transaction.
    // It is absent until the input is signed.
    signature: Option<Signature>,
}

impl Display for TransactionInput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.utxo_id, self.output_index)
    }
}

impl TransactionInput {
    pub fn new(utxo_id: TransactionId, output_index: OutputIndex) -> Self {
        Self {
            utxo_id,
            output_index,
            signature: None,
        }
    }

    pub fn utxo_id(&self) -> &TransactionId {
        &self.utxo_id
    }

    pub fn output_index(&self) -> &OutputIndex {
        &self.output_index
    }

    pub fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    /// The unspent output this input claims.
    pub fn utxo(&self) -> Utxo {
        Utxo::new(self.utxo_id, self.output_index)
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct TransactionOutput {
    to: Address,
    amount: Amount,
}

impl Display for TransactionOutput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.amount, self.to)
    }
}

impl TransactionOutput {
    pub fn new(to: Address, amount: Amount) -> Self {
        Self { to, amount }
    }

    pub fn to(&self) -> &Address {
        &self.to
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }
}

/// Everything input `index` commits to: the output it spends and all outputs of the transaction.
/// None of the signatures are part of it, so signing one input never invalidates another.
#[derive(Serialize)]
struct SigningPayload<'a> {
    utxo_id: &'a TransactionId,
    output_index: &'a OutputIndex,
    outputs: &'a [TransactionOutput],
}

#[derive(Serialize)]
struct TransactionData<'a> {
    inputs: &'a [TransactionInput],
    outputs: &'a [TransactionOutput],
}

fn signing_payload(
    inputs: &[TransactionInput],
    outputs: &[TransactionOutput],
    index: usize,
) -> Result<Vec<u8>, TransactionError> {
    let input = inputs.get(index).ok_or(TransactionError::InputOutOfRange {
        index,
        len: inputs.len(),
    })?;
    let payload = SigningPayload {
        utxo_id: &input.utxo_id,
        output_index: &input.output_index,
        outputs,
    };
    Ok(bincode::serialize(&payload)?)
}

/// A transfer of coins, immutable once constructed.
/// Use `TransactionBuilder` to assemble and sign a new transaction.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Transaction {
    id: TransactionId,
    inputs: Vec<TransactionInput>,
    outputs: Vec<TransactionOutput>,
}

impl Transaction {
    pub fn new(
        inputs: Vec<TransactionInput>,
        outputs: Vec<TransactionOutput>,
    ) -> Result<Self, TransactionError> {
        let id = Self::hash_transaction_data(&inputs, &outputs)?;
        Ok(Self {
            id,
            inputs,
            outputs,
        })
    }

    /// A transaction that mints `amount` coins to `to` out of nothing.
    /// It is only meant for seeding the initial pool.
    pub fn coinbase(to: Address, amount: Amount) -> Result<Self, TransactionError> {
        Self::new(vec![], vec![TransactionOutput::new(to, amount)])
    }

    pub fn id(&self) -> &TransactionId {
        &self.id
    }

    pub fn inputs(&self) -> &Vec<TransactionInput> {
        &self.inputs
    }

    pub fn outputs(&self) -> &Vec<TransactionOutput> {
        &self.outputs
    }

    /// Returns the bytes that the owner of input `index` must sign.
    pub fn signing_payload(&self, index: usize) -> Result<Vec<u8>, TransactionError> {
        signing_payload(&self.inputs, &self.outputs, index)
    }

    fn hash_transaction_data(
        inputs: &[TransactionInput],
        outputs: &[TransactionOutput],
    ) -> Result<TransactionId, TransactionError> {
        let data = bincode::serialize(&TransactionData { inputs, outputs })?;
        Ok(TransactionId(Sha256::double_digest(&data)))
    }
}

/// Collects inputs and outputs, lets the owners sign their inputs and produces the final
/// transaction.
#[derive(Debug, Default, Clone)]
pub struct TransactionBuilder {
    inputs: Vec<TransactionInput>,
    outputs: Vec<TransactionOutput>,
}

impl TransactionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_input(&mut self, utxo_id: TransactionId, output_index: OutputIndex) -> &mut Self {
        self.inputs
            .push(TransactionInput::new(utxo_id, output_index));
        self
    }

    pub fn add_output(&mut self, to: Address, amount: Amount) -> &mut Self {
        self.outputs.push(TransactionOutput::new(to, amount));
        self
    }

    pub fn signing_payload(&self, index: usize) -> Result<Vec<u8>, TransactionError> {
        signing_payload(&self.inputs, &self.outputs, index)
    }

    /// Attaches an externally produced signature to input `index`.
    pub fn set_signature(
        &mut self,
        index: usize,
        signature: Signature,
    ) -> Result<&mut Self, TransactionError> {
        let len = self.inputs.len();
        let input = self
            .inputs
            .get_mut(index)
            .ok_or(TransactionError::InputOutOfRange { index, len })?;
        input.signature = Some(signature);
        Ok(self)
    }

    /// Signs input `index` with the given keypair.
    /// Outputs must be final, adding an output afterwards invalidates the signature.
    pub fn sign_input(
        &mut self,
        index: usize,
        keypair: &Keypair,
    ) -> Result<&mut Self, TransactionError> {
        let payload = self.signing_payload(index)?;
        self.set_signature(index, keypair.sign(&payload))
    }

    pub fn build(&self) -> Result<Transaction, TransactionError> {
        Transaction::new(self.inputs.clone(), self.outputs.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Ed25519Verifier, SignatureVerifier};

    fn funding_id() -> TransactionId {
        TransactionId::new(Sha256::digest(b"funding"))
    }

    #[test]
    fn signing_payload_ignores_signatures() {
        let alice = Keypair::from_seed([1; 32]);
        let mut builder = TransactionBuilder::new();
        builder
            .add_input(funding_id(), OutputIndex::new(0))
            .add_input(funding_id(), OutputIndex::new(1))
            .add_output(alice.address(), 10);
        let before = builder.signing_payload(1).unwrap();
        builder.sign_input(0, &alice).unwrap();
        assert_eq!(builder.signing_payload(1).unwrap(), before);
    }

    #[test]
    fn signing_payload_differs_per_input() {
        let alice = Keypair::from_seed([1; 32]);
        let transaction = TransactionBuilder::new()
            .add_input(funding_id(), OutputIndex::new(0))
            .add_input(funding_id(), OutputIndex::new(1))
            .add_output(alice.address(), 10)
            .build()
            .unwrap();
        assert_ne!(
            transaction.signing_payload(0).unwrap(),
            transaction.signing_payload(1).unwrap()
        );
    }

    #[test]
    fn signing_payload_out_of_range() {
        let transaction = TransactionBuilder::new().build().unwrap();
        assert!(matches!(
            transaction.signing_payload(0),
            Err(TransactionError::InputOutOfRange { index: 0, len: 0 })
        ));
    }

    #[test]
    fn signature_verifies_against_built_transaction() {
        let alice = Keypair::from_seed([1; 32]);
        let bob = Keypair::from_seed([2; 32]);
        let transaction = TransactionBuilder::new()
            .add_input(funding_id(), OutputIndex::new(0))
            .add_output(bob.address(), 5)
            .sign_input(0, &alice)
            .unwrap()
            .build()
            .unwrap();
        let signature = transaction.inputs()[0].signature().unwrap();
        let payload = transaction.signing_payload(0).unwrap();
        assert!(Ed25519Verifier.verify(&alice.address(), &payload, signature));
    }

    #[test]
    fn id_covers_signatures() {
        let alice = Keypair::from_seed([1; 32]);
        let mut builder = TransactionBuilder::new();
        builder
            .add_input(funding_id(), OutputIndex::new(0))
            .add_output(alice.address(), 10);
        let unsigned = builder.build().unwrap();
        let signed = builder.sign_input(0, &alice).unwrap().build().unwrap();
        assert_ne!(unsigned.id(), signed.id());
    }

    #[test]
    fn coinbase_ids_depend_on_recipient() {
        let alice = Keypair::from_seed([1; 32]);
        let bob = Keypair::from_seed([2; 32]);
        let a = Transaction::coinbase(alice.address(), 10).unwrap();
        let b = Transaction::coinbase(bob.address(), 10).unwrap();
        assert_ne!(a.id(), b.id());
        assert!(a.inputs().is_empty());
    }
}
