pub mod address;
pub mod commands;
pub mod config;
pub mod consensus;
pub mod error;
pub mod hash;
pub mod keys;
pub mod ledger_validator;
pub mod logging;
pub mod transaction;
pub mod utxo;
pub mod utxo_pool;

pub use self::{
    address::*, config::*, error::*, hash::*, keys::*, ledger_validator::*, transaction::*,
    utxo::*, utxo_pool::*,
};
