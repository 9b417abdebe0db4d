pub mod ledger_command;
pub mod simulate_command;

pub use self::{ledger_command::*, simulate_command::*};

use clap::ArgMatches;
use std::error::Error;
use std::str::FromStr;

/// Parses an optional argument, failing only when it is present but malformed.
fn parse_optional<T>(matches: &ArgMatches, name: &str) -> Result<Option<T>, Box<dyn Error>>
where
    T: FromStr,
    T::Err: Error + 'static,
{
    match matches.value_of(name) {
        Some(value) => Ok(Some(value.parse::<T>()?)),
        None => Ok(None),
    }
}
