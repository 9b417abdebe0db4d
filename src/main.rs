use clap::{Arg, Command};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let matches = Command::new("scroogecoin")
        .about("ScroogeCoin ledger and consensus simulation tools.")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("log_level")
                .long("log_level")
                .value_name("LEVEL")
                .help("Log filter used when RUST_LOG is not set, e.g. info or debug.")
                .takes_value(true)
                .global(true)
                .default_value("warn"),
        )
        .subcommand(scroogecoin_lib::commands::ledger_command())
        .subcommand(scroogecoin_lib::commands::simulate_command())
        .get_matches();

    scroogecoin_lib::logging::init_logging(matches.value_of("log_level").unwrap_or("warn"));

    if let Some(matches) = matches.subcommand_matches("ledger") {
        scroogecoin_lib::commands::run_ledger_command(matches)
    } else if let Some(matches) = matches.subcommand_matches("simulate") {
        scroogecoin_lib::commands::run_simulate_command(matches)
    } else {
        unreachable!("A subcommand is required.")
    }
}
