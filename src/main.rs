use clap::Parser;
use ilm_health::cli::Cli;
use std::process;

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    cli.init_logging();

    if let Err(e) = ilm_health::run_command(cli.command, cli.config.as_deref()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
