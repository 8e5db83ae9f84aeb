mod cli;
mod commands;
mod save;

use clap::Parser;

fn main() {
    let cli = cli::Cli::parse();

    let guard = match prdiff_core::logging::init(&cli.log_level, cli.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let result = commands::execute(cli);
    // Flush buffered log lines before exiting
    drop(guard);

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
