//! Cocina CLI — recipe analytics charts.

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "cocina",
    version,
    about = "Recipe analytics charts — CSV-or-synthetic resolution, pure aggregation, deterministic artifacts"
)]
struct Cli {
    #[command(subcommand)]
    command: cocina::cli::Commands,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = cocina::cli::dispatch(cli.command) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
