//! `eqs`: natural-language search over EDA state-table catalogs.
//!
//! Results go to stdout; logs go to stderr, filtered by `RUST_LOG`.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use eqs_cli::Cli;

fn init_tracing(cli: &Cli) {
    let default_level = if cli.verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if cli.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "eqs starting");

    let mut stdout = std::io::stdout().lock();
    eqs_cli::run(&cli, &mut stdout).await
}
