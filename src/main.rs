// Entrypoint for the NAC command-line tool.
// - Keeps `main` small: parse arguments, build a client, dispatch once.
// - Usage errors print a message and exit 1; client errors propagate as
//   `anyhow` errors so the full context reaches the terminal.

use anyhow::Context;
use clap::Parser;
use tallac_nac_cli::cli::{run, Cli};
use tallac_nac_cli::{Error, NacClient};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version are reported through this path too.
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            std::process::exit(code);
        }
    };
    info!("Specified sub-command {}", cli.command.name());

    let client = NacClient::new(cli.client_config()).context("Failed to build NAC client")?;
    match run(&cli.command, &client) {
        Ok(output) => {
            println!("{output}");
            Ok(())
        }
        Err(Error::Usage(msg)) => {
            println!("{msg}");
            std::process::exit(1);
        }
        Err(err) => Err(err).with_context(|| format!("{} failed", cli.command.name())),
    }
}
