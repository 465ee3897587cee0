//! `lapis`: selector utilities and manifest-driven diamond deployments.

mod cli;
mod commands;

use clap::Parser;
use cli::Cli;

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	setup_tracing(cli.verbose);

	let output = commands::run(cli.command)?;
	println!("{output}");
	Ok(())
}

/// Logs to stderr. `LAPIS_LOG` takes an `EnvFilter` directive and overrides `-v`.
fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_env("LAPIS_LOG").unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("lapis_diamond=debug,lapis_registry=debug,info")
		} else {
			EnvFilter::new("warn")
		}
	});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(verbose)
		.init();
}
