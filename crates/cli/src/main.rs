mod cmd;
mod output;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cmd::BuildArgs;
use output::print_error;

/// folio - static site builder
#[derive(Parser)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build the site in the current directory
  Build(BuildArgs),
}

impl Cli {
  fn verbose(&self) -> bool {
    match &self.command {
      Commands::Build(args) => args.verbose,
    }
  }
}

fn init_tracing(verbose: bool) {
  let default = if verbose { "info" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.verbose());

  let result = match &cli.command {
    Commands::Build(args) => cmd::cmd_build(args),
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      print_error(&e.to_string());
      ExitCode::FAILURE
    }
  }
}
