mod cmd;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cmd::{BuildArgs, ModulesArgs};

/// packsmith - assemble resource packs from modules
#[derive(Parser)]
#[command(name = "packsmith")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build a pack archive from the selected modules
  Build(BuildArgs),

  /// List the modules found in the module directories
  Modules(ModulesArgs),
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let result = match cli.command {
    Commands::Build(args) => cmd::cmd_build(args),
    Commands::Modules(args) => cmd::cmd_modules(args),
  };

  if let Err(ref e) = result {
    output::status(output::Tone::Fail, &format!("{:#}", e));
    std::process::exit(1);
  }

  Ok(())
}
