use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

use kiln_schema::BackendConfig;

mod manifest;

/// kiln - container image build dispatcher
#[derive(Parser)]
#[command(name = "kiln")]
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
  /// Materialize every artifact in a manifest and report its configuration
  Inspect {
    /// Path to the build manifest (default: kiln.yaml)
    #[arg(short = 'f', long = "file", default_value = "kiln.yaml")]
    file: PathBuf,
  },
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let result = match cli.command {
    Commands::Inspect { file } => inspect(&file),
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      eprintln!("{} {:#}", "error:".red().bold(), err);
      ExitCode::FAILURE
    }
  }
}

fn init_tracing(verbose: bool) {
  let default_filter = if verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .init();
}

/// Materialize every artifact and print what each resolved to.
///
/// Stops at the first failure, as the dispatcher would, and reports the
/// full error chain with a non-zero exit.
fn inspect(file: &Path) -> anyhow::Result<()> {
  let manifest = manifest::load(file).with_context(|| format!("loading {}", file.display()))?;

  println!("environment: {}", manifest.environment.name.bold());
  for mut artifact in manifest.artifacts {
    kiln_build::materialize(&mut artifact)
      .with_context(|| format!("materializing '{}'", artifact.image_name))?;

    let summary = match &artifact.backend {
      Some(BackendConfig::Bazel(config)) => format!("bazel target {}", config.build_target),
      Some(BackendConfig::Docker(config)) => format!("docker file {}", config.dockerfile_path),
      None => unreachable!("materialize guarantees a backend config"),
    };
    println!("  {} {} ({})", "ok".green(), artifact.image_name.bold(), summary);
  }
  Ok(())
}
