use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use automata_config::{FaDef, NetworkDef};
use automata_language::{extract_language, extract_languages};
use automata_model::Named;
use automata_resolver::{Resolver, StandardResolver, describe_network};
use automata_supervisor::{enabled_transitions_for_network, execute_by_name};

/// Automata - regular languages and networks of behavioral automata
#[derive(Parser)]
#[command(name = "automata")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Log at debug level (RUST_LOG takes precedence)
  #[arg(long, short, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Print the regular expression accepted by a finite automaton
  Language {
    /// Path to the automaton file (JSON), or `-` for stdin
    fa_file: PathBuf,

    /// Print one expression per acceptance state as a JSON object
    #[arg(long)]
    per_state: bool,
  },

  /// Print the enabled transitions of every automaton in a network
  Enabled {
    /// Path to the network file (JSON), or `-` for stdin
    network_file: PathBuf,
  },

  /// Execute one transition and print the resulting network snapshot
  Fire {
    /// Path to the network file (JSON), or `-` for stdin
    network_file: PathBuf,

    /// Name of the automaton owning the transition
    #[arg(long)]
    automaton: String,

    /// Name of the transition to execute
    #[arg(long)]
    transition: String,

    /// Write the snapshot back to the network file instead of stdout
    #[arg(long)]
    in_place: bool,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  match cli.command {
    Some(Commands::Language { fa_file, per_state }) => language(&fa_file, per_state)?,
    Some(Commands::Enabled { network_file }) => enabled(&network_file)?,
    Some(Commands::Fire {
      network_file,
      automaton,
      transition,
      in_place,
    }) => fire(&network_file, &automaton, &transition, in_place)?,
    None => {
      println!("automata - use --help to see available commands");
    }
  }

  Ok(())
}

fn init_tracing(verbose: bool) {
  let default = if verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(io::stderr)
    .init();
}

fn language(fa_file: &Path, per_state: bool) -> Result<()> {
  let content = read_input(fa_file)?;
  let fa_def: FaDef = serde_json::from_str(&content)
    .with_context(|| format!("failed to parse automaton file: {}", fa_file.display()))?;

  let fa = StandardResolver::new()
    .resolve_fa(fa_def)
    .context("failed to resolve automaton")?;
  info!(automaton = %fa.name(), states = fa.graph().node_count(), "automaton loaded");

  if per_state {
    println!("{}", serde_json::to_string_pretty(&extract_languages(&fa))?);
  } else {
    println!("{}", extract_language(&fa));
  }

  Ok(())
}

fn enabled(network_file: &Path) -> Result<()> {
  let network = StandardResolver::new()
    .resolve_network(read_network(network_file)?)
    .context("failed to resolve network")?;

  let output: BTreeMap<String, Vec<String>> = enabled_transitions_for_network(&network)
    .into_iter()
    .filter_map(|(id, transitions)| {
      let bfa = network.bfa(id)?;
      let names = transitions
        .into_iter()
        .filter_map(|edge| bfa.graph().edge(edge).map(|t| t.name().to_string()))
        .collect();
      Some((bfa.name().to_string(), names))
    })
    .collect();

  println!("{}", serde_json::to_string_pretty(&output)?);

  Ok(())
}

fn fire(network_file: &Path, automaton: &str, transition: &str, in_place: bool) -> Result<()> {
  if in_place && is_stdin(network_file) {
    bail!("--in-place needs a network file, not stdin");
  }

  let mut network = StandardResolver::new()
    .resolve_network(read_network(network_file)?)
    .context("failed to resolve network")?;

  execute_by_name(&mut network, automaton, transition)
    .with_context(|| format!("failed to fire transition '{transition}' of '{automaton}'"))?;

  let snapshot = serde_json::to_string_pretty(&describe_network(&network))?;
  if in_place {
    fs::write(network_file, snapshot + "\n")
      .with_context(|| format!("failed to write network file: {}", network_file.display()))?;
    eprintln!("Updated {}", network_file.display());
  } else {
    println!("{snapshot}");
  }

  Ok(())
}

fn read_network(network_file: &Path) -> Result<NetworkDef> {
  let content = read_input(network_file)?;
  serde_json::from_str(&content)
    .with_context(|| format!("failed to parse network file: {}", network_file.display()))
}

fn is_stdin(path: &Path) -> bool {
  path.as_os_str() == "-"
}

fn read_input(path: &Path) -> Result<String> {
  if !is_stdin(path) {
    return fs::read_to_string(path)
      .with_context(|| format!("failed to read file: {}", path.display()));
  }

  let mut input = String::new();
  io::stdin()
    .read_to_string(&mut input)
    .context("failed to read from stdin")?;
  Ok(input)
}
