//! kbsdp - compile probabilistic pathway knowledge bases into SDPA problems
//!
//! Usage:
//!   kbsdp facts <FILE>
//!   kbsdp ground --facts <FILE> --rules <FILE> [--enforce-guards] [--bound ATOM=V:lower]...
//!   kbsdp encode <PROBLEM.json> -o <OUT.dat-s>
//!
//! Logging goes to stderr and is filtered by `RUST_LOG` (`-v` raises the
//! default level to debug).

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand};
use itertools::Itertools;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use kbsdp::bounds::{resolve_all, BoundSpec};
use kbsdp::facts::FactReader;
use kbsdp::ground::{
    instantiation_lists, Assignments, GroundingBuffers, GroundingEngine, GuardMode,
};
use kbsdp::rules::read_rules_file;
use kbsdp::sdp::{Encoder, SdpProblem};
use kbsdp::{AtomPool, Config, GroundNames, Result};

#[derive(Parser)]
#[command(name = "kbsdp", version, about = "Compile pathway knowledge bases into SDPA problems")]
struct Cli {
    /// Configuration file (default: $KBSDP_CONFIG, then ./kbsdp.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a fact file and print its constraints
    Facts {
        file: PathBuf,
    },
    /// Ground rule constraints over the names introduced by a fact file
    Ground {
        #[arg(long)]
        facts: PathBuf,
        #[arg(long)]
        rules: PathBuf,
        /// Drop instantiations that violate `x != y` guards
        #[arg(long)]
        enforce_guards: bool,
        /// Print the first N instantiations per constraint (guards are
        /// always checked for the printed ones)
        #[arg(long, default_value_t = 0)]
        show: usize,
        /// Variable bound, `ATOM=VALUE:lower|upper`
        #[arg(long = "bound")]
        bounds: Vec<BoundSpec>,
        /// Write the ground-atom table as JSON
        #[arg(long)]
        table_out: Option<PathBuf>,
        /// Write the packed grounding buffers as JSON
        #[arg(long)]
        buffers_out: Option<PathBuf>,
    },
    /// Stream an SDP problem description into an SDPA sparse file
    Encode {
        problem: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if e.is_internal() {
                error!("internal error: {}", e);
            } else {
                error!("{}", e);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };

    match cli.command {
        Command::Facts { file } => cmd_facts(&config, file),
        Command::Ground {
            facts,
            rules,
            enforce_guards,
            show,
            bounds,
            table_out,
            buffers_out,
        } => {
            let mut options = config.grounding.options();
            if enforce_guards {
                options.guards = GuardMode::Enforce;
            }
            let mut pool = AtomPool::new();
            let mut names = GroundNames::new();

            let start = Instant::now();
            let fact_constraints =
                FactReader::new(&config.predicates, &mut names, &mut pool).parse_file(&facts)?;
            info!(
                facts = fact_constraints.len(),
                names = names.total(),
                elapsed = ?start.elapsed(),
                "read facts"
            );

            let start = Instant::now();
            let rule_set = read_rules_file(&rules, &mut pool)?;
            info!(
                rules = rule_set.len(),
                duplicates = rule_set.duplicates,
                rejected = rule_set.rejected.len(),
                elapsed = ?start.elapsed(),
                "read rules"
            );

            let start = Instant::now();
            let mut engine = GroundingEngine::new(&config.predicates, &names, options);
            let results = engine.ground_all(&rule_set.constraints);
            info!(
                ground_atoms = engine.table().len(),
                elapsed = ?start.elapsed(),
                "grounded rules"
            );

            for (constraint, result) in rule_set.constraints.iter().zip(&results) {
                println!("{}", constraint);
                match result {
                    Ok(g) => {
                        println!("  {} instantiation(s)", g.instantiations.len());
                        for values in Assignments::new(&g.vars, &names).take(show) {
                            match constraint.ground_with(&g.vars, &values, engine.table_mut())? {
                                Some(grounded) => println!(
                                    "    [{}] {}",
                                    grounded.atom_ids.iter().join(", "),
                                    grounded.rendered
                                ),
                                None => println!(
                                    "    ({}) violates a distinctness guard",
                                    values.iter().join(", ")
                                ),
                            }
                        }
                    }
                    Err(e) => println!("  skipped: {}", e),
                }
            }

            let buffers = GroundingBuffers::from_instantiations(&instantiation_lists(&results));
            println!("ground atoms = {}", engine.table().len());
            println!(
                "buffer entries = {}, data = {}",
                buffers.entries(),
                buffers.data.len()
            );

            for bound in resolve_all(&bounds, engine.table())? {
                println!("bound x{} {} {}", bound.atom, bound.kind, bound.value);
            }

            if let Some(path) = table_out {
                engine.table().save(&path)?;
                info!(path = %path.display(), "wrote ground-atom table");
            }
            if let Some(path) = buffers_out {
                buffers.save(&path)?;
                info!(path = %path.display(), "wrote grounding buffers");
            }
            Ok(())
        }
        Command::Encode { problem, output } => {
            let start = Instant::now();
            let problem = SdpProblem::load(&problem)?;
            let summary = Encoder::with_threshold(config.encoder.noise_threshold)
                .encode_to_file(&problem, &output)?;
            println!("mDim = {}", summary.m_dim);
            println!("blocks = {}", summary.block_struct.iter().join(" "));
            println!("entries = {}", summary.entries_written);
            info!(elapsed = ?start.elapsed(), "encoded problem");
            Ok(())
        }
    }
}

fn cmd_facts(config: &Config, file: PathBuf) -> Result<()> {
    let mut pool = AtomPool::new();
    let mut names = GroundNames::new();
    let constraints = FactReader::new(&config.predicates, &mut names, &mut pool).parse_file(&file)?;
    for c in &constraints {
        println!("{}", c);
    }
    println!("facts = {}", constraints.len());
    for category in kbsdp::Category::ALL {
        println!("{}: {}", category, names.count(category));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn ground_shows_nothing_by_default() {
        let cli = Cli::try_parse_from(["kbsdp", "ground", "--facts", "f.pl", "--rules", "r.txt"])
            .unwrap();
        match cli.command {
            Command::Ground { show, bounds, enforce_guards, .. } => {
                assert_eq!(show, 0);
                assert!(bounds.is_empty());
                assert!(!enforce_guards);
            }
            _ => panic!("expected ground"),
        }

        let cli = Cli::try_parse_from([
            "kbsdp",
            "ground",
            "--facts",
            "f.pl",
            "--rules",
            "r.txt",
            "--show",
            "3",
            "--bound",
            "function(g1,ec_1)=0.4:upper",
        ])
        .unwrap();
        match cli.command {
            Command::Ground { show, bounds, .. } => {
                assert_eq!(show, 3);
                assert_eq!(bounds.len(), 1);
            }
            _ => panic!("expected ground"),
        }
    }
}
