//! QEM Command-Line Interface
//!
//! Folds and twirls circuits stored as JSON snapshots.
//!
//! ```text
//! qem fold  -i bell.json --scale 3 --gate cx
//! qem twirl -i bell.json --gate cx --seed 7
//! qem apply -i bell.json -c mitigation.yaml
//! qem twirl-set --gate ecr
//! qem aggregate run1.json run2.json --normalize
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use qem_ir::StandardGate;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{aggregate, apply, fold, twirl, twirl_set, version};

/// qem - gate folding and Pauli twirling for quantum circuits
#[derive(Parser)]
#[command(name = "qem")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fold a gate to amplify its noise
    Fold {
        /// Input circuit (JSON)
        #[arg(short, long)]
        input: String,

        /// Output file (defaults to <input>_fold.json)
        #[arg(short, long)]
        output: Option<String>,

        /// Noise scale factor (>= 1)
        #[arg(short, long)]
        scale: f64,

        /// Gate to fold
        #[arg(short, long, default_value = "cx")]
        gate: StandardGate,

        /// Seed for choosing which occurrences to fold
        #[arg(long)]
        seed: Option<u32>,
    },

    /// Pauli-twirl every occurrence of a two-qubit gate
    Twirl {
        /// Input circuit (JSON)
        #[arg(short, long)]
        input: String,

        /// Output file (defaults to <input>_twirl.json)
        #[arg(short, long)]
        output: Option<String>,

        /// Gate to twirl (cx, cz, ecr)
        #[arg(short, long, default_value = "cx")]
        gate: StandardGate,

        /// Seed for drawing twirling entries
        #[arg(long)]
        seed: Option<u32>,
    },

    /// Run the passes described by a YAML or JSON config file
    Apply {
        /// Input circuit (JSON)
        #[arg(short, long)]
        input: String,

        /// Output file (defaults to <input>_mitigated.json)
        #[arg(short, long)]
        output: Option<String>,

        /// Mitigation config (.yaml, .yml or .json)
        #[arg(short, long)]
        config: String,
    },

    /// Print the twirling set of a gate
    TwirlSet {
        /// Gate (cx, cz, ecr)
        #[arg(short, long)]
        gate: StandardGate,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Sum measurement counts from several runs
    Aggregate {
        /// JSON files mapping outcomes to counts
        #[arg(required = true)]
        files: Vec<String>,

        /// Average over the runs instead of summing
        #[arg(short, long)]
        normalize: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Fold {
            input,
            output,
            scale,
            gate,
            seed,
        } => fold::execute(&input, output.as_deref(), scale, gate, seed),

        Commands::Twirl {
            input,
            output,
            gate,
            seed,
        } => twirl::execute(&input, output.as_deref(), gate, seed),

        Commands::Apply {
            input,
            output,
            config,
        } => apply::execute(&input, output.as_deref(), &config),

        Commands::TwirlSet { gate, format } => twirl_set::execute(gate, &format),

        Commands::Aggregate { files, normalize } => aggregate::execute(&files, normalize),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fold() {
        let cli = Cli::try_parse_from([
            "qem", "fold", "-i", "c.json", "--scale", "2.5", "--gate", "ecr", "--seed", "9",
        ])
        .unwrap();
        match cli.command {
            Commands::Fold {
                input,
                output,
                scale,
                gate,
                seed,
            } => {
                assert_eq!(input, "c.json");
                assert!(output.is_none());
                assert!((scale - 2.5).abs() < f64::EPSILON);
                assert_eq!(gate, StandardGate::ECR);
                assert_eq!(seed, Some(9));
            }
            _ => panic!("expected fold"),
        }
    }

    #[test]
    fn test_parse_twirl_defaults_to_cx() {
        let cli = Cli::try_parse_from(["qem", "-vv", "twirl", "-i", "c.json"]).unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Twirl { gate, seed, .. } => {
                assert_eq!(gate, StandardGate::CX);
                assert_eq!(seed, None);
            }
            _ => panic!("expected twirl"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_gate() {
        assert!(Cli::try_parse_from(["qem", "twirl", "-i", "c.json", "--gate", "foo"]).is_err());
    }

    #[test]
    fn test_parse_fold_requires_scale() {
        assert!(Cli::try_parse_from(["qem", "fold", "-i", "c.json"]).is_err());
    }

    #[test]
    fn test_parse_aggregate_requires_files() {
        assert!(Cli::try_parse_from(["qem", "aggregate"]).is_err());
        let cli = Cli::try_parse_from(["qem", "aggregate", "a.json", "b.json", "-n"]).unwrap();
        match cli.command {
            Commands::Aggregate { files, normalize } => {
                assert_eq!(files.len(), 2);
                assert!(normalize);
            }
            _ => panic!("expected aggregate"),
        }
    }
}
