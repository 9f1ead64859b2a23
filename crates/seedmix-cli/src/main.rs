//! CLI for seedmix: derive, explain, sample, and audit PRNG seeds.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "seedmix")]
#[command(about = "seedmix: decorrelated PRNG seeds from system state and call-site context")]
#[command(version = seedmix_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive and print seeds
    Seed {
        /// Number of seeds to derive
        #[arg(long, default_value = "1")]
        count: usize,

        /// Extra path patterns never reported as the caller (repeatable)
        #[arg(long = "exclude")]
        exclude: Vec<String>,

        /// Print seeds as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Show every entropy value and mixing step of one derivation
    Explain {
        /// Extra path patterns never reported as the caller (repeatable)
        #[arg(long = "exclude")]
        exclude: Vec<String>,

        /// Print the breakdown as JSON
        #[arg(long)]
        json: bool,
    },

    /// Draw bounded integers from a generator acquired in the given mode
    Sample {
        /// Acquisition mode
        #[arg(long, value_enum, default_value_t = commands::Mode::Fresh)]
        mode: commands::Mode,

        /// Number of draws
        #[arg(long, default_value = "10000")]
        count: usize,

        /// Draws fall in [0, bound)
        #[arg(long, default_value = "2")]
        bound: u64,
    },

    /// Derive many seeds across worker threads and report duplicates
    Collisions {
        /// Total seeds to derive
        #[arg(long, default_value = "100000")]
        count: usize,

        /// Worker threads
        #[arg(long, default_value = "8")]
        workers: usize,
    },

    /// Run the randomness battery over a batch of derived seeds
    Report {
        /// Number of seeds to derive
        #[arg(long, default_value = "10000")]
        seeds: usize,

        /// Write results as JSON
        #[arg(long)]
        output: Option<String>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Seed {
            count,
            exclude,
            json,
        } => commands::seed::run(count, &exclude, json),
        Commands::Explain { exclude, json } => commands::explain::run(&exclude, json),
        Commands::Sample { mode, count, bound } => commands::sample::run(mode, count, bound),
        Commands::Collisions { count, workers } => commands::collisions::run(count, workers),
        Commands::Report { seeds, output } => commands::report::run(seeds, output.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("seedmix: {e}");
        std::process::exit(1);
    }
}
