//! Pulsepost command-line interface.
//!
//! Drive the post-processing pipeline from TOML job files:
//! ```sh
//! pulsepost waveform job.toml -o periodic_square_wave.dat
//! pulsepost current job.toml curve.txt -o current.csv
//! pulsepost spectrum job.toml curve.txt -o spectrum.csv
//! pulsepost validate job.toml
//! ```

mod config;
mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pulsepost")]
#[command(about = "Post-processing for pulsed-field simulations")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize the excitation waveform and write it as a text table.
    Waveform {
        /// Path to the job configuration file.
        config: PathBuf,
        /// Output path for the `time pulse` table.
        #[arg(short, long, default_value = "periodic_square_wave.dat")]
        output: PathBuf,
        /// Also write a `time,pulse,dpulse/dt` CSV to this path.
        #[arg(long)]
        derivative: Option<PathBuf>,
    },
    /// Derive current and accumulated charge from a field record stream.
    Current {
        /// Path to the job configuration file.
        config: PathBuf,
        /// CSV record stream from the database lineout query.
        records: PathBuf,
        /// Output path for the `time,current,charge` CSV.
        #[arg(short, long, default_value = "current.csv")]
        output: PathBuf,
    },
    /// Windowed single-sided amplitude spectrum of the derived current.
    Spectrum {
        /// Path to the job configuration file.
        config: PathBuf,
        /// CSV record stream from the database lineout query.
        records: PathBuf,
        /// Output path for the `frequency,amplitude_db` CSV.
        #[arg(short, long, default_value = "spectrum.csv")]
        output: PathBuf,
    },
    /// Validate a job configuration file without running the pipeline.
    Validate {
        /// Path to the job configuration file.
        config: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Waveform {
            config,
            output,
            derivative,
        } => {
            let job = config::load_config(&config)?;
            runner::run_waveform(&job, &output, derivative.as_deref())
        }
        Commands::Current {
            config,
            records,
            output,
        } => {
            let job = config::load_config(&config)?;
            runner::run_current(&job, &records, &output)
        }
        Commands::Spectrum {
            config,
            records,
            output,
        } => {
            let job = config::load_config(&config)?;
            runner::run_spectrum(&job, &records, &output)
        }
        Commands::Validate { config } => {
            let _job = config::load_config(&config)?;
            println!("Configuration is valid: {}", config.display());
            Ok(())
        }
    }
}
