use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bom-processor")]
#[command(about = "Extreme-heat day aggregation for BOM weather station archives")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        short,
        long,
        global = true,
        help = "Configuration file [default: bom-processor.toml]"
    )]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline and write the aggregate CSV
    Process {
        #[arg(
            short,
            long,
            help = "Output CSV path [default: configured path or output/bom-heatdays-{YYMMDD}.csv]"
        )]
        output_file: Option<PathBuf>,

        #[arg(long, help = "Run all validations but write no output file")]
        validate_only: bool,

        #[arg(long, help = "Aggregate every year on record, not just the lookback window")]
        all_years: bool,

        #[arg(long, help = "Suppress the progress spinner")]
        silent: bool,
    },

    /// Run schema validation and reconciliation without writing output
    Validate {},

    /// Print the nearest-station match for each configured locality
    Locate {},
}
