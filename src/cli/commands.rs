use tracing::Level;

use crate::cli::args::{Cli, Commands};
use crate::config::Settings;
use crate::error::{ProcessingError, Result};
use crate::geocode::{resolve_localities, ArcGisGeocoder, Geocoder, TableGeocoder};
use crate::pipeline::{Pipeline, PipelineOutcome};
use crate::processors::{ReconciliationPolicy, StationLocator};
use crate::readers::StationReader;
use crate::utils::filename::generate_default_output_filename;
use crate::utils::progress::ProgressReporter;
use crate::writers::CsvWriter;

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose);

    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Process {
            output_file,
            validate_only,
            all_years,
            silent,
        } => {
            println!("Processing weather data...");
            println!("Base path: {}", settings.base_path.display());
            println!(
                "Temperature threshold: {} degrees C",
                settings.temperature_threshold
            );
            if all_years {
                println!("Year window: all years on record");
            } else {
                println!("Year window: last {} years", settings.lookback_years);
            }

            let geocoder = build_geocoder(&settings);
            let progress = ProgressReporter::new_spinner("Running pipeline...", silent);

            let mut pipeline = Pipeline::new(&settings);
            if all_years {
                pipeline = pipeline.without_year_window();
            }

            let outcome = pipeline.run(geocoder.as_ref())?;
            progress.finish_with_message(&format!(
                "Processed {} files, {} rows",
                outcome.files_processed, outcome.rows_loaded
            ));

            print_run_report(&settings, &outcome);

            if validate_only {
                println!("Validation complete - no output file written");
                return Ok(());
            }

            let output_path = output_file
                .or_else(|| settings.output_path.clone())
                .unwrap_or_else(generate_default_output_filename);

            let writer = CsvWriter::new();
            writer
                .write_counts(&outcome.counts, &output_path)
                .map_err(|e| {
                    ProcessingError::Aggregation(format!("failed to write output: {}", e))
                })?;

            println!(
                "Wrote {} rows to {}",
                outcome.counts.len(),
                output_path.display()
            );
            println!("Processing complete!");
        }

        Commands::Validate {} => {
            println!("Validating weather data...");
            println!("Base path: {}", settings.base_path.display());

            let geocoder = build_geocoder(&settings);
            let outcome = Pipeline::new(&settings).run(geocoder.as_ref())?;

            print_run_report(&settings, &outcome);

            if outcome.reconciliation.all_reconciled() {
                println!("All files reconciled successfully");
            } else {
                println!(
                    "{} file(s) failed reconciliation",
                    outcome.reconciliation.rejected_files().len()
                );
            }
            println!("Validation complete - no output file written");
        }

        Commands::Locate {} => {
            let geocoder = build_geocoder(&settings);
            let coordinates = resolve_localities(geocoder.as_ref(), &settings.localities)?;

            let reader = StationReader::with_widths(settings.station_column_widths.clone())?;
            let locator = StationLocator::from_table(&settings.stations_table_path(), &reader)?;
            let matches = locator.locate_all(&settings.base_path, &coordinates);

            for (locality, station_match) in &matches {
                println!(
                    "{}: {} [{}] {:.1} km -> {}",
                    locality,
                    station_match.station.name,
                    station_match.station.state,
                    station_match.distance_km,
                    station_match.data_dir.display()
                );
            }
        }
    }

    Ok(())
}

fn print_run_report(settings: &Settings, outcome: &PipelineOutcome) {
    for (locality, station_match) in &outcome.matches {
        let summary = outcome.summaries.get(locality).copied().unwrap_or_default();
        println!(
            "{}: {} ({:.1} km), {} files, {} rows",
            locality,
            station_match.station.name,
            station_match.distance_km,
            summary.files,
            summary.rows
        );
    }

    print!("{}", outcome.reconciliation.summary());
    if settings.reconciliation == ReconciliationPolicy::Advisory
        && !outcome.reconciliation.all_reconciled()
    {
        println!("Reconciliation policy is advisory: rejected files were still processed");
    }
}

fn build_geocoder(settings: &Settings) -> Box<dyn Geocoder> {
    if settings.covers_all_localities() {
        Box::new(TableGeocoder::new(settings.gazetteer()))
    } else {
        Box::new(ArcGisGeocoder::new())
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init();
}
