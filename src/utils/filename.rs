use chrono::{Datelike, Local};
use std::path::PathBuf;

/// Generate the default output filename: output/bom-heatdays-{YYMMDD}.csv
pub fn generate_default_output_filename() -> PathBuf {
    let now = Local::now();
    let year = now.year() % 100;
    let month = now.month();
    let day = now.day();

    let filename = format!("bom-heatdays-{:02}{:02}{:02}.csv", year, month, day);
    PathBuf::from("output").join(filename)
}
