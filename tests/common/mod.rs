//! Shared fixture builders: a fixed-width station table and BOM daily
//! export files with the real layout (eleven preamble lines, column-name
//! row, unit-label row, data rows, running-totals footer), encoded as
//! windows-1252.

use std::fs;
use std::path::{Path, PathBuf};

use encoding_rs::WINDOWS_1252;

pub const NAME_HEADER: &str = "Station Name,Date,Evapo-transpiration,Rain,Pan Evaporation,\
Maximum Temperature,Minimum Temperature,Maximum Relative Humidity,\
Minimum Relative Humidity,Average 10m Wind Speed,Solar Radiation";

pub const UNIT_HEADER: &str = ",,(mm),(mm),(mm),(\u{b0}C),(\u{b0}C),(%),(%),(km/h),(MJ/m2)";

pub fn write_windows_1252(path: &Path, content: &str) {
    let (encoded, _, _) = WINDOWS_1252.encode(content);
    fs::write(path, &encoded).unwrap();
}

/// One fixed-width station table line with the default column widths
/// [8, 4, 6, 41, 16, 9, 10].
pub fn station_line(id: u32, state: &str, name: &str, lat: f64, lon: f64) -> String {
    format!(
        "{:<8}{:<4}{:<6}{:<41}{:<16}{:>9}{:>10}",
        id,
        state,
        format!("{:06}", id),
        name,
        "01/01/1990",
        lat,
        lon
    )
}

pub fn write_station_table(base: &Path, stations: &[(u32, &str, &str, f64, f64)]) {
    let content: String = stations
        .iter()
        .map(|(id, state, name, lat, lon)| station_line(*id, state, name, *lat, *lon) + "\n")
        .collect();
    write_windows_1252(&base.join("stations_db.txt"), &content);
}

/// A full export file body with the standard headers.
pub fn export_content(
    name_header: &str,
    unit_header: &str,
    data_rows: &[String],
    totals_row: &str,
) -> String {
    let mut content = String::new();
    content.push_str("Daily Weather Observations\n");
    content.push('\n');
    for note in 0..8 {
        content.push_str(&format!("Preamble note {}\n", note));
    }
    content.push('\n');
    content.push_str(name_header);
    content.push('\n');
    content.push_str(unit_header);
    content.push('\n');
    for row in data_rows {
        content.push_str(row);
        content.push('\n');
    }
    content.push_str(totals_row);
    content.push('\n');
    content
}

/// One observation row. Only the fields the pipeline reads vary; the
/// rest carry plausible constants.
pub fn data_row(station: &str, date: &str, et: f64, rain: f64, max_temp: &str) -> String {
    format!(
        "{},{},{},{},6.4,{},21.0,65,30,15.5,28.9",
        station, date, et, rain, max_temp
    )
}

fn totals_row(et_total: f64, rain_total: f64) -> String {
    format!("Totals:,,{},{},,,,,,,", et_total, rain_total)
}

/// Write an export whose totals row matches the data rows, so it passes
/// reconciliation. Rows are (date, et, rain, max_temp).
pub fn write_consistent_export(
    dir: &Path,
    file_name: &str,
    station: &str,
    rows: &[(&str, f64, f64, &str)],
) -> PathBuf {
    let data_rows: Vec<String> = rows
        .iter()
        .map(|(date, et, rain, max_temp)| data_row(station, date, *et, *rain, max_temp))
        .collect();
    let et_total: f64 = rows.iter().map(|r| r.1).sum();
    let rain_total: f64 = rows.iter().map(|r| r.2).sum();

    let path = dir.join(file_name);
    write_windows_1252(
        &path,
        &export_content(
            NAME_HEADER,
            UNIT_HEADER,
            &data_rows,
            &totals_row(et_total, rain_total),
        ),
    );
    path
}

/// Write an export whose reported totals disagree with its data rows.
pub fn write_corrupt_export(
    dir: &Path,
    file_name: &str,
    station: &str,
    rows: &[(&str, f64, f64, &str)],
) -> PathBuf {
    let data_rows: Vec<String> = rows
        .iter()
        .map(|(date, et, rain, max_temp)| data_row(station, date, *et, *rain, max_temp))
        .collect();
    let et_total: f64 = rows.iter().map(|r| r.1).sum::<f64>() + 99.0;
    let rain_total: f64 = rows.iter().map(|r| r.2).sum();

    let path = dir.join(file_name);
    write_windows_1252(
        &path,
        &export_content(
            NAME_HEADER,
            UNIT_HEADER,
            &data_rows,
            &totals_row(et_total, rain_total),
        ),
    );
    path
}
