use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::models::weather::parse_numeric;
use crate::readers::WeatherReader;

/// What to do with files that fail reconciliation. `Advisory` reports and
/// keeps processing them; `Enforcing` excludes them from aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconciliationPolicy {
    Advisory,
    Enforcing,
}

impl Default for ReconciliationPolicy {
    fn default() -> Self {
        ReconciliationPolicy::Advisory
    }
}

/// One accumulator column that failed the cross-check.
#[derive(Debug, Clone)]
pub struct ColumnMismatch {
    pub column: String,
    pub computed_sum: f64,
    pub reported_total: f64,
}

#[derive(Debug, Clone)]
pub enum ReconciliationStatus {
    Reconciled,
    TotalsMismatch { mismatches: Vec<ColumnMismatch> },
    Malformed { reason: String },
}

#[derive(Debug, Clone)]
pub struct FileReconciliation {
    pub file: PathBuf,
    pub status: ReconciliationStatus,
}

impl FileReconciliation {
    pub fn is_rejected(&self) -> bool {
        !matches!(self.status, ReconciliationStatus::Reconciled)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReconciliationReport {
    pub outcomes: Vec<FileReconciliation>,
}

impl ReconciliationReport {
    pub fn rejected_files(&self) -> Vec<&Path> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.is_rejected())
            .map(|outcome| outcome.file.as_path())
            .collect()
    }

    pub fn all_reconciled(&self) -> bool {
        self.outcomes.iter().all(|outcome| !outcome.is_rejected())
    }

    pub fn summary(&self) -> String {
        let rejected = self.rejected_files();
        let mut summary = String::new();

        summary.push_str("=== Reconciliation Report ===\n");
        summary.push_str(&format!("Files checked: {}\n", self.outcomes.len()));
        summary.push_str(&format!(
            "Reconciled: {}\n",
            self.outcomes.len() - rejected.len()
        ));
        summary.push_str(&format!("Rejected: {}\n", rejected.len()));

        for outcome in self.outcomes.iter().filter(|o| o.is_rejected()) {
            match &outcome.status {
                ReconciliationStatus::TotalsMismatch { mismatches } => {
                    for mismatch in mismatches {
                        summary.push_str(&format!(
                            "  {}: {} computed {:.2}, reported {:.2}\n",
                            outcome.file.display(),
                            mismatch.column,
                            mismatch.computed_sum,
                            mismatch.reported_total
                        ));
                    }
                }
                ReconciliationStatus::Malformed { reason } => {
                    summary.push_str(&format!(
                        "  {}: malformed ({})\n",
                        outcome.file.display(),
                        reason
                    ));
                }
                ReconciliationStatus::Reconciled => {}
            }
        }

        summary
    }
}

/// Cross-checks each file's embedded running totals against independently
/// recomputed sums of the two accumulator columns (evapotranspiration and
/// rain).
///
/// The totals row is itself part of the summed range, so the check a
/// consistent file must pass is `(computed_sum - reported_total) ==
/// reported_total`: the reported value equals exactly half the computed
/// sum including itself. A file whose reported total equals the full
/// computed sum fails.
pub struct ReconciliationChecker {
    reader: WeatherReader,
    policy: ReconciliationPolicy,
}

impl ReconciliationChecker {
    pub fn new(policy: ReconciliationPolicy) -> Self {
        Self {
            reader: WeatherReader::new(),
            policy,
        }
    }

    pub fn policy(&self) -> ReconciliationPolicy {
        self.policy
    }

    /// Check every file. Unreadable or structurally broken files become
    /// `Malformed` outcomes rather than run failures: reconciliation
    /// itself never halts the run.
    pub fn check_files(&self, files: &[PathBuf]) -> ReconciliationReport {
        let mut report = ReconciliationReport::default();

        for file in files {
            let status = self.check_file(file);
            if !matches!(status, ReconciliationStatus::Reconciled) {
                warn!(file = %file.display(), "reconciliation rejected file");
            }
            report.outcomes.push(FileReconciliation {
                file: file.clone(),
                status,
            });
        }

        report
    }

    fn check_file(&self, file: &Path) -> ReconciliationStatus {
        let table = match self.reader.read_table_with_totals(file) {
            Ok(table) => table,
            Err(e) => {
                return ReconciliationStatus::Malformed {
                    reason: e.to_string(),
                }
            }
        };

        if let Err(e) = self.reader.schema().validate_unit_header(&table.header) {
            return ReconciliationStatus::Malformed {
                reason: e.to_string(),
            };
        }

        if table.rows.is_empty() {
            return ReconciliationStatus::Malformed {
                reason: "no data rows".to_string(),
            };
        }

        let (et_index, rain_index) = self.reader.schema().accumulator_indices();
        let columns = [("evapo_transpiration", et_index), ("rain", rain_index)];
        let mut mismatches = Vec::new();

        for (name, index) in columns {
            let computed_sum = round2(
                table
                    .rows
                    .iter()
                    .map(|row| coerce(row, index))
                    .sum::<f64>(),
            );
            let reported_total = table.rows.last().map_or(0.0, |row| coerce(row, index));

            if !reconciles(computed_sum, reported_total) {
                mismatches.push(ColumnMismatch {
                    column: name.to_string(),
                    computed_sum,
                    reported_total,
                });
            }
        }

        if mismatches.is_empty() {
            ReconciliationStatus::Reconciled
        } else {
            ReconciliationStatus::TotalsMismatch { mismatches }
        }
    }
}

/// Blank and non-numeric cells count as zero; so do cells missing from a
/// short row.
fn coerce(row: &[String], index: usize) -> f64 {
    row.get(index)
        .and_then(|cell| parse_numeric(cell))
        .unwrap_or(0.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// The literal doubling rule, compared in integer hundredths so float
/// noise cannot decide the outcome.
fn reconciles(computed_sum: f64, reported_total: f64) -> bool {
    let computed = (computed_sum * 100.0).round() as i64;
    let reported = (reported_total * 100.0).round() as i64;
    computed - reported == reported
}
