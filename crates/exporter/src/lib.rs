//! CSV export of the performance and growth tables.
//!
//! Column names and row identity mirror the historical spreadsheet output:
//! downstream consumers filter on `Period type` labels and key rows by the
//! prefix-stripped `Index/stock name`, so that schema is load-bearing. Two
//! columns are additions to the legacy layout: `Annualization factor` and
//! `Event date` (the latter lets the growth pass key on the exact event
//! rather than just the year).

use chrono::{Datelike, NaiveDate};
use core_types::{
    GrowthRecord, RecordOutcome, ResultTable, StatisticsRecord, StatsBundle, WindowType,
};
use std::path::{Path, PathBuf};
use tracing::info;

pub mod error;

pub use error::ExportError;

pub const PERFORMANCE_FILE: &str = "election_performance_metrics.csv";
pub const GROWTH_FILE: &str = "election_growth_metrics.csv";

/// The cell written for every statistic of a no-data record.
const NO_DATA_CELL: &str = "No data";

/// Writes result tables as CSV files under a configured directory.
#[derive(Debug, Clone)]
pub struct CsvExporter {
    output_dir: PathBuf,
}

impl CsvExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Writes the performance table, one row per statistics record.
    pub fn export_performance(&self, table: &ResultTable) -> Result<PathBuf, ExportError> {
        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(PERFORMANCE_FILE);

        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(performance_header())?;
        for record in table.records() {
            writer.write_record(performance_row(record))?;
        }
        writer.flush()?;

        info!(
            "wrote {} performance rows to {}",
            table.len(),
            path.display()
        );
        Ok(path)
    }

    /// Writes the growth table, one row per (instrument, event) delta.
    pub fn export_growth(&self, records: &[GrowthRecord]) -> Result<PathBuf, ExportError> {
        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(GROWTH_FILE);

        let mut writer = csv::Writer::from_path(&path)?;
        let mut header = vec![
            "Index/stock name".to_string(),
            "Year".to_string(),
            "Event date".to_string(),
            "Pair status".to_string(),
        ];
        // Delta columns keep the statistic names unchanged; consumers of the
        // performance file read the growth file with the same labels.
        header.extend(StatsBundle::FIELD_LABELS.iter().map(|label| label.to_string()));
        writer.write_record(&header)?;

        for record in records {
            let mut row = vec![
                record.instrument.clone(),
                record.event_date.year().to_string(),
                record.event_date.to_string(),
                record.pair_status.label().to_string(),
            ];
            row.extend(record.deltas.as_array().iter().map(|v| v.to_string()));
            writer.write_record(&row)?;
        }
        writer.flush()?;

        info!("wrote {} growth rows to {}", records.len(), path.display());
        Ok(path)
    }
}

/// Reads a previously exported performance table back into memory, so the
/// growth pass can run standalone against an existing file.
pub fn read_performance(path: &Path) -> Result<ResultTable, ExportError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let position = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ExportError::Schema(format!("missing column '{name}'")))
    };

    let stat_positions = StatsBundle::FIELD_LABELS
        .iter()
        .map(|label| position(label))
        .collect::<Result<Vec<_>, _>>()?;
    let annualization_position = position("Annualization factor")?;
    let instrument_position = position("Index/stock name")?;
    let window_type_position = position("Period type")?;
    let length_position = position("Period length")?;
    let event_date_position = position("Event date")?;

    let mut table = ResultTable::new();
    for row in reader.records() {
        let row = row?;
        let cell = |idx: usize| {
            row.get(idx)
                .ok_or_else(|| ExportError::Schema(format!("row too short: {row:?}")))
        };

        // A record is uniformly populated or uniformly "No data"; any cell
        // that fails to parse marks the whole row as the sentinel.
        let mut values = [0.0f64; 10];
        let mut no_data = false;
        for (slot, idx) in values.iter_mut().zip(&stat_positions) {
            match cell(*idx)?.parse::<f64>() {
                Ok(v) => *slot = v,
                Err(_) => no_data = true,
            }
        }
        let outcome = if no_data {
            RecordOutcome::NoData
        } else {
            RecordOutcome::Computed(StatsBundle::from_array(values))
        };

        let window_type = cell(window_type_position)?
            .parse::<WindowType>()
            .map_err(|e| ExportError::Schema(e.to_string()))?;
        let event_date = cell(event_date_position)?
            .parse::<NaiveDate>()
            .map_err(|e| ExportError::Schema(e.to_string()))?;
        let window_length_months = cell(length_position)?
            .parse::<u32>()
            .map_err(|e| ExportError::Schema(e.to_string()))?;
        let annualization_factor = cell(annualization_position)?
            .parse::<f64>()
            .map_err(|e| ExportError::Schema(e.to_string()))?;

        table.push(StatisticsRecord {
            instrument: cell(instrument_position)?.to_string(),
            event_date,
            window_type,
            window_length_months,
            annualization_factor,
            outcome,
        });
    }

    Ok(table)
}

fn performance_header() -> Vec<String> {
    let mut header: Vec<String> = StatsBundle::FIELD_LABELS
        .iter()
        .map(|label| label.to_string())
        .collect();
    header.extend(
        [
            "Annualization factor",
            "Index/stock name",
            "Period type",
            "Period length",
            "Year",
            "Event date",
        ]
        .map(String::from),
    );
    header
}

fn performance_row(record: &StatisticsRecord) -> Vec<String> {
    let mut row: Vec<String> = match &record.outcome {
        RecordOutcome::Computed(bundle) => {
            bundle.as_array().iter().map(|v| v.to_string()).collect()
        }
        RecordOutcome::NoData => vec![NO_DATA_CELL.to_string(); StatsBundle::FIELD_LABELS.len()],
    };
    row.push(record.annualization_factor.to_string());
    row.push(record.instrument.clone());
    row.push(record.window_type.label().to_string());
    row.push(record.window_length_months.to_string());
    row.push(record.event_date.year().to_string());
    row.push(record.event_date.to_string());
    row
}
