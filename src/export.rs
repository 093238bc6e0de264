use crate::models::IntakeRecord;
use crate::utils::join_medicines;
use anyhow::Result;
use chrono::NaiveDate;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const HEADER: [&str; 5] = ["Date & Time", "Time of Day", "Medicines", "Status", "Notes"];

pub fn write_csv<W: Write>(records: &[IntakeRecord], mut out: W) -> Result<()> {
    write_row(&mut out, &HEADER)?;
    for record in records {
        let timestamp = record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string();
        let medicines = join_medicines(&record.medicines);
        write_row(
            &mut out,
            &[
                timestamp.as_str(),
                record.period.name(),
                medicines.as_str(),
                record.status.name(),
                record.note.as_str(),
            ],
        )?;
    }
    out.flush()?;
    Ok(())
}

/// Writes `medication_history_YYYYMMDD.csv` into `dir` and returns its path.
pub fn export_csv(records: &[IntakeRecord], dir: &Path, date: NaiveDate) -> Result<PathBuf> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    let path = dir.join(format!("medication_history_{}.csv", date.format("%Y%m%d")));
    let file = File::create(&path)?;
    write_csv(records, BufWriter::new(file))?;
    log::info!("Exported {} records to {}", records.len(), path.display());
    Ok(path)
}

fn write_row<W: Write>(out: &mut W, fields: &[&str]) -> Result<()> {
    let line = fields
        .iter()
        .map(|f| escape_field(f))
        .collect::<Vec<_>>()
        .join(",");
    writeln!(out, "{}", line)?;
    Ok(())
}

fn escape_field(field: &str) -> String {
    if field.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
