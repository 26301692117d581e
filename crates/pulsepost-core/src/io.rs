//! Text I/O for the External Interfaces
//!
//! Readers and writers for the flat-file formats the pipeline exchanges with
//! its collaborators:
//!
//! * the raw record stream written by the database lineout query, a CSV with
//!   header `time,length,<variable>` and one (time, position, field) triplet
//!   per row;
//! * the whitespace-separated waveform table (`time pulse`) consumed by
//!   plotting;
//! * comma-separated series tables, including the combined
//!   `time,<name>,d<name>/dt` form.

use crate::spectrum::Spectrum;
use crate::types::{FieldRecord, PostError, PostResult, TimeSeries};
use std::io::{BufWriter, Read, Write};

/// Read the raw field record stream from a lineout-query CSV.
///
/// Expects a header row; only the first three columns are used (time,
/// position, field). The variable column's name is whatever was queried, so
/// it is not matched by name. Rows with fewer than three columns or
/// non-numeric values fail with the offending line number.
pub fn read_field_records<R: Read>(input: R) -> PostResult<Vec<FieldRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| PostError::Io(e.to_string()))?;
        let line = row.position().map(|p| p.line()).unwrap_or(0);

        let field_at = |idx: usize| -> PostResult<f64> {
            let raw = row.get(idx).ok_or_else(|| PostError::MalformedRecord {
                line,
                message: format!("expected 3 columns, got {}", row.len()),
            })?;
            raw.parse::<f64>().map_err(|_| PostError::MalformedRecord {
                line,
                message: format!("column {} is not a number: {raw:?}", idx + 1),
            })
        };

        records.push(FieldRecord {
            time: field_at(0)?,
            position: field_at(1)?,
            field: field_at(2)?,
        });
    }

    log::debug!("read {} field records", records.len());
    Ok(records)
}

/// Write the synthesized waveform as a whitespace-separated table with the
/// header `time pulse`.
pub fn write_waveform<W: Write>(output: W, series: &TimeSeries) -> PostResult<()> {
    let mut w = BufWriter::new(output);
    writeln!(w, "time pulse")?;
    for (t, v) in series.iter() {
        writeln!(w, "{t} {v}")?;
    }
    w.flush()?;
    Ok(())
}

/// Write a single series as CSV with columns `time,<name>`.
pub fn write_series_csv<W: Write>(output: W, series: &TimeSeries, name: &str) -> PostResult<()> {
    let mut w = BufWriter::new(output);
    writeln!(w, "time,{name}")?;
    for (t, v) in series.iter() {
        writeln!(w, "{t},{v}")?;
    }
    w.flush()?;
    Ok(())
}

/// Write a series next to its derivative as CSV, columns
/// `time,<name>,d<name>/dt`. Both series must share one time axis.
pub fn write_with_derivative<W: Write>(
    output: W,
    series: &TimeSeries,
    derivative: &TimeSeries,
    name: &str,
) -> PostResult<()> {
    if series.len() != derivative.len() {
        return Err(PostError::LengthMismatch {
            times: series.len(),
            values: derivative.len(),
        });
    }
    let mut w = BufWriter::new(output);
    writeln!(w, "time,{name},d{name}/dt")?;
    for ((t, v), (_, d)) in series.iter().zip(derivative.iter()) {
        writeln!(w, "{t},{v},{d}")?;
    }
    w.flush()?;
    Ok(())
}

/// Write current and accumulated charge side by side, columns
/// `time,current,charge`.
pub fn write_current_csv<W: Write>(
    output: W,
    current: &TimeSeries,
    charge: &TimeSeries,
) -> PostResult<()> {
    if current.len() != charge.len() {
        return Err(PostError::LengthMismatch {
            times: current.len(),
            values: charge.len(),
        });
    }
    let mut w = BufWriter::new(output);
    writeln!(w, "time,current,charge")?;
    for ((t, i), (_, q)) in current.iter().zip(charge.iter()) {
        writeln!(w, "{t},{i},{q}")?;
    }
    w.flush()?;
    Ok(())
}

/// Write a spectrum as CSV with columns `frequency,amplitude_db`.
pub fn write_spectrum_csv<W: Write>(output: W, spectrum: &Spectrum) -> PostResult<()> {
    let mut w = BufWriter::new(output);
    writeln!(w, "frequency,amplitude_db")?;
    for (f, db) in spectrum.iter() {
        writeln!(w, "{f},{db}")?;
    }
    w.flush()?;
    Ok(())
}
