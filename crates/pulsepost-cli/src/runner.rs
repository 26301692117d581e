//! Pipeline drivers behind the subcommands.

use anyhow::{Context, Result};
use log::info;
use pulsepost_core::current::{accumulate_charge, derive_current};
use pulsepost_core::field_integral::integrate_slices;
use pulsepost_core::types::{GroupedTimeSlices, TimeSeries};
use pulsepost_core::{gradient, io, waveform};
use std::fs::File;
use std::path::Path;

use crate::config::JobConfig;

/// Synthesize the waveform and write the `time pulse` table; optionally also
/// the combined `time,pulse,dpulse/dt` CSV.
pub fn run_waveform(
    job: &JobConfig,
    output: &Path,
    derivative_output: Option<&Path>,
) -> Result<()> {
    let pulse_config = job.waveform.to_pulse_config()?;
    let pulse = waveform::generate(&pulse_config)?;
    info!(
        "synthesized {} samples over [{:e}, {:e}) s",
        pulse.len(),
        pulse_config.t_start,
        pulse_config.t_end
    );

    let file = File::create(output)
        .with_context(|| format!("creating waveform output {}", output.display()))?;
    io::write_waveform(file, &pulse)?;
    println!("Wrote waveform: {}", output.display());

    if let Some(path) = derivative_output {
        let deriv = gradient::gradient(&pulse)?;
        let file = File::create(path)
            .with_context(|| format!("creating derivative output {}", path.display()))?;
        io::write_with_derivative(file, &pulse, &deriv, "pulse")?;
        println!("Wrote pulse + derivative: {}", path.display());
    }
    Ok(())
}

/// Read a record stream and run it through to the current series.
pub fn derive_current_series(job: &JobConfig, records: &Path) -> Result<TimeSeries> {
    let file = File::open(records)
        .with_context(|| format!("opening record stream {}", records.display()))?;
    let parsed = io::read_field_records(file)?;
    info!("read {} records from {}", parsed.len(), records.display());

    let slices = GroupedTimeSlices::from_records(parsed);
    info!("grouped into {} time slices", slices.len());

    let integrated = integrate_slices(&slices)?;
    let current = derive_current(
        &integrated,
        job.physical.permittivity(),
        job.physical.depth,
    )?;
    Ok(current)
}

/// Derive current and charge from a record stream and write them as CSV.
pub fn run_current(job: &JobConfig, records: &Path, output: &Path) -> Result<()> {
    let current = derive_current_series(job, records)?;
    let charge = accumulate_charge(&current)?;

    let file = File::create(output)
        .with_context(|| format!("creating current output {}", output.display()))?;
    io::write_current_csv(file, &current, &charge)?;
    println!("Wrote current and charge: {}", output.display());
    Ok(())
}

/// Derive the current from a record stream and write its spectrum as CSV.
pub fn run_spectrum(job: &JobConfig, records: &Path, output: &Path) -> Result<()> {
    let current = derive_current_series(job, records)?;
    let spectrum_config = job.spectrum.to_spectrum_config();
    let result = pulsepost_core::spectrum::spectrum(&current, &spectrum_config)?;

    if let Some((freq, db)) = result.peak() {
        info!("spectral peak: {freq:e} Hz at {db:.1} dB");
    }

    let file = File::create(output)
        .with_context(|| format!("creating spectrum output {}", output.display()))?;
    io::write_spectrum_csv(file, &result)?;
    println!("Wrote spectrum: {}", output.display());
    Ok(())
}
