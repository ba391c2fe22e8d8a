//! Export orchestration: burnout truncation, resampling, encoding, persistence.
//!
//! One `export` call validates and renders both artifacts in memory before
//! any file is opened, then stages them as hidden temporary files in the
//! output directory and renames them into place. A failure at any point
//! removes everything the call wrote.

use crate::constants::{CSV_EXTENSION, ENG_EXTENSION};
use crate::error::{ExportError, Result};
use crate::motor_file::{encode, MotorFileDocument, MotorMetadata};
use crate::resample::{
    resample_channel, validate_channel, ResampledSeries, PROPELLANT_MASS_FILL, THRUST_FILL,
};
use crate::table::{export_table, MotorDataTable};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Output of the internal ballistics simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    #[serde(alias = "t")]
    pub time: Vec<f64>, // s
    #[serde(alias = "T")]
    pub thrust: Vec<f64>, // N
    #[serde(alias = "P0")]
    pub chamber_pressure: Vec<f64>, // Pa
    #[serde(alias = "V_prop")]
    pub propellant_volume: Vec<f64>, // m³
    pub t_burnout: f64, // s
    #[serde(default)]
    pub t_thrust: Option<f64>, // s, thrust reaches zero
}

/// Channels of a run cut at the burnout sample (inclusive)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TruncatedRun<'a> {
    pub time: &'a [f64],
    pub thrust: &'a [f64],
    pub chamber_pressure: &'a [f64],
    pub propellant_volume: &'a [f64],
    pub burnout_index: usize,
}

impl RunResult {
    /// Check that every channel shares the time axis and the axis is sorted.
    ///
    /// Chamber pressure is only checked for length here; its values are
    /// checked over the burn span in `truncate_at_burnout`.
    pub fn validate(&self) -> Result<()> {
        validate_channel("thrust", &self.time, &self.thrust)?;
        validate_channel("propellant_volume", &self.time, &self.propellant_volume)?;
        if self.chamber_pressure.len() != self.time.len() {
            return Err(ExportError::invalid(
                "chamber_pressure",
                format!(
                    "channel length {} does not match time length {}",
                    self.chamber_pressure.len(),
                    self.time.len()
                ),
            ));
        }
        Ok(())
    }

    /// Validate, then cut every channel to `[0, burnout_index]`
    pub fn truncate_at_burnout(&self) -> Result<TruncatedRun<'_>> {
        self.validate()?;
        let index = burnout_index(&self.time, self.t_burnout)?;
        let end = index + 1;

        if let Some(i) = self.chamber_pressure[..end].iter().position(|p| !p.is_finite()) {
            return Err(ExportError::invalid(
                "chamber_pressure",
                format!("value is not finite at index {} ({})", i, self.chamber_pressure[i]),
            ));
        }

        debug!(
            "Truncated run at burnout: t_burnout={} s, index={}, kept {} of {} samples",
            self.t_burnout,
            index,
            end,
            self.time.len()
        );

        Ok(TruncatedRun {
            time: &self.time[..end],
            thrust: &self.thrust[..end],
            chamber_pressure: &self.chamber_pressure[..end],
            propellant_volume: &self.propellant_volume[..end],
            burnout_index: index,
        })
    }
}

/// Index of the burnout sample: the last `i` with `time[i] <= t_burnout`.
///
/// When several samples share that time the first of them is returned.
/// `time` must be sorted. Burnout times outside `[time[0], time[-1]]`
/// (or NaN) have no sample and yield `BoundaryNotFound`.
pub fn burnout_index(time: &[f64], t_burnout: f64) -> Result<usize> {
    let not_found = || ExportError::BoundaryNotFound {
        t_burnout,
        first: time.first().copied().unwrap_or(f64::NAN),
        last: time.last().copied().unwrap_or(f64::NAN),
    };

    let (first, last) = match (time.first(), time.last()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return Err(not_found()),
    };
    if t_burnout.is_nan() || t_burnout < first || t_burnout > last {
        return Err(not_found());
    }

    // At least time[0] satisfies the condition here
    let mut index = time.partition_point(|&t| t <= t_burnout) - 1;
    while index > 0 && time[index - 1] == time[index] {
        index -= 1;
    }
    Ok(index)
}

/// Both artifacts of one export, rendered but not yet written
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedExport {
    pub name: String,
    pub resampled: ResampledSeries,
    pub motor_file: MotorFileDocument,
    pub table: MotorDataTable,
}

/// Artifacts of one completed export call
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRecord {
    pub name: String,
    pub motor_file: MotorFileDocument,
    pub table: MotorDataTable,
    pub motor_file_path: PathBuf,
    pub table_path: PathBuf,
}

/// Drives the pipeline for one output directory
#[derive(Debug, Clone)]
pub struct ExportOrchestrator {
    output_dir: PathBuf,
    time_step: Option<f64>,
}

impl ExportOrchestrator {
    /// `output_dir` must exist when `export` runs; it is never created here.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            time_step: None,
        }
    }

    /// Nominal solver step used to extend the resampling domain
    pub fn with_time_step(mut self, dt: f64) -> Self {
        self.time_step = Some(dt);
        self
    }

    pub fn set_time_step(&mut self, dt: f64) {
        self.time_step = Some(dt);
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn motor_file_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{}.{}", name, ENG_EXTENSION))
    }

    pub fn table_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{}.{}", name, CSV_EXTENSION))
    }

    /// Run every pure stage of the pipeline without touching the filesystem
    pub fn prepare(
        &self,
        run: &RunResult,
        metadata: &MotorMetadata,
        n_points: usize,
    ) -> Result<PreparedExport> {
        metadata.validate()?;
        validate_file_stem(&metadata.name)?;

        let truncated = run.truncate_at_burnout()?;
        if truncated.time.len() < 2 {
            return Err(ExportError::invalid(
                "burnout truncation",
                format!(
                    "t_burnout = {} s keeps only sample index {}, at least 2 samples are needed",
                    run.t_burnout, truncated.burnout_index
                ),
            ));
        }

        let thrust = resample_channel(
            "thrust",
            truncated.time,
            truncated.thrust,
            n_points,
            self.time_step,
            THRUST_FILL,
        )?;
        let mut propellant_mass = resample_channel(
            "propellant_volume",
            truncated.time,
            truncated.propellant_volume,
            n_points,
            self.time_step,
            PROPELLANT_MASS_FILL,
        )?;
        for value in propellant_mass.values.iter_mut() {
            *value *= metadata.propellant_density;
        }
        let resampled = ResampledSeries::from_channels(thrust, propellant_mass)?;

        debug!(
            "Resampled {} raw samples to {} points over [0, {}] s",
            truncated.time.len(),
            resampled.len(),
            resampled.time[resampled.len() - 1]
        );

        let motor_file = encode(&resampled, metadata)?;
        let table = export_table(
            truncated.time,
            truncated.thrust,
            truncated.propellant_volume,
            metadata.propellant_density,
        )?;

        Ok(PreparedExport {
            name: metadata.name.clone(),
            resampled,
            motor_file,
            table,
        })
    }

    /// Export `<name>.eng` and `<name>.csv` into the output directory
    pub fn export(
        &self,
        run: &RunResult,
        metadata: &MotorMetadata,
        n_points: usize,
    ) -> Result<ExportRecord> {
        let prepared = self.prepare(run, metadata, n_points)?;

        let motor_file_path = self.motor_file_path(&prepared.name);
        let table_path = self.table_path(&prepared.name);
        let motor_text = prepared.motor_file.render();
        let table_text = prepared.table.to_csv_string()?;

        self.persist(&[(&motor_file_path, &motor_text), (&table_path, &table_text)])?;

        info!(
            "Exported motor '{}': {} ({} points), {} ({} rows)",
            prepared.name,
            motor_file_path.display(),
            prepared.motor_file.samples.len(),
            table_path.display(),
            prepared.table.len()
        );

        Ok(ExportRecord {
            name: prepared.name,
            motor_file: prepared.motor_file,
            table: prepared.table,
            motor_file_path,
            table_path,
        })
    }

    fn persist(&self, artifacts: &[(&PathBuf, &String)]) -> Result<()> {
        if !self.output_dir.is_dir() {
            return Err(ExportError::io(
                &self.output_dir,
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "output directory does not exist",
                ),
            ));
        }

        // Stage every artifact before replacing anything
        let mut staged: Vec<(PathBuf, &PathBuf)> = Vec::with_capacity(artifacts.len());
        for &(target, contents) in artifacts {
            let temp = staging_path(target);
            if let Err(e) = fs::write(&temp, contents) {
                let _ = fs::remove_file(&temp);
                discard(staged.iter().map(|(temp, _)| temp.as_path()));
                return Err(ExportError::io(target, e));
            }
            staged.push((temp, target));
        }

        let mut committed: Vec<&Path> = Vec::with_capacity(staged.len());
        for (i, (temp, target)) in staged.iter().enumerate() {
            if target.exists() {
                warn!("Overwriting existing artifact {}", target.display());
            }
            if let Err(e) = fs::rename(temp, target) {
                discard(staged[i..].iter().map(|(temp, _)| temp.as_path()));
                discard(committed.iter().copied());
                return Err(ExportError::io(*target, e));
            }
            committed.push(target.as_path());
        }
        Ok(())
    }
}

fn validate_file_stem(name: &str) -> Result<()> {
    if name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(ExportError::invalid(
            "metadata.name",
            format!("cannot be used as a file name: {:?}", name),
        ));
    }
    Ok(())
}

fn staging_path(target: &Path) -> PathBuf {
    let file_name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{}.tmp", file_name))
}

fn discard<'a>(paths: impl Iterator<Item = &'a Path>) {
    for path in paths {
        if let Err(e) = fs::remove_file(path) {
            warn!("Could not remove partial artifact {}: {}", path.display(), e);
        }
    }
}
