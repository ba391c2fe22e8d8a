//! Tabular dump of the truncated raw series (`Time, Thrust, Prop_Mass`).

use crate::error::{ExportError, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// One row of the motor data table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotorDataRow {
    #[serde(rename = "Time")]
    pub time: f64, // s
    #[serde(rename = "Thrust")]
    pub thrust: f64, // N
    #[serde(rename = "Prop_Mass")]
    pub propellant_mass: f64, // kg
}

/// Rows in input order, one per raw sample
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MotorDataTable {
    pub rows: Vec<MotorDataRow>,
}

impl MotorDataTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Write a `Time,Thrust,Prop_Mass` header and one record per row
    pub fn write_csv<W: Write>(&self, writer: W) -> std::result::Result<(), csv::Error> {
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(true)
            .from_writer(writer);
        if self.rows.is_empty() {
            csv_writer.write_record(crate::constants::TABLE_COLUMNS)?;
        }
        for row in &self.rows {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// CSV text of the table
    pub fn to_csv_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)
            .map_err(|e| ExportError::invalid("table", format!("CSV encoding failed: {}", e)))?;
        String::from_utf8(buffer)
            .map_err(|e| ExportError::invalid("table", format!("CSV output is not UTF-8: {}", e)))
    }
}

/// Build the table from raw channels; `Prop_Mass = propellant_volume * density`.
pub fn export_table(
    time: &[f64],
    thrust: &[f64],
    propellant_volume: &[f64],
    density: f64,
) -> Result<MotorDataTable> {
    for (channel, len) in [("thrust", thrust.len()), ("propellant_volume", propellant_volume.len())] {
        if len != time.len() {
            return Err(ExportError::invalid(
                channel,
                format!("channel length {} does not match time length {}", len, time.len()),
            ));
        }
    }
    if !density.is_finite() {
        return Err(ExportError::invalid(
            "propellant_density",
            format!("must be finite, got {}", density),
        ));
    }

    let rows = time
        .iter()
        .zip(thrust)
        .zip(propellant_volume)
        .map(|((&time, &thrust), &volume)| MotorDataRow {
            time,
            thrust,
            propellant_mass: volume * density,
        })
        .collect();

    Ok(MotorDataTable { rows })
}
