//! RASP `.eng` motor file encoding.
//!
//! Layout consumed by OpenRocket, RASAero and friends:
//!
//! ```text
//! ; <attribution line 1>
//! ; <attribution line 2>
//! <name> <D_out_mm> <L_chamber_mm> P <m_prop0_kg> <m_total0_kg> <manufacturer>
//!    <t0> <F0>
//!    ...
//! ;
//! ```
//!
//! Consumers parse the header positionally and the rows by decimal count,
//! so the rendering below is bit-exact: 4 decimals for geometry and mass,
//! 2 for time, thrust rounded to whole newtons.

use crate::constants::{
    ENG_ATTRIBUTION_LINE_1, ENG_ATTRIBUTION_LINE_2, ENG_DELAY_PLACEHOLDER, ENG_ROW_INDENT,
    ENG_TERMINATOR, M_TO_MM,
};
use crate::error::{ExportError, Result};
use crate::resample::ResampledSeries;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Static description of a motor, supplied alongside a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotorMetadata {
    pub name: String,
    pub manufacturer: String,
    pub outer_diameter: f64,     // m
    pub chamber_length: f64,     // m
    pub propellant_density: f64, // kg/m³
    pub motor_mass: f64,         // kg, hardware without propellant
}

impl MotorMetadata {
    /// Check every field the motor file and table need.
    ///
    /// Name and manufacturer are whitespace-delimited header tokens, so
    /// they must be non-empty and free of whitespace.
    pub fn validate(&self) -> Result<()> {
        validate_token("metadata.name", &self.name)?;
        validate_token("metadata.manufacturer", &self.manufacturer)?;

        let quantities = [
            ("metadata.outer_diameter", self.outer_diameter),
            ("metadata.chamber_length", self.chamber_length),
            ("metadata.propellant_density", self.propellant_density),
            ("metadata.motor_mass", self.motor_mass),
        ];
        for (field, value) in quantities {
            if !value.is_finite() || value < 0.0 {
                return Err(ExportError::invalid(
                    field,
                    format!("must be finite and non-negative, got {}", value),
                ));
            }
        }
        Ok(())
    }
}

fn validate_token(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ExportError::invalid(field, "is required"));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(ExportError::invalid(
            field,
            format!("must not contain whitespace, got {:?}", value),
        ));
    }
    Ok(())
}

/// Header line of a motor file, in file units
#[derive(Debug, Clone, PartialEq)]
pub struct MotorFileHeader {
    pub name: String,
    pub diameter_mm: f64,
    pub length_mm: f64,
    pub delays: String,
    pub propellant_mass_kg: f64,
    pub total_mass_kg: f64,
    pub manufacturer: String,
}

impl MotorFileHeader {
    /// Header for `metadata` with the given initial propellant mass
    pub fn new(metadata: &MotorMetadata, propellant_mass_kg: f64) -> Self {
        Self {
            name: metadata.name.clone(),
            diameter_mm: metadata.outer_diameter * M_TO_MM,
            length_mm: metadata.chamber_length * M_TO_MM,
            delays: ENG_DELAY_PLACEHOLDER.to_string(),
            propellant_mass_kg,
            total_mass_kg: propellant_mass_kg + metadata.motor_mass,
            manufacturer: metadata.manufacturer.clone(),
        }
    }
}

impl fmt::Display for MotorFileHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:.4} {:.4} {} {:.4} {:.4} {}",
            self.name,
            self.diameter_mm,
            self.length_mm,
            self.delays,
            self.propellant_mass_kg,
            self.total_mass_kg,
            self.manufacturer
        )
    }
}

impl FromStr for MotorFileHeader {
    type Err = ExportError;

    fn from_str(line: &str) -> Result<Self> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 7 {
            return Err(ExportError::invalid(
                "motor file header",
                format!("expected 7 fields, found {}", fields.len()),
            ));
        }

        let number = |index: usize, field: &str| -> Result<f64> {
            fields[index].parse::<f64>().map_err(|_| {
                ExportError::invalid(
                    "motor file header",
                    format!("field {} ({}) is not a number: {:?}", index + 1, field, fields[index]),
                )
            })
        };

        Ok(Self {
            name: fields[0].to_string(),
            diameter_mm: number(1, "diameter")?,
            length_mm: number(2, "length")?,
            delays: fields[3].to_string(),
            propellant_mass_kg: number(4, "propellant mass")?,
            total_mass_kg: number(5, "total mass")?,
            manufacturer: fields[6].to_string(),
        })
    }
}

/// Complete motor file: comments, header, `(time, thrust)` rows, terminator
#[derive(Debug, Clone, PartialEq)]
pub struct MotorFileDocument {
    pub comments: Vec<String>,
    pub header: MotorFileHeader,
    pub samples: Vec<(f64, f64)>, // (s, N)
}

impl MotorFileDocument {
    /// File contents; every line ends in a newline except the terminator
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(128 + self.samples.len() * 16);
        for comment in &self.comments {
            out.push_str(comment);
            out.push('\n');
        }
        out.push_str(&self.header.to_string());
        out.push('\n');
        for &(time, thrust) in &self.samples {
            out.push_str(&format!("{}{:.2} {:.0}\n", ENG_ROW_INDENT, time, thrust));
        }
        out.push_str(ENG_TERMINATOR);
        out
    }

    /// Read a motor file back.
    ///
    /// Leading `;` lines are comments, the first other line is the header,
    /// rows follow until a line starting with `;`.
    pub fn parse(text: &str) -> Result<Self> {
        let mut comments = Vec::new();
        let mut header = None;
        let mut samples = Vec::new();
        let mut terminated = false;

        for (line_no, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            if header.is_none() {
                if line.starts_with(';') {
                    comments.push(raw.trim_end().to_string());
                } else {
                    header = Some(line.parse::<MotorFileHeader>()?);
                }
                continue;
            }

            if line.starts_with(';') {
                terminated = true;
                break;
            }

            let mut parts = line.split_whitespace();
            let row = match (parts.next(), parts.next(), parts.next()) {
                (Some(t), Some(f), None) => t.parse::<f64>().ok().zip(f.parse::<f64>().ok()),
                _ => None,
            };
            match row {
                Some(sample) => samples.push(sample),
                None => {
                    return Err(ExportError::invalid(
                        "motor file",
                        format!("line {} is not a data row: {:?}", line_no + 1, raw),
                    ))
                }
            }
        }

        let header = header.ok_or_else(|| ExportError::invalid("motor file", "no header line"))?;
        if !terminated {
            return Err(ExportError::invalid("motor file", "missing terminator line"));
        }

        Ok(Self {
            comments,
            header,
            samples,
        })
    }
}

impl fmt::Display for MotorFileDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Build the motor file for a resampled run.
///
/// Initial propellant mass in the header is the first resampled
/// propellant-mass sample.
pub fn encode(resampled: &ResampledSeries, metadata: &MotorMetadata) -> Result<MotorFileDocument> {
    metadata.validate()?;

    if resampled.is_empty() {
        return Err(ExportError::invalid("motor file", "resampled series has no samples"));
    }
    if resampled.thrust.len() != resampled.len() || resampled.propellant_mass.len() != resampled.len() {
        return Err(ExportError::invalid(
            "motor file",
            format!(
                "channel lengths differ: time {}, thrust {}, propellant mass {}",
                resampled.len(),
                resampled.thrust.len(),
                resampled.propellant_mass.len()
            ),
        ));
    }

    let header = MotorFileHeader::new(metadata, resampled.propellant_mass[0]);
    let samples = resampled
        .time
        .iter()
        .copied()
        .zip(resampled.thrust.iter().copied())
        .collect();

    Ok(MotorFileDocument {
        comments: vec![
            ENG_ATTRIBUTION_LINE_1.to_string(),
            ENG_ATTRIBUTION_LINE_2.to_string(),
        ],
        header,
        samples,
    })
}
