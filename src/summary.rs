//! Scalar performance figures of a run, for reports next to the exported files.

use crate::constants::G_ACCEL_MPS2;
use crate::error::Result;
use crate::export::RunResult;
use crate::motor_file::MotorMetadata;
use serde::{Deserialize, Serialize};

/// Thrust, impulse and pressure summary over the burn (up to burnout)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub propellant_mass: f64,     // kg, initial
    pub max_thrust: f64,          // N
    pub mean_thrust: f64,         // N
    pub total_impulse: f64,       // N·s
    pub specific_impulse: f64,    // s
    pub max_pressure: f64,        // Pa
    pub mean_pressure: f64,       // Pa
    pub burnout_time: f64,        // s
    pub thrust_time: Option<f64>, // s
}

impl PerformanceSummary {
    pub fn from_run(run: &RunResult, metadata: &MotorMetadata) -> Result<Self> {
        let truncated = run.truncate_at_burnout()?;

        let propellant_mass = truncated.propellant_volume[0] * metadata.propellant_density;
        let total_impulse = trapezoid(truncated.time, truncated.thrust);
        let specific_impulse = if propellant_mass > 0.0 {
            total_impulse / (propellant_mass * G_ACCEL_MPS2)
        } else {
            0.0
        };

        Ok(Self {
            propellant_mass,
            max_thrust: max(truncated.thrust),
            mean_thrust: mean(truncated.thrust),
            total_impulse,
            specific_impulse,
            max_pressure: max(truncated.chamber_pressure),
            mean_pressure: mean(truncated.chamber_pressure),
            burnout_time: run.t_burnout,
            thrust_time: run.t_thrust,
        })
    }
}

fn trapezoid(x: &[f64], y: &[f64]) -> f64 {
    x.windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| 0.5 * (ys[0] + ys[1]) * (xs[1] - xs[0]))
        .sum()
}

fn max(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExportError;

    fn metadata() -> MotorMetadata {
        MotorMetadata {
            name: "Summary".to_string(),
            manufacturer: "Test".to_string(),
            outer_diameter: 0.05,
            chamber_length: 0.3,
            propellant_density: 2000.0,
            motor_mass: 1.0,
        }
    }

    #[test]
    fn test_summary_over_burn() {
        let run = RunResult {
            time: vec![0.0, 1.0, 2.0, 3.0],
            thrust: vec![0.0, 100.0, 100.0, 0.0],
            chamber_pressure: vec![1e6, 3e6, 2e6, 1e5],
            propellant_volume: vec![5e-4, 3e-4, 1e-4, 0.0],
            t_burnout: 2.0,
            t_thrust: Some(3.0),
        };

        let summary = PerformanceSummary::from_run(&run, &metadata()).unwrap();

        assert_eq!(summary.propellant_mass, 1.0);
        assert_eq!(summary.max_thrust, 100.0);
        assert!((summary.mean_thrust - 200.0 / 3.0).abs() < 1e-12);
        // 0.5*(0+100)*1 + 0.5*(100+100)*1
        assert_eq!(summary.total_impulse, 150.0);
        assert!((summary.specific_impulse - 150.0 / G_ACCEL_MPS2).abs() < 1e-12);
        assert_eq!(summary.max_pressure, 3e6);
        assert!((summary.mean_pressure - 2e6).abs() < 1e-6);
        assert_eq!(summary.burnout_time, 2.0);
        assert_eq!(summary.thrust_time, Some(3.0));
    }

    #[test]
    fn test_summary_requires_boundary() {
        let run = RunResult {
            time: vec![0.0, 1.0],
            thrust: vec![0.0, 10.0],
            chamber_pressure: vec![1e5, 1e6],
            propellant_volume: vec![1e-4, 0.0],
            t_burnout: 4.0,
            t_thrust: None,
        };
        let err = PerformanceSummary::from_run(&run, &metadata()).unwrap_err();
        assert!(matches!(err, ExportError::BoundaryNotFound { .. }));
    }
}
