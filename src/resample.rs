//! Uniform-grid resampling of irregular simulation output.
//!
//! Simulation output is stepped by the solver, while motor files want a fixed
//! number of evenly spaced samples. `resample` maps a `(time, value)` channel
//! onto `n_points` samples spanning `[0, time[-1] + dt]`, interpolating
//! linearly inside the raw domain and applying an explicit fill policy on
//! either side of it.

use crate::constants::MIN_RESAMPLE_POINTS;
use crate::error::{ExportError, Result};

/// Value used for grid points outside the raw time domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FillPolicy {
    /// Repeat the first raw sample
    HoldFirst,
    /// Repeat the last raw sample
    HoldLast,
    /// Emit zero
    Zero,
}

impl FillPolicy {
    fn value(self, values: &[f64]) -> f64 {
        match self {
            FillPolicy::HoldFirst => values.first().copied().unwrap_or(0.0),
            FillPolicy::HoldLast => values.last().copied().unwrap_or(0.0),
            FillPolicy::Zero => 0.0,
        }
    }
}

impl std::fmt::Display for FillPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FillPolicy::HoldFirst => "hold_first",
            FillPolicy::HoldLast => "hold_last",
            FillPolicy::Zero => "zero",
        };
        write!(f, "{}", name)
    }
}

/// Left/right fill pair applied to one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelFill {
    pub left: FillPolicy,
    pub right: FillPolicy,
}

/// No thrust before ignition or after burnout
pub const THRUST_FILL: ChannelFill = ChannelFill {
    left: FillPolicy::Zero,
    right: FillPolicy::Zero,
};

/// Full propellant load before ignition, fully consumed after burnout
pub const PROPELLANT_MASS_FILL: ChannelFill = ChannelFill {
    left: FillPolicy::HoldFirst,
    right: FillPolicy::Zero,
};

/// One channel resampled onto a uniform grid
#[derive(Debug, Clone, PartialEq)]
pub struct ResampledChannel {
    pub time: Vec<f64>,   // s, uniform grid
    pub values: Vec<f64>, // channel units
}

impl ResampledChannel {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Constant spacing of the grid (s)
    pub fn step(&self) -> f64 {
        if self.time.len() < 2 {
            return 0.0;
        }
        self.time[1] - self.time[0]
    }
}

/// Thrust and propellant-mass channels on one shared uniform grid
#[derive(Debug, Clone, PartialEq)]
pub struct ResampledSeries {
    pub time: Vec<f64>,            // s
    pub thrust: Vec<f64>,          // N
    pub propellant_mass: Vec<f64>, // kg
}

impl ResampledSeries {
    /// Join two channels resampled onto the same grid
    pub fn from_channels(thrust: ResampledChannel, propellant_mass: ResampledChannel) -> Result<Self> {
        if thrust.time != propellant_mass.time {
            return Err(ExportError::invalid(
                "resampled series",
                format!(
                    "thrust grid ({} samples) differs from propellant mass grid ({} samples)",
                    thrust.len(),
                    propellant_mass.len()
                ),
            ));
        }
        Ok(Self {
            time: thrust.time,
            thrust: thrust.values,
            propellant_mass: propellant_mass.values,
        })
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// Resample a channel onto `n_points` evenly spaced samples over `[0, time[-1] + dt]`.
///
/// `dt` is the nominal solver step; `None` takes `time[1] - time[0]`.
pub fn resample(
    time: &[f64],
    values: &[f64],
    n_points: usize,
    dt: Option<f64>,
    left_fill: FillPolicy,
    right_fill: FillPolicy,
) -> Result<ResampledChannel> {
    resample_named("resample", time, values, n_points, dt, left_fill, right_fill)
}

/// Resample a named channel with its left/right fill pair.
///
/// Errors carry `channel` as their context.
pub fn resample_channel(
    channel: &str,
    time: &[f64],
    values: &[f64],
    n_points: usize,
    dt: Option<f64>,
    fill: ChannelFill,
) -> Result<ResampledChannel> {
    resample_named(channel, time, values, n_points, dt, fill.left, fill.right)
}

fn resample_named(
    channel: &str,
    time: &[f64],
    values: &[f64],
    n_points: usize,
    dt: Option<f64>,
    left_fill: FillPolicy,
    right_fill: FillPolicy,
) -> Result<ResampledChannel> {
    validate_channel(channel, time, values)?;

    if n_points < MIN_RESAMPLE_POINTS {
        return Err(ExportError::invalid(
            channel,
            format!("n_points must be at least {}, got {}", MIN_RESAMPLE_POINTS, n_points),
        ));
    }

    let step = match dt {
        Some(step) if !step.is_finite() || step < 0.0 => {
            return Err(ExportError::invalid(
                channel,
                format!("time step must be finite and non-negative, got {}", step),
            ));
        }
        Some(step) => step,
        None => time[1] - time[0],
    };

    let end = time[time.len() - 1] + step;
    let new_time = uniform_grid(end, n_points);
    let new_values = new_time
        .iter()
        .map(|&t| interpolate(time, values, t, left_fill, right_fill))
        .collect();

    Ok(ResampledChannel {
        time: new_time,
        values: new_values,
    })
}

/// `n_points` evenly spaced samples from 0 to `end`, the last one exactly `end`
pub fn uniform_grid(end: f64, n_points: usize) -> Vec<f64> {
    match n_points {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let step = end / (n_points - 1) as f64;
            let mut grid: Vec<f64> = (0..n_points).map(|i| i as f64 * step).collect();
            grid[n_points - 1] = end;
            grid
        }
    }
}

/// Piecewise-linear interpolation of `values` at `x` with explicit out-of-domain fill.
///
/// `time` must be sorted. Samples past the shorter of the two slices are
/// ignored, and an empty series yields the left fill (0 for hold policies).
pub fn interpolate(
    time: &[f64],
    values: &[f64],
    x: f64,
    left_fill: FillPolicy,
    right_fill: FillPolicy,
) -> f64 {
    let len = time.len().min(values.len());
    let (time, values) = (&time[..len], &values[..len]);
    let Some(last) = len.checked_sub(1) else {
        return left_fill.value(values);
    };

    if x < time[0] {
        return left_fill.value(values);
    }
    if x > time[last] {
        return right_fill.value(values);
    }
    if x == time[last] {
        return values[last];
    }

    // Binary search for the interval with time[left] <= x < time[right]
    let mut left = 0;
    let mut right = last;

    while right - left > 1 {
        let mid = (left + right) / 2;
        if time[mid] <= x {
            left = mid;
        } else {
            right = mid;
        }
    }

    let x1 = time[left];
    let x2 = time[right];
    let y1 = values[left];
    let y2 = values[right];

    if x2 == x1 {
        return y1;
    }

    y1 + (y2 - y1) * (x - x1) / (x2 - x1)
}

/// Shared checks for a raw `(time, value)` channel
pub(crate) fn validate_channel(channel: &str, time: &[f64], values: &[f64]) -> Result<()> {
    if time.is_empty() {
        return Err(ExportError::invalid(channel, "time axis is empty"));
    }
    if time.len() < 2 {
        return Err(ExportError::invalid(
            channel,
            format!("time axis needs at least 2 samples, got {}", time.len()),
        ));
    }
    if values.len() != time.len() {
        return Err(ExportError::invalid(
            channel,
            format!(
                "channel length {} does not match time length {}",
                values.len(),
                time.len()
            ),
        ));
    }
    if let Some(i) = time.iter().position(|t| !t.is_finite()) {
        return Err(ExportError::invalid(
            channel,
            format!("time is not finite at index {} ({})", i, time[i]),
        ));
    }
    if let Some(i) = values.iter().position(|v| !v.is_finite()) {
        return Err(ExportError::invalid(
            channel,
            format!("value is not finite at index {} ({})", i, values[i]),
        ));
    }
    if let Some(i) = time.windows(2).position(|w| w[1] < w[0]) {
        return Err(ExportError::invalid(
            channel,
            format!(
                "time is not sorted at index {} ({} after {})",
                i + 1,
                time[i + 1],
                time[i]
            ),
        ));
    }
    Ok(())
}
