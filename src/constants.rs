/// Physical constants and fixed format values used by the export pipeline

/// Gravitational acceleration in m/s²
pub const G_ACCEL_MPS2: f64 = 9.80665;

/// Conversion factor: meters to millimeters
pub const M_TO_MM: f64 = 1e3;

/// Conversion factor: pascals to megapascals
pub const PA_TO_MPA: f64 = 1e-6;

// Motor file (RASP .eng) format constants
//
// External simulators read the header positionally and the data rows by
// decimal count, so none of these may change without breaking consumers.

/// First attribution comment line of every generated motor file
pub const ENG_ATTRIBUTION_LINE_1: &str =
    "; Generated by SRM Solver program written by Felipe Bogaerts de Mattos";

/// Second attribution comment line of every generated motor file
pub const ENG_ATTRIBUTION_LINE_2: &str = "; Juiz de Fora, Brasil";

/// Delay-code placeholder written in the header ("P" = plugged, no ejection delay)
pub const ENG_DELAY_PLACEHOLDER: &str = "P";

/// Terminator line closing the data block
pub const ENG_TERMINATOR: &str = ";";

/// Leading indentation of each data row
pub const ENG_ROW_INDENT: &str = "   ";

/// Decimal places for geometry and mass header fields
pub const ENG_HEADER_DECIMALS: usize = 4;

/// Decimal places for time in data rows (s)
pub const ENG_TIME_DECIMALS: usize = 2;

/// Decimal places for thrust in data rows (N)
pub const ENG_THRUST_DECIMALS: usize = 0;

/// File extension of the motor file artifact
pub const ENG_EXTENSION: &str = "eng";

/// File extension of the tabular artifact
pub const CSV_EXTENSION: &str = "csv";

/// Column names of the tabular export, in order
pub const TABLE_COLUMNS: [&str; 3] = ["Time", "Thrust", "Prop_Mass"];

/// Default motor file resolution (samples per curve)
///
/// Most flight simulators handle a few dozen points comfortably; more
/// points only grow the file without improving the flight prediction.
pub const DEFAULT_ENG_RESOLUTION: usize = 25;

/// Minimum number of samples in a resampled series
pub const MIN_RESAMPLE_POINTS: usize = 2;
