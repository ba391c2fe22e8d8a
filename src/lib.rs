//! # SRM Export
//!
//! Performance export pipeline for solid rocket motor simulations: resamples
//! thrust and propellant curves onto a fixed grid and writes RASP `.eng`
//! motor files plus CSV data dumps.

// Re-export the main types and functions
pub use error::{ExportError, Result};
pub use export::{burnout_index, ExportOrchestrator, ExportRecord, PreparedExport, RunResult, TruncatedRun};
pub use motor_file::{encode, MotorFileDocument, MotorFileHeader, MotorMetadata};
pub use resample::{
    interpolate, resample, resample_channel, uniform_grid, ChannelFill, FillPolicy,
    ResampledChannel, ResampledSeries, PROPELLANT_MASS_FILL, THRUST_FILL,
};
pub use summary::PerformanceSummary;
pub use table::{export_table, MotorDataRow, MotorDataTable};

// Module declarations
pub mod constants;
pub mod error;
pub mod export;
pub mod motor_file;
pub mod resample;
pub mod summary;
pub mod table;
