use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use srm_export::constants::{DEFAULT_ENG_RESOLUTION, PA_TO_MPA};
use srm_export::{
    ExportOrchestrator, MotorFileDocument, MotorMetadata, PerformanceSummary, RunResult,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "srm-export")]
#[command(author = "SRM Solver Team")]
#[command(version = "0.1.0")]
#[command(about = "Export solid rocket motor simulation results to .eng and .csv files", long_about = None)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a simulation run to <name>.eng and <name>.csv
    Export {
        /// Simulation result (JSON: t, T, P0, V_prop, t_burnout)
        #[arg(short = 'r', long)]
        run: PathBuf,

        /// Motor metadata (JSON)
        #[arg(short = 'm', long)]
        motor: PathBuf,

        /// Existing directory to write the artifacts into
        #[arg(short = 'd', long)]
        output_dir: PathBuf,

        /// Number of samples in the motor file
        #[arg(short = 'n', long, default_value_t = DEFAULT_ENG_RESOLUTION)]
        points: usize,

        /// Nominal solver time step (seconds); defaults to the first interval
        #[arg(long)]
        time_step: Option<f64>,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        output: OutputFormat,
    },

    /// Read a motor file and print its header
    Inspect {
        /// Path to the .eng file
        file: PathBuf,
    },

    /// Display program information
    Info,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Table,
}

#[derive(Debug, Serialize)]
struct ExportReport {
    name: String,
    motor_file: PathBuf,
    table_file: PathBuf,
    motor_file_points: usize,
    table_rows: usize,
    summary: PerformanceSummary,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Export {
            run, motor, output_dir, points, time_step, output
        } => {
            let run: RunResult = read_json(&run)?;
            let metadata: MotorMetadata = read_json(&motor)?;

            let mut orchestrator = ExportOrchestrator::new(output_dir);
            if let Some(dt) = time_step {
                orchestrator.set_time_step(dt);
            }

            let record = orchestrator
                .export(&run, &metadata, points)
                .with_context(|| format!("exporting motor '{}'", metadata.name))?;
            let summary = PerformanceSummary::from_run(&run, &metadata)?;

            let report = ExportReport {
                name: record.name,
                motor_file: record.motor_file_path,
                table_file: record.table_path,
                motor_file_points: record.motor_file.samples.len(),
                table_rows: record.table.len(),
                summary,
            };
            display_export_report(&report, output)?;
        },

        Commands::Inspect { file } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let document = MotorFileDocument::parse(&text)
                .with_context(|| format!("parsing {}", file.display()))?;
            display_motor_file(&document);
        },

        Commands::Info => {
            println!("╔════════════════════════════════════════╗");
            println!("║        SRM EXPORT v0.1.0               ║");
            println!("╠════════════════════════════════════════╣");
            println!("║ Solid rocket motor export pipeline.    ║");
            println!("╠════════════════════════════════════════╣");
            println!("║ Features:                              ║");
            println!("║ • Uniform thrust curve resampling      ║");
            println!("║ • RASP .eng motor files                ║");
            println!("║ • CSV thrust / propellant mass dumps   ║");
            println!("╚════════════════════════════════════════╝");
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn display_export_report(report: &ExportReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        },

        OutputFormat::Table => {
            let s = &report.summary;
            println!("╔════════════════════════════════════════╗");
            println!("║         EXPORT RESULTS                 ║");
            println!("╠════════════════════════════════════════╣");
            println!("║ Motor file:   {}", report.motor_file.display());
            println!("║ Data table:   {}", report.table_file.display());
            println!("║ Points:            {:>8}            ║", report.motor_file_points);
            println!("║ Table rows:        {:>8}            ║", report.table_rows);
            println!("╠════════════════════════════════════════╣");
            println!("║ Propellant Mass:   {:>8.3} kg         ║", s.propellant_mass);
            println!("║ Max Thrust:        {:>8.2} N          ║", s.max_thrust);
            println!("║ Mean Thrust:       {:>8.2} N          ║", s.mean_thrust);
            println!("║ Total Impulse:     {:>8.2} N-s        ║", s.total_impulse);
            println!("║ Specific Impulse:  {:>8.2} s          ║", s.specific_impulse);
            println!("║ Max Pressure:      {:>8.3} MPa        ║", s.max_pressure * PA_TO_MPA);
            println!("║ Mean Pressure:     {:>8.3} MPa        ║", s.mean_pressure * PA_TO_MPA);
            println!("║ Burnout Time:      {:>8.3} s          ║", s.burnout_time);
            if let Some(t_thrust) = s.thrust_time {
                println!("║ Thrust Time:       {:>8.3} s          ║", t_thrust);
            }
            println!("╚════════════════════════════════════════╝");
        },
    }

    Ok(())
}

fn display_motor_file(document: &MotorFileDocument) {
    let header = &document.header;
    let duration = document.samples.last().map(|&(t, _)| t).unwrap_or(0.0);
    let peak = document
        .samples
        .iter()
        .map(|&(_, f)| f)
        .fold(0.0_f64, f64::max);

    println!("╔════════════════════════════════════════╗");
    println!("║         MOTOR FILE                     ║");
    println!("╠════════════════════════════════════════╣");
    println!("║ Name:         {}", header.name);
    println!("║ Manufacturer: {}", header.manufacturer);
    println!("║ Diameter:          {:>8.2} mm         ║", header.diameter_mm);
    println!("║ Length:            {:>8.2} mm         ║", header.length_mm);
    println!("║ Delays:            {:>8}            ║", header.delays);
    println!("║ Propellant Mass:   {:>8.4} kg         ║", header.propellant_mass_kg);
    println!("║ Total Mass:        {:>8.4} kg         ║", header.total_mass_kg);
    println!("║ Samples:           {:>8}            ║", document.samples.len());
    println!("║ Duration:          {:>8.2} s          ║", duration);
    println!("║ Peak Thrust:       {:>8.0} N          ║", peak);
    println!("╚════════════════════════════════════════╝");
}
