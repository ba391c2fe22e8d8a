use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn get_cli_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_srm-export-cli"))
}

fn scratch_dir(label: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "srm-export-cli-{}-{}",
        label,
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

fn write_inputs(dir: &Path, t_burnout: f64) -> (PathBuf, PathBuf) {
    let run = format!(
        r#"{{
            "t": [0.0, 0.25, 0.5, 0.75, 1.0, 1.25],
            "T": [0.0, 420.0, 510.0, 480.0, 120.0, 0.0],
            "P0": [101325.0, 4.1e6, 5.0e6, 4.7e6, 1.2e6, 101325.0],
            "V_prop": [3.0e-4, 2.2e-4, 1.4e-4, 0.6e-4, 0.0, 0.0],
            "t_burnout": {},
            "t_thrust": 1.25
        }}"#,
        t_burnout
    );
    let motor = r#"{
        "name": "Cli_Motor",
        "manufacturer": "Tester",
        "outer_diameter": 0.0508,
        "chamber_length": 0.25,
        "propellant_density": 1800.0,
        "motor_mass": 0.8
    }"#;

    let run_path = dir.join("run.json");
    let motor_path = dir.join("motor.json");
    fs::write(&run_path, run).unwrap();
    fs::write(&motor_path, motor).unwrap();
    (run_path, motor_path)
}

#[test]
fn test_cli_export_table() {
    let dir = scratch_dir("table");
    let out_dir = dir.join("out");
    fs::create_dir_all(&out_dir).unwrap();
    let (run, motor) = write_inputs(&dir, 1.0);

    let output = Command::new(get_cli_binary())
        .args(["export", "--run"])
        .arg(&run)
        .arg("--motor")
        .arg(&motor)
        .arg("--output-dir")
        .arg(&out_dir)
        .args(["--points", "10"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command should succeed: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("EXPORT RESULTS"), "Should contain export summary");
    assert!(out_dir.join("Cli_Motor.eng").exists());
    assert!(out_dir.join("Cli_Motor.csv").exists());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_cli_export_json() {
    let dir = scratch_dir("json");
    let (run, motor) = write_inputs(&dir, 1.0);

    let output = Command::new(get_cli_binary())
        .args(["export", "--run"])
        .arg(&run)
        .arg("--motor")
        .arg(&motor)
        .arg("--output-dir")
        .arg(&dir)
        .args(["--output", "json"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command should succeed");
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("JSON report");
    assert_eq!(report["name"], "Cli_Motor");
    assert_eq!(report["motor_file_points"], 25);
    assert_eq!(report["table_rows"], 5);
    assert!(report["summary"]["total_impulse"].as_f64().unwrap() > 0.0);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_cli_short_output_flag() {
    let dir = scratch_dir("short-flag");
    let (run, motor) = write_inputs(&dir, 1.0);

    let output = Command::new(get_cli_binary())
        .args(["export", "--run"])
        .arg(&run)
        .arg("--motor")
        .arg(&motor)
        .arg("--output-dir")
        .arg(&dir)
        .args(["-o", "json"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command should succeed");
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("JSON report");
    assert_eq!(report["name"], "Cli_Motor");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_cli_inspect_round_trip() {
    let dir = scratch_dir("inspect");
    let (run, motor) = write_inputs(&dir, 1.0);

    let export = Command::new(get_cli_binary())
        .args(["export", "--run"])
        .arg(&run)
        .arg("--motor")
        .arg(&motor)
        .arg("--output-dir")
        .arg(&dir)
        .output()
        .expect("Failed to execute command");
    assert!(export.status.success());

    let output = Command::new(get_cli_binary())
        .arg("inspect")
        .arg(dir.join("Cli_Motor.eng"))
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Inspect should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Cli_Motor"));
    assert!(stdout.contains("Tester"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_cli_unreachable_burnout_fails() {
    let dir = scratch_dir("boundary");
    let (run, motor) = write_inputs(&dir, 9.0);

    let output = Command::new(get_cli_binary())
        .args(["export", "--run"])
        .arg(&run)
        .arg("--motor")
        .arg(&motor)
        .arg("--output-dir")
        .arg(&dir)
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Export past the time grid should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("burnout boundary not found"), "stderr: {}", stderr);
    assert!(!dir.join("Cli_Motor.eng").exists());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_cli_missing_output_dir_fails() {
    let dir = scratch_dir("missing");
    let (run, motor) = write_inputs(&dir, 1.0);

    let output = Command::new(get_cli_binary())
        .args(["export", "--run"])
        .arg(&run)
        .arg("--motor")
        .arg(&motor)
        .arg("--output-dir")
        .arg(dir.join("does-not-exist"))
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Missing output directory should fail");
    assert!(!dir.join("does-not-exist").exists());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_cli_help() {
    let output = Command::new(get_cli_binary())
        .args(["--help"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Help command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("export"), "Should list export command");
    assert!(stdout.contains("inspect"), "Should list inspect command");
    assert!(stdout.contains("info"), "Should list info command");
}

#[test]
fn test_cli_invalid_command() {
    let output = Command::new(get_cli_binary())
        .args(["invalid-command"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Invalid command should fail");
}

#[test]
fn test_cli_missing_required_args() {
    let output = Command::new(get_cli_binary())
        .args(["export"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Should fail with missing args");
}
