use std::io::Write;
use std::process::Command;

fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_ttl-cache"))
        .args(args)
        .output()
        .expect("Failed to execute ttl-cache")
}

#[test]
fn test_help_lists_subcommands() {
    let output = run_cli(&["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("demo"));
    assert!(stdout.contains("stress"));
    assert!(stdout.contains("--ttl-secs"));
}

#[test]
fn test_config_prints_defaults() {
    let output = run_cli(&["config"]);
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["ttl_secs"], 900.0);
    assert_eq!(json["cleanup_interval_secs"], 60.0);
}

#[test]
fn test_flags_override_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(br#"{"ttl_secs": 30, "cleanup_interval_secs": 2}"#)
        .unwrap();
    let path = file.path().to_str().unwrap();

    let output = run_cli(&["config", "--config", path, "--ttl-secs", "7.5"]);
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["ttl_secs"], 7.5);
    assert_eq!(json["cleanup_interval_secs"], 2.0);
}

#[test]
fn test_zero_ttl_fails() {
    let output = run_cli(&["config", "--ttl-secs", "0"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("greater than zero"), "{}", stderr);
}

#[test]
fn test_stress_small_run() {
    let output = run_cli(&["stress", "--threads", "3", "--ops", "500", "--key-space", "50"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("final size"), "{}", stdout);
}

#[test]
fn test_demo_expires_first_entries() {
    let output = run_cli(&["demo", "--ttl-secs", "0.3", "--cleanup-interval-secs", "0.1"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("contains 1: false"), "{}", stdout);
    assert!(stdout.contains("contains 2: false"), "{}", stdout);
    assert!(stdout.contains("contains 3: true"), "{}", stdout);
    assert!(stdout.contains("contains 4: true"), "{}", stdout);
    assert!(stdout.contains("size: 2"), "{}", stdout);
    assert!(stdout.contains("cleared: true"), "{}", stdout);
}
