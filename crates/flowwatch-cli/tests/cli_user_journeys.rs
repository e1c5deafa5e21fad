//! Behavior-driven tests for CLI user journeys
//!
//! These tests run the `flowwatch` binary the way a user would: files in,
//! one JSON envelope on stdout, and the exit status as the verdict.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};

fn flowwatch(home: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_flowwatch"))
        .args(args)
        .env("FLOWWATCH_HOME", home.path())
        .env("RUST_LOG", "off")
        .output()
        .expect("flowwatch binary runs")
}

fn envelope(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is one JSON envelope")
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("temp paths are UTF-8")
}

fn write_flat_bars(path: &Path, count: usize) {
    let bars: Vec<Value> = (0..count)
        .map(|_| json!({"open": 100.0, "high": 100.0, "low": 100.0, "close": 100.0, "volume": 10}))
        .collect();
    fs::write(path, serde_json::to_vec(&bars).expect("serialize bars")).expect("write bars");
}

// =============================================================================
// CLI User Journey: Simulate, Train, Analyze
// =============================================================================

#[test]
fn user_can_feed_simulate_output_through_train_and_analyze() {
    // Given: A user saves simulated flows and bars as an envelope file
    let home = tempdir().expect("tempdir");
    let sample = home.path().join("sample.json");
    let model = home.path().join("model.json");

    let simulated = flowwatch(
        &home,
        &["simulate", "--days", "200", "--bars", "40", "--seed", "7"],
    );
    assert_eq!(simulated.status.code(), Some(0));
    fs::write(&sample, &simulated.stdout).expect("save envelope");

    // When: They train on that file and then analyze it
    let trained = flowwatch(
        &home,
        &["train", "--input", path_arg(&sample), "--model", path_arg(&model)],
    );
    let analyzed = flowwatch(
        &home,
        &[
            "analyze",
            "--flows",
            path_arg(&sample),
            "--bars",
            path_arg(&sample),
            "--model",
            path_arg(&model),
        ],
    );

    // Then: Training pooled every simulated row and wrote the artifact
    assert_eq!(trained.status.code(), Some(0));
    let trained = envelope(&trained);
    assert_eq!(trained["data"]["outcome"], json!({"status": "trained", "rows": 200}));
    assert!(model.exists(), "model artifact should be written");

    // And: Analysis returns anomalies, signals, a recommendation and alerts
    assert_eq!(analyzed.status.code(), Some(0));
    let analyzed = envelope(&analyzed);
    assert!(analyzed["meta"]["request_id"].is_string());
    assert!(analyzed["meta"].get("warnings").is_none());

    let anomalies = analyzed["data"]["anomalies"].as_array().expect("anomalies array");
    assert!((39..=41).contains(&anomalies.len()), "about 20% of 200 rows flagged");
    assert_eq!(analyzed["data"]["signals"]["insufficient_history"], json!(false));
    assert!(analyzed["data"]["recommendation"]["tier"].is_string());
    assert!(analyzed["data"]["alerts"].is_array());
}

#[test]
fn user_can_train_into_the_default_model_location() {
    // Given: No explicit model path, only FLOWWATCH_HOME
    let home = tempdir().expect("tempdir");

    // When: They train on a simulated dataset
    let trained = flowwatch(&home, &["train", "--simulate", "60"]);

    // Then: The artifact lands under the flowwatch home
    assert_eq!(trained.status.code(), Some(0));
    assert!(home.path().join("models").join("anomaly_detector.json").exists());
}

// =============================================================================
// CLI User Journey: Exit Codes
// =============================================================================

#[test]
fn user_gets_not_trained_exit_code_when_model_is_missing() {
    // Given: A flow file but no trained model
    let home = tempdir().expect("tempdir");
    let flows = home.path().join("flows.json");
    fs::write(&flows, r#"[{"date":"2024-01-02","foreign_buy":10.0}]"#).expect("write flows");

    // When: They run detection against an absent artifact
    let output = flowwatch(
        &home,
        &[
            "detect",
            "--input",
            path_arg(&flows),
            "--model",
            path_arg(&home.path().join("absent.json")),
        ],
    );

    // Then: The exit code says the model is not trained and nothing is printed
    assert_eq!(output.status.code(), Some(3));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not trained"));
}

#[test]
fn user_gets_strict_failure_when_warnings_are_present() {
    // Given: Too few bars for any indicator
    let home = tempdir().expect("tempdir");
    let bars = home.path().join("bars.json");
    write_flat_bars(&bars, 5);

    // When: They ask for a recommendation in strict mode
    let output = flowwatch(&home, &["--strict", "recommend", "--bars", path_arg(&bars)]);

    // Then: The envelope still carries the warning and the exit code is 5
    assert_eq!(output.status.code(), Some(5));
    let warned = envelope(&output);
    assert_eq!(warned["meta"]["warnings"].as_array().map(Vec::len), Some(1));
    assert_eq!(warned["data"]["recommendation"]["tier"], json!("HOLD"));
}

#[test]
fn user_can_run_simulate_in_strict_mode() {
    // Given: A user who treats every warning as a failure
    let home = tempdir().expect("tempdir");

    // When: They generate synthetic data
    let output = flowwatch(&home, &["--strict", "simulate", "--days", "10"]);

    // Then: Simulation is warning-free and succeeds
    assert_eq!(output.status.code(), Some(0));
    assert!(envelope(&output)["meta"].get("warnings").is_none());
}

#[test]
fn user_gets_validation_exit_code_for_nan_anomaly_rate() {
    // Given: A non-numeric probability
    let home = tempdir().expect("tempdir");

    // When: They pass it to simulate
    let output = flowwatch(&home, &["simulate", "--anomaly-rate", "NaN"]);

    // Then: The run is rejected as invalid input instead of panicking
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("anomaly_rate"));
}
