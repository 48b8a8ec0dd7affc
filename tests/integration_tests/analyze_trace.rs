//! Integration tests for the tracedoctor binary.

use std::io::Write;
use std::process::{Command, Stdio};

const SAMPLE_PATH: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/src/trace/testdata/query_result.json"
);

/// Command with config lookup pointed away from the user's real config.
fn tracedoctor() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tracedoctor"));
    cmd.env("TRACEDOCTOR_CONFIG_PATH", "/nonexistent/tracedoctor.toml");
    cmd
}

/// Test reading a query result from a file.
#[test]
fn test_analyze_from_file() {
    let output = tracedoctor()
        .arg(SAMPLE_PATH)
        .output()
        .expect("Failed to run tracedoctor");

    assert!(output.status.success(), "Should succeed with sample result");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("| Total   |     51.000 ms |"), "{stdout}");
    assert!(stdout.contains("| Other   |      3.000 ms |"));
    assert!(stdout.contains("found 1 search:\n"));
    assert!(stdout.contains("|      0 |     2 |     31.500 ms | music\n"));
    assert!(stdout.contains("slowest content node was: music[1]: 31.500 ms\n"));
    assert!(stdout.contains("(average of other content nodes for the same search was 12.250 ms)\n"));
    assert!(stdout.contains("found 2 threads, slowest matching/ranking was thread #0: 14.000 ms\n"));
    assert!(stdout.contains("(average of other threads was 10.000 ms)\n"));
    assert!(stdout.contains(
        "|       2000 |      0.400 |      7.500 |      0.000 |      0.000 | /0 AndBlueprint, AndSearch\n"
    ));
    assert!(stdout.contains(
        "|       1500 |      0.500 |      2.000 |      0.500 |      0.000 | /0/0 AttributeBlueprint, NearestNeighborIterator\n"
    ));
    assert!(stdout.contains("|        100 |      3.000 |      1.000 | rankingExpression(firstPhase)\n"));
    assert!(stdout.contains("|        100 |      2.000 |      2.000 |   closeness(field,embedding)\n"));
    assert!(stdout.contains(
        "Nearest neighbor global filter took 4.000 ms (12.7% of content node time):\n"
    ));
    assert!(stdout.contains("|        100 |      0.120 | embedding (index top k using filter)\n"));
}

/// Test that the binary reads stdin when no file is given.
#[test]
fn test_analyze_from_stdin() {
    let mut child = tracedoctor()
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn tracedoctor");

    let input = std::fs::read(SAMPLE_PATH).unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(&input)
        .expect("Failed to write to stdin");

    let output = child.wait_with_output().expect("Failed to read output");
    assert!(output.status.success(), "tracedoctor should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("slowest content node was: music[1]"));
}

/// Output for the same input is byte-for-byte identical.
#[test]
fn test_output_is_stable() {
    let run = || {
        tracedoctor()
            .arg(SAMPLE_PATH)
            .output()
            .expect("Failed to run tracedoctor")
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn test_missing_file() {
    let output = tracedoctor()
        .arg("/nonexistent/path/to/result.json")
        .output()
        .expect("Failed to run tracedoctor");

    assert!(!output.status.success(), "Should fail with non-existent file");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error reading"), "{stderr}");
}

#[test]
fn test_invalid_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("result.json");
    std::fs::write(&path, "timing: 0.5 (not json)").unwrap();

    let output = tracedoctor()
        .arg(&path)
        .output()
        .expect("Failed to run tracedoctor");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not a valid JSON"), "{stderr}");
}

/// A result without timing or traces is valid and produces an empty report.
#[test]
fn test_untraced_result() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("result.json");
    std::fs::write(&path, r#"{"root": {"id": "toplevel", "children": []}}"#).unwrap();

    let output = tracedoctor()
        .arg(&path)
        .output()
        .expect("Failed to run tracedoctor");

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("tracedoctor.toml");
    std::fs::write(&config, "show-timelines = false\nprofile-depth = 1\n").unwrap();

    let output = tracedoctor()
        .arg("--config")
        .arg(&config)
        .arg(SAMPLE_PATH)
        .output()
        .expect("Failed to run tracedoctor");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("Start query setup"));
    assert!(stdout.contains("rankingExpression(firstPhase)"));
    assert!(!stdout.contains("closeness(field,embedding)"));
}

#[test]
fn test_invalid_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("tracedoctor.toml");
    std::fs::write(&config, "max-profile-rows = \"all\"\n").unwrap();

    let output = tracedoctor()
        .arg("--config")
        .arg(&config)
        .arg(SAMPLE_PATH)
        .output()
        .expect("Failed to run tracedoctor");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to parse config file"), "{stderr}");
}
