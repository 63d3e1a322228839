use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "whatif-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_scenarios_writes_output() {
    let exe = env!("CARGO_BIN_EXE_whatif-tester");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-scenarios", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available scenarios"));
    assert!(content.contains("daily-rotation"));
}

#[test]
fn cli_runs_all_checks_with_json_report() {
    let exe = env!("CARGO_BIN_EXE_whatif-tester");
    let output_path = temp_path("run");
    let output = Command::new(exe)
        .args([
            "--scenarios",
            "all",
            "--report",
            "json",
            "--iterations",
            "2",
            "--seeds",
            "1,2",
            "--date",
            "2024-03-01",
            "--output",
        ])
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("What If Automated Tester"));

    let report = std::fs::read_to_string(output_path).expect("read report");
    let results: serde_json::Value = serde_json::from_str(&report).expect("json report");
    let runs = results.as_array().expect("array of results");
    assert_eq!(runs.len(), 9 * 2);
    assert!(runs.iter().all(|run| run["passed"] == true));
}

#[test]
fn cli_fails_on_broken_data() {
    let exe = env!("CARGO_BIN_EXE_whatif-tester");
    let data_path = temp_path("broken.json");
    std::fs::write(&data_path, r#"[{"id": 1, "title": "a"}, {"id": 1, "title": "b"}]"#)
        .expect("write data");
    let output = Command::new(exe)
        .arg("--data")
        .arg(&data_path)
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("appears more than once"));
}
