use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn bayes_query() -> Command {
    Command::cargo_bin("bayes-query").expect("binary built")
}

fn sample(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("queries")
        .join(name)
}

#[test]
fn point_query_prints_probability() {
    bayes_query()
        .args([
            "query",
            "--network",
            "builtin:rain_train",
            "--target",
            "Appointment=Attend",
            "--given",
            "Rain=Yes",
            "--given",
            "Maintenance=No",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "P(Appointment=Attend | Maintenance=No, Rain=Yes) = 0.810000",
        ));
}

#[test]
fn distribution_query_as_json() {
    let output = bayes_query()
        .args([
            "query",
            "-n",
            "builtin:chain",
            "-t",
            "C",
            "--backend",
            "ve",
            "--json",
        ])
        .output()
        .expect("runs");
    assert!(output.status.success());
    let posterior: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("posterior JSON");
    assert_eq!(posterior["variable"], "C");
    let p0 = posterior["probabilities"][0].as_f64().expect("number");
    assert!((p0 - 0.652).abs() < 1e-9);
}

#[test]
fn unknown_evidence_variable_fails() {
    bayes_query()
        .args([
            "query",
            "--network",
            "builtin:chain",
            "--target",
            "C=0",
            "--given",
            "Z=1",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown variable 'Z'"));
}

#[test]
fn malformed_observation_is_rejected_by_parser() {
    bayes_query()
        .args(["query", "-n", "builtin:chain", "-t", "C", "-g", "A"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected VAR=VALUE"));
}

#[test]
fn check_prints_structure() {
    bayes_query()
        .args(["check", "--network", "builtin:rain_train"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Train [OnTime, Delayed] <- Rain, Maintenance"))
        .stdout(predicate::str::contains(
            "Topological order: Rain -> Maintenance -> Train -> Appointment",
        ));
}

#[test]
fn check_reports_invalid_definition() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("bad.json");
    fs::write(
        &path,
        r#"{
            "name": "bad",
            "variables": [{ "name": "A", "states": ["0", "1"] }],
            "tables": [{ "variable": "A", "values": [[0.6], [0.6]] }]
        }"#,
    )
    .expect("write definition");
    bayes_query()
        .args(["check", "--network"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("sum"));
}

#[test]
fn export_then_query_file() {
    let dir = tempdir().expect("temp dir");
    let exported = bayes_query()
        .args(["export", "--network", "builtin:twilight", "--format", "json"])
        .output()
        .expect("runs");
    assert!(exported.status.success());
    let path = dir.path().join("twilight.json");
    fs::write(&path, &exported.stdout).expect("write export");

    bayes_query()
        .args(["query", "--network"])
        .arg(&path)
        .args(["--target", "ThreatToBella=High", "--given", "Volturi=Yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("= 0.843000"));
}

#[test]
fn run_writes_results() {
    let dir = tempdir().expect("temp dir");
    bayes_query()
        .current_dir(dir.path())
        .args(["run", "--config"])
        .arg(sample("rain_train.yaml"))
        .args(["--run-id", "smoke", "--backend", "variable_elimination"])
        .assert()
        .success()
        .stdout(predicate::str::contains("attend_given_rain_no_maintenance"))
        .stdout(predicate::str::contains("variable_elimination"))
        .stdout(predicate::str::contains("3 queries answered"));

    let results = fs::read_to_string(dir.path().join("out/smoke/results.jsonl"))
        .expect("results written");
    assert_eq!(results.lines().count(), 3);
    for line in results.lines() {
        let row: serde_json::Value = serde_json::from_str(line).expect("row JSON");
        assert_eq!(row["run_id"], "smoke");
        assert_eq!(row["backend"], "variable_elimination");
    }
}

#[test]
fn run_resolves_network_file_next_to_config() {
    let dir = tempdir().expect("temp dir");
    bayes_query()
        .current_dir(dir.path())
        .args(["run", "--config"])
        .arg(sample("respiratory.yaml"))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "saturation_given_virus: P(Saturation=Low | Virus=Yes) = 0.220000",
        ));
}

#[test]
fn twilight_sample_reproduces_story_answers() {
    let dir = tempdir().expect("temp dir");
    bayes_query()
        .current_dir(dir.path())
        .args(["run", "--config"])
        .arg(sample("twilight.yaml"))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "P(BellaState=Vampire | Time=Day, Volturi=Yes, Weather=Cloudy) = 0.580730",
        ))
        .stdout(predicate::str::contains(
            "P(EdwardDecision=Turn | Time=Night, Volturi=No, Weather=Sunny) = 0.292600",
        ))
        .stdout(predicate::str::contains(
            "P(BellaState=Vampire | Time=Day, Volturi=No, Weather=Sunny) = 0.209480",
        ));
}

#[test]
fn every_sample_config_validates() {
    let dir = tempdir().expect("temp dir");
    for name in [
        "rain_train.yaml",
        "twilight.yaml",
        "twilight_wolves.yaml",
        "respiratory.yaml",
        "road_accident.yaml",
    ] {
        bayes_query()
            .current_dir(dir.path())
            .args(["run", "--validate-only", "--config"])
            .arg(sample(name))
            .assert()
            .success();
    }
}

#[test]
fn validate_only_skips_execution() {
    let dir = tempdir().expect("temp dir");
    bayes_query()
        .current_dir(dir.path())
        .args(["run", "--validate-only", "--config"])
        .arg(sample("twilight.yaml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Validation-only mode"));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn run_halts_on_zero_probability_evidence() {
    let dir = tempdir().expect("temp dir");
    let config = dir.path().join("impossible.yaml");
    fs::write(
        &config,
        r#"
run_id: "impossible"
network: "builtin:road_accident"
queries:
  - name: "risk_given_contradiction"
    variable: "Risk"
    evidence:
      Accident: "No"
      Severity: "Severe"
"#,
    )
    .expect("write config");
    bayes_query()
        .current_dir(dir.path())
        .args(["run", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("ZeroEvidenceProbability"));
}
