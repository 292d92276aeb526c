//! End-to-end tests for the `pensum eval` subcommand.

use assert_cmd::Command;
use predicates::prelude::*;

fn write_request(dir: &tempfile::TempDir, name: &str, document: &serde_json::Value) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, serde_json::to_string_pretty(document).unwrap()).unwrap();
    path.to_string_lossy().into_owned()
}

fn retirement_request() -> serde_json::Value {
    serde_json::json!({
        "tenant_id": "acme",
        "calculation_instructions": {
            "mutations": [
                {
                    "mutation_id": "m-1",
                    "mutation_definition_name": "create_dossier",
                    "mutation_type": "PENSION",
                    "actual_at": "2024-01-01",
                    "mutation_properties": {
                        "dossier_id": "D1",
                        "person_id": "P1",
                        "name": "Alice",
                        "birth_date": "1960-01-01"
                    }
                },
                {
                    "mutation_id": "m-2",
                    "mutation_definition_name": "add_policy",
                    "mutation_type": "PENSION",
                    "actual_at": "2024-01-01",
                    "mutation_properties": {
                        "scheme_id": "S1",
                        "employment_start_date": "1990-01-01",
                        "salary": 50000,
                        "part_time_factor": 1.0
                    }
                },
                {
                    "mutation_id": "m-3",
                    "mutation_definition_name": "calculate_retirement_benefit",
                    "mutation_type": "PENSION",
                    "actual_at": "2025-01-01",
                    "mutation_properties": {
                        "retirement_date": "2025-01-01"
                    }
                }
            ]
        }
    })
}

#[test]
fn eval_prints_success_response() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_request(&dir, "request.json", &retirement_request());

    Command::cargo_bin("pensum")
        .unwrap()
        .arg("eval")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"calculation_outcome\": \"SUCCESS\""))
        .stdout(predicate::str::contains("\"tenant_id\": \"acme\""))
        .stdout(predicate::str::contains("\"status\": \"RETIRED\""));
}

#[test]
fn business_failure_still_exits_zero_with_failure_outcome() {
    let document = serde_json::json!({
        "tenant_id": "acme",
        "calculation_instructions": {
            "mutations": [{
                "mutation_id": "m-1",
                "mutation_definition_name": "calculate_retirement_benefit",
                "mutation_type": "PENSION",
                "actual_at": "2025-01-01",
                "mutation_properties": {"retirement_date": "2025-01-01"}
            }]
        }
    });
    let dir = tempfile::tempdir().unwrap();
    let path = write_request(&dir, "request.json", &document);

    Command::cargo_bin("pensum")
        .unwrap()
        .arg("eval")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"calculation_outcome\": \"FAILURE\""))
        .stdout(predicate::str::contains("DOSSIER_NOT_FOUND"));
}

#[test]
fn invalid_request_document_fails_with_field_paths() {
    let document = serde_json::json!({
        "tenant_id": "ACME",
        "calculation_instructions": {"mutations": []}
    });
    let dir = tempfile::tempdir().unwrap();
    let path = write_request(&dir, "request.json", &document);

    Command::cargo_bin("pensum")
        .unwrap()
        .arg("eval")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("tenant_id"))
        .stderr(predicate::str::contains("calculation_instructions.mutations"));
}

#[test]
fn missing_file_reports_read_error() {
    Command::cargo_bin("pensum")
        .unwrap()
        .args(["eval", "/nonexistent/request.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}
