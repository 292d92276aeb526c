//! End-to-end scenario suite for the evaluation pipeline.
//!
//! Each scenario builds a request document the way the HTTP boundary
//! would, runs it through the public `evaluate_request` API, and asserts
//! on the response document.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use pensum_core::{CalculationRequest, CalculationResponse, Outcome, Severity};
use pensum_eval::{evaluate_request, EvalContext, FixedAccrualRate};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn mutation(id: &str, name: &str, properties: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "mutation_id": id,
        "mutation_definition_name": name,
        "mutation_type": "PENSION",
        "actual_at": "2024-01-01",
        "mutation_properties": properties,
    })
}

fn create_dossier() -> serde_json::Value {
    mutation(
        "m-create",
        "create_dossier",
        serde_json::json!({
            "dossier_id": "D1",
            "person_id": "P1",
            "name": "Alice",
            "birth_date": "1960-01-01",
        }),
    )
}

fn add_policy() -> serde_json::Value {
    mutation(
        "m-policy",
        "add_policy",
        serde_json::json!({
            "scheme_id": "S1",
            "employment_start_date": "1990-01-01",
            "salary": 50000,
            "part_time_factor": 1.0,
        }),
    )
}

fn run(mutations: Vec<serde_json::Value>) -> CalculationResponse {
    let document = serde_json::json!({
        "tenant_id": "acme",
        "calculation_instructions": {"mutations": mutations},
    });
    let request = CalculationRequest::from_json(&document).expect("valid request document");
    let rates = FixedAccrualRate::default();
    let ctx = EvalContext::new(&rates).with_today(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
    evaluate_request(&request, &ctx).expect("evaluation must not fail")
}

#[test]
fn create_dossier_alone_succeeds() {
    let response = run(vec![create_dossier()]);

    assert_eq!(
        response.calculation_metadata.calculation_outcome,
        Outcome::Success
    );
    assert_eq!(response.calculation_metadata.tenant_id, "acme");
    assert!(response.calculation_result.messages.is_empty());

    let end = &response.calculation_result.end_situation;
    let dossier = end.situation.dossier.as_ref().unwrap();
    assert_eq!(dossier.persons.len(), 1);
    assert!(dossier.policies.is_empty());
    assert_eq!(
        serde_json::to_value(dossier).unwrap()["status"],
        "ACTIVE"
    );

    let initial = &response.calculation_result.initial_situation;
    assert!(initial.situation.dossier.is_none());
    assert_eq!(
        initial.actual_at,
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    );
}

#[test]
fn add_policy_assigns_sequenced_id() {
    let response = run(vec![create_dossier(), add_policy()]);

    assert_eq!(
        response.calculation_metadata.calculation_outcome,
        Outcome::Success
    );
    let end = &response.calculation_result.end_situation;
    let dossier = end.situation.dossier.as_ref().unwrap();
    assert_eq!(dossier.policies.len(), 1);
    assert_eq!(dossier.policies[0].policy_id, "D1-1");
    assert_eq!(dossier.policies[0].salary, dec("50000"));
}

#[test]
fn duplicate_policy_warns_and_inserts() {
    let response = run(vec![create_dossier(), add_policy(), add_policy()]);

    assert_eq!(
        response.calculation_metadata.calculation_outcome,
        Outcome::Success
    );
    let messages = &response.calculation_result.messages;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].code, "DUPLICATE_POLICY");
    assert_eq!(messages[0].severity, Severity::Warning);

    let dossier = response
        .calculation_result
        .end_situation
        .situation
        .dossier
        .as_ref()
        .unwrap();
    assert_eq!(dossier.policies.len(), 2);
    assert_eq!(dossier.policies[1].policy_id, "D1-2");
}

#[test]
fn ten_percent_indexation_raises_salary() {
    let response = run(vec![
        create_dossier(),
        add_policy(),
        mutation(
            "m-index",
            "apply_indexation",
            serde_json::json!({"percentage": 0.10}),
        ),
    ]);

    assert_eq!(
        response.calculation_metadata.calculation_outcome,
        Outcome::Success
    );
    assert!(response.calculation_result.messages.is_empty());
    let dossier = response
        .calculation_result
        .end_situation
        .situation
        .dossier
        .as_ref()
        .unwrap();
    assert!((dossier.policies[0].salary - dec("55000")).abs() < dec("0.01"));
}

#[test]
fn deep_negative_indexation_clamps_to_zero() {
    let response = run(vec![
        create_dossier(),
        add_policy(),
        mutation(
            "m-index",
            "apply_indexation",
            serde_json::json!({"percentage": -5.0}),
        ),
    ]);

    assert_eq!(
        response.calculation_metadata.calculation_outcome,
        Outcome::Success
    );
    let messages = &response.calculation_result.messages;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].code, "NEGATIVE_SALARY_CLAMPED");
    assert_eq!(messages[0].severity, Severity::Warning);

    let dossier = response
        .calculation_result
        .end_situation
        .situation
        .dossier
        .as_ref()
        .unwrap();
    assert_eq!(dossier.policies[0].salary, Decimal::ZERO);
}

#[test]
fn retirement_benefit_matches_accrual_formula() {
    let response = run(vec![
        create_dossier(),
        add_policy(),
        mutation(
            "m-retire",
            "calculate_retirement_benefit",
            serde_json::json!({"retirement_date": "2025-01-01"}),
        ),
    ]);

    assert_eq!(
        response.calculation_metadata.calculation_outcome,
        Outcome::Success
    );
    let dossier = response
        .calculation_result
        .end_situation
        .situation
        .dossier
        .as_ref()
        .unwrap();
    assert_eq!(
        serde_json::to_value(dossier).unwrap()["status"],
        "RETIRED"
    );
    assert_eq!(
        dossier.retirement_date,
        NaiveDate::from_ymd_opt(2025, 1, 1)
    );

    // 1990-01-01 .. 2025-01-01 is 12784 whole days; age at retirement 65.
    let years = Decimal::from(12_784) / dec("365.25");
    let annual = dec("50000") * years * dec("0.02");
    let attainable = dossier.policies[0].attainable_pension.unwrap();
    assert!((attainable - annual).abs() < dec("0.01"));

    // The single policy receives the whole annual pension.
    let sum: Decimal = dossier
        .policies
        .iter()
        .map(|p| p.attainable_pension.unwrap())
        .sum();
    assert!((sum - annual).abs() < dec("0.01"));
}

#[test]
fn retirement_without_dossier_fails_with_pointers_at_first_attempt() {
    let response = run(vec![mutation(
        "m-retire",
        "calculate_retirement_benefit",
        serde_json::json!({"retirement_date": "2025-01-01"}),
    )]);

    assert_eq!(
        response.calculation_metadata.calculation_outcome,
        Outcome::Failure
    );
    let result = &response.calculation_result;
    assert_eq!(result.messages.len(), 1);
    assert_eq!(result.messages[0].code, "DOSSIER_NOT_FOUND");
    assert_eq!(result.messages[0].severity, Severity::Critical);
    assert_eq!(result.mutations.len(), 1);
    assert_eq!(
        result.mutations[0].calculation_message_indexes,
        Some(vec![0])
    );

    let end = &result.end_situation;
    assert_eq!(end.mutation_id, "m-retire");
    assert_eq!(end.mutation_index, 0);
    assert!(end.situation.dossier.is_none());
}

#[test]
fn failure_outcome_iff_critical_message() {
    // Success with a warning only.
    let with_warning = run(vec![create_dossier(), add_policy(), add_policy()]);
    assert_eq!(
        with_warning.calculation_metadata.calculation_outcome,
        Outcome::Success
    );
    assert!(with_warning
        .calculation_result
        .messages
        .iter()
        .all(|m| m.severity != Severity::Critical));

    // Failure with a critical: mutations after the failure are absent.
    let with_critical = run(vec![
        create_dossier(),
        create_dossier(),
        add_policy(),
    ]);
    assert_eq!(
        with_critical.calculation_metadata.calculation_outcome,
        Outcome::Failure
    );
    let result = &with_critical.calculation_result;
    assert_eq!(result.mutations.len(), 2);
    let criticals: Vec<_> = result
        .messages
        .iter()
        .filter(|m| m.severity == Severity::Critical)
        .collect();
    assert_eq!(criticals.len(), 1);
    assert_eq!(criticals[0].code, "DOSSIER_ALREADY_EXISTS");

    // The first create succeeded, so the end pointers name it.
    assert_eq!(result.end_situation.mutation_id, "m-create");
    assert_eq!(result.end_situation.mutation_index, 0);
    assert!(result.end_situation.situation.dossier.is_some());
}

#[test]
fn zero_percentage_indexation_is_idempotent() {
    let indexed = run(vec![
        create_dossier(),
        add_policy(),
        mutation(
            "m-index",
            "apply_indexation",
            serde_json::json!({"percentage": 0}),
        ),
    ]);
    let baseline = run(vec![create_dossier(), add_policy()]);

    let salary = |response: &CalculationResponse| {
        response
            .calculation_result
            .end_situation
            .situation
            .dossier
            .as_ref()
            .unwrap()
            .policies[0]
            .salary
    };
    assert_eq!(salary(&indexed), salary(&baseline));
}

#[test]
fn mutation_payload_is_echoed_verbatim() {
    let mut custom = add_policy();
    custom["an_unknown_field"] = serde_json::json!({"nested": true});
    let response = run(vec![create_dossier(), custom.clone()]);

    let echoed = &response.calculation_result.mutations[1].mutation;
    assert_eq!(echoed, &custom);
}

#[test]
fn response_document_serializes_with_expected_keys() {
    let response = run(vec![create_dossier()]);
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["calculation_metadata"]["calculation_outcome"], "SUCCESS");
    assert_eq!(json["calculation_metadata"]["tenant_id"], "acme");
    assert!(json["calculation_metadata"]["calculation_duration_ms"].is_i64());
    assert!(json["calculation_result"]["mutations"][0]["calculation_message_indexes"].is_null());
    assert_eq!(
        json["calculation_result"]["initial_situation"]["situation"]["dossier"],
        serde_json::Value::Null
    );
    assert_eq!(
        json["calculation_result"]["end_situation"]["situation"]["dossier"]["status"],
        "ACTIVE"
    );
}
