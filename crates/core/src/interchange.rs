//! Wire-level request and response types.
//!
//! The request side pairs a typed view (`CalculationRequest`,
//! `MutationEnvelope`) with the raw JSON it was parsed from: the raw
//! mutation object is kept verbatim so the response can echo it unchanged,
//! unknown fields and field order included. Boundary validation collects
//! every offending field instead of stopping at the first.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::message::CalculationMessage;
use crate::situation::Situation;

/// Maximum length of a tenant id.
const TENANT_ID_MAX_LEN: usize = 25;

// ──────────────────────────────────────────────
// Request side
// ──────────────────────────────────────────────

/// A single field rejected during boundary validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldProblem {
    pub field: String,
    pub reason: String,
}

impl FieldProblem {
    fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        FieldProblem {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// The request document failed boundary validation.
#[derive(Debug, thiserror::Error)]
#[error("invalid calculation request")]
pub struct RequestError {
    pub problems: Vec<FieldProblem>,
}

/// One mutation from the request, as a typed view plus the verbatim JSON
/// object it was parsed from.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationEnvelope {
    /// The original mutation object, echoed unchanged into the response.
    pub raw: Value,
    pub mutation_id: String,
    pub definition_name: String,
    pub mutation_type: String,
    pub actual_at: NaiveDate,
    pub dossier_id: Option<String>,
    pub properties: Map<String, Value>,
}

/// A parsed and validated calculation request.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationRequest {
    pub tenant_id: String,
    pub mutations: Vec<MutationEnvelope>,
}

/// Lowercase alphanumeric groups separated by single underscores, at most
/// 25 characters.
pub fn is_valid_tenant_id(tenant_id: &str) -> bool {
    if tenant_id.is_empty() || tenant_id.len() > TENANT_ID_MAX_LEN {
        return false;
    }
    tenant_id.split('_').all(|group| {
        !group.is_empty()
            && group
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
    })
}

impl CalculationRequest {
    /// Parse and validate a request document.
    ///
    /// Collects every field-level problem; returns the typed request only
    /// when the document is fully valid.
    pub fn from_json(document: &Value) -> Result<CalculationRequest, RequestError> {
        let mut problems = Vec::new();

        let tenant_id = match document.get("tenant_id").and_then(Value::as_str) {
            Some(t) if is_valid_tenant_id(t) => t.to_string(),
            Some(_) => {
                problems.push(FieldProblem::new(
                    "tenant_id",
                    "must be at most 25 characters matching [a-z0-9]+(?:_[a-z0-9]+)*",
                ));
                String::new()
            }
            None => {
                problems.push(FieldProblem::new("tenant_id", "required string"));
                String::new()
            }
        };

        let raw_mutations = document
            .get("calculation_instructions")
            .and_then(|v| v.get("mutations"))
            .and_then(Value::as_array);

        let mut mutations = Vec::new();
        match raw_mutations {
            None => problems.push(FieldProblem::new(
                "calculation_instructions.mutations",
                "required array",
            )),
            Some(list) if list.is_empty() => problems.push(FieldProblem::new(
                "calculation_instructions.mutations",
                "must contain at least one mutation",
            )),
            Some(list) => {
                for (index, raw) in list.iter().enumerate() {
                    if let Some(envelope) = parse_mutation(index, raw, &mut problems) {
                        mutations.push(envelope);
                    }
                }
            }
        }

        if problems.is_empty() {
            Ok(CalculationRequest {
                tenant_id,
                mutations,
            })
        } else {
            Err(RequestError { problems })
        }
    }
}

fn parse_mutation(
    index: usize,
    raw: &Value,
    problems: &mut Vec<FieldProblem>,
) -> Option<MutationEnvelope> {
    let path = |field: &str| format!("calculation_instructions.mutations[{}].{}", index, field);

    let object = match raw.as_object() {
        Some(o) => o,
        None => {
            problems.push(FieldProblem::new(
                format!("calculation_instructions.mutations[{}]", index),
                "must be an object",
            ));
            return None;
        }
    };

    let before = problems.len();

    let mutation_id = match object.get("mutation_id").and_then(Value::as_str) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => {
            problems.push(FieldProblem::new(
                path("mutation_id"),
                "required non-empty string",
            ));
            String::new()
        }
    };

    let definition_name = match object.get("mutation_definition_name").and_then(Value::as_str) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => {
            problems.push(FieldProblem::new(
                path("mutation_definition_name"),
                "required non-empty string",
            ));
            String::new()
        }
    };

    let mutation_type = match object.get("mutation_type").and_then(Value::as_str) {
        Some(kind) => kind.to_string(),
        None => {
            problems.push(FieldProblem::new(path("mutation_type"), "required string"));
            String::new()
        }
    };

    let actual_at = match object
        .get("actual_at")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<NaiveDate>().ok())
    {
        Some(date) => date,
        None => {
            problems.push(FieldProblem::new(
                path("actual_at"),
                "required ISO calendar date (YYYY-MM-DD)",
            ));
            NaiveDate::default()
        }
    };

    let dossier_id = match object.get("dossier_id") {
        None | Some(Value::Null) => None,
        Some(Value::String(id)) => Some(id.clone()),
        Some(_) => {
            problems.push(FieldProblem::new(path("dossier_id"), "must be a string"));
            None
        }
    };

    let properties = match object.get("mutation_properties") {
        Some(Value::Object(map)) => map.clone(),
        _ => {
            problems.push(FieldProblem::new(
                path("mutation_properties"),
                "required object",
            ));
            Map::new()
        }
    };

    if problems.len() > before {
        return None;
    }

    Some(MutationEnvelope {
        raw: raw.clone(),
        mutation_id,
        definition_name,
        mutation_type,
        actual_at,
        dossier_id,
        properties,
    })
}

// ──────────────────────────────────────────────
// Response side
// ──────────────────────────────────────────────

/// Overall outcome of an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationMetadata {
    pub calculation_id: Uuid,
    pub tenant_id: String,
    pub calculation_started_at: DateTime<Utc>,
    pub calculation_completed_at: DateTime<Utc>,
    pub calculation_duration_ms: i64,
    pub calculation_outcome: Outcome,
}

/// One entry per attempted mutation: the original payload verbatim and the
/// indexes of the messages it contributed (null when it produced none).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationResultEntry {
    pub mutation: Value,
    pub calculation_message_indexes: Option<Vec<usize>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialSituation {
    pub actual_at: NaiveDate,
    pub situation: Situation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndSituation {
    pub mutation_id: String,
    pub mutation_index: usize,
    pub actual_at: NaiveDate,
    pub situation: Situation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub messages: Vec<CalculationMessage>,
    pub mutations: Vec<MutationResultEntry>,
    pub initial_situation: InitialSituation,
    pub end_situation: EndSituation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResponse {
    pub calculation_metadata: CalculationMetadata,
    pub calculation_result: CalculationResult,
}
