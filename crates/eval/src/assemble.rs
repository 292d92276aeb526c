//! Assembles the engine's output into the response document.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use pensum_core::{
    CalculationMetadata, CalculationResponse, CalculationResult, EndSituation, InitialSituation,
    Situation,
};

use crate::engine::Evaluation;

/// Build the full response document around an evaluation.
///
/// The initial situation is always empty; the end situation carries the
/// last-successful pointers and the situation as the engine left it.
pub fn response(
    tenant_id: &str,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    evaluation: Evaluation,
) -> CalculationResponse {
    let metadata = CalculationMetadata {
        calculation_id: Uuid::new_v4(),
        tenant_id: tenant_id.to_string(),
        calculation_started_at: started_at,
        calculation_completed_at: completed_at,
        calculation_duration_ms: (completed_at - started_at).num_milliseconds(),
        calculation_outcome: evaluation.outcome,
    };

    let result = CalculationResult {
        messages: evaluation.messages,
        mutations: evaluation.mutations,
        initial_situation: InitialSituation {
            actual_at: evaluation.initial_actual_at,
            situation: Situation::default(),
        },
        end_situation: EndSituation {
            mutation_id: evaluation.last_applied.mutation_id,
            mutation_index: evaluation.last_applied.mutation_index,
            actual_at: evaluation.last_applied.actual_at,
            situation: evaluation.situation,
        },
    };

    CalculationResponse {
        calculation_metadata: metadata,
        calculation_result: result,
    }
}
