//! The evaluation loop.
//!
//! Mutations are evaluated strictly in list order against a single mutable
//! situation. Each mutation's messages occupy a contiguous index range in
//! the flat message list; the first CRITICAL message halts the loop and
//! marks the calculation FAILURE. Handlers either commit their whole
//! change or leave the situation untouched, so the in-memory situation is
//! always the state as of the last successful mutation.

use chrono::NaiveDate;

use pensum_core::properties::invalid_date;
use pensum_core::{
    CalculationMessage, MutationEnvelope, MutationResultEntry, Outcome, Severity, Situation,
};

use crate::context::EvalContext;
use crate::handlers;
use crate::EvalError;

/// Pointers to the last mutation that completed without a CRITICAL
/// message. When nothing succeeded they fall back to the first attempted
/// mutation's id, index 0, and its `actual_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct LastApplied {
    pub mutation_id: String,
    pub mutation_index: usize,
    pub actual_at: NaiveDate,
}

/// Everything the engine produced for one request.
#[derive(Debug)]
pub struct Evaluation {
    pub outcome: Outcome,
    pub messages: Vec<CalculationMessage>,
    /// One entry per attempted mutation, the failing one included.
    pub mutations: Vec<MutationResultEntry>,
    pub initial_actual_at: NaiveDate,
    pub last_applied: LastApplied,
    pub situation: Situation,
}

/// Evaluate mutations in order against an initially empty situation.
pub fn evaluate(
    mutations: &[MutationEnvelope],
    ctx: &EvalContext<'_>,
) -> Result<Evaluation, EvalError> {
    let mut situation = Situation::default();
    let mut messages: Vec<CalculationMessage> = Vec::new();
    let mut records: Vec<MutationResultEntry> = Vec::new();
    let mut outcome = Outcome::Success;
    let mut last_ok: Option<LastApplied> = None;

    let initial_actual_at = mutations
        .first()
        .map(|m| m.actual_at)
        .unwrap_or_else(invalid_date);

    for (index, envelope) in mutations.iter().enumerate() {
        if let Some(cancel) = ctx.cancel {
            if cancel.is_cancelled() {
                tracing::debug!(mutation_index = index, "evaluation cancelled");
                outcome = Outcome::Failure;
                break;
            }
        }

        let first_message = messages.len();
        let produced = handlers::dispatch(envelope, &mut situation, ctx)?;
        messages.extend(produced);

        tracing::debug!(
            mutation_id = %envelope.mutation_id,
            definition = %envelope.definition_name,
            messages = messages.len() - first_message,
            "mutation evaluated"
        );

        let indexes: Vec<usize> = (first_message..messages.len()).collect();
        records.push(MutationResultEntry {
            mutation: envelope.raw.clone(),
            calculation_message_indexes: if indexes.is_empty() {
                None
            } else {
                Some(indexes)
            },
        });

        let critical = messages[first_message..]
            .iter()
            .any(|m| m.severity == Severity::Critical);
        if critical {
            outcome = Outcome::Failure;
            break;
        }

        last_ok = Some(LastApplied {
            mutation_id: envelope.mutation_id.clone(),
            mutation_index: index,
            actual_at: envelope.actual_at,
        });
    }

    let last_applied = last_ok.unwrap_or_else(|| LastApplied {
        mutation_id: mutations
            .first()
            .map(|m| m.mutation_id.clone())
            .unwrap_or_default(),
        mutation_index: 0,
        actual_at: initial_actual_at,
    });

    Ok(Evaluation {
        outcome,
        messages,
        mutations: records,
        initial_actual_at,
        last_applied,
        situation,
    })
}
