//! Mutation handlers, one module per mutation kind.
//!
//! A handler validates its preconditions in order (first failure wins,
//! reported as a single CRITICAL message), emits warnings for non-fatal
//! observations, and mutates the situation in place only when it commits
//! its whole change. A handler that returns a CRITICAL message has not
//! touched the situation.

mod add_policy;
mod apply_indexation;
mod create_dossier;
mod retirement;

use pensum_core::{code, CalculationMessage, MutationEnvelope, Situation};

use crate::context::EvalContext;
use crate::EvalError;

/// Known mutation definition names.
pub const CREATE_DOSSIER: &str = "create_dossier";
pub const ADD_POLICY: &str = "add_policy";
pub const APPLY_INDEXATION: &str = "apply_indexation";
pub const CALCULATE_RETIREMENT_BENEFIT: &str = "calculate_retirement_benefit";

/// Dispatch a mutation to its handler by definition name.
///
/// An unknown name is a CRITICAL `UNKNOWN_MUTATION`; the engine treats it
/// like any other critical outcome.
pub(crate) fn dispatch(
    envelope: &MutationEnvelope,
    situation: &mut Situation,
    ctx: &EvalContext<'_>,
) -> Result<Vec<CalculationMessage>, EvalError> {
    match envelope.definition_name.as_str() {
        CREATE_DOSSIER => create_dossier::apply(envelope, situation, ctx),
        ADD_POLICY => add_policy::apply(envelope, situation),
        APPLY_INDEXATION => apply_indexation::apply(envelope, situation),
        CALCULATE_RETIREMENT_BENEFIT => retirement::apply(envelope, situation, ctx),
        other => Ok(vec![CalculationMessage::critical(
            code::UNKNOWN_MUTATION,
            format!("unknown mutation definition '{}'", other),
        )]),
    }
}
