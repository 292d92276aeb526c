//! Mutation evaluation engine -- accepts a calculation request, evaluates
//! its mutations in order against an initially empty situation, and
//! produces the full response document.
//!
//! Business conditions surface as `CalculationMessage`s with a severity
//! that governs control flow; `Err` is reserved for infrastructure
//! failures (numeric overflow) that the boundary maps to HTTP 500.
//! All monetary arithmetic uses `rust_decimal::Decimal` -- no `f64`
//! anywhere in the evaluation path.

pub mod accrual;
pub mod assemble;
pub mod context;
pub mod engine;
pub mod handlers;
pub mod numeric;

use chrono::Utc;
use pensum_core::{CalculationRequest, CalculationResponse};

pub use accrual::{AccrualRateProvider, FixedAccrualRate, SchemeRegistryClient};
pub use context::{CancelFlag, EvalContext};
pub use engine::{evaluate, Evaluation};

/// All errors the evaluation engine itself can fail with.
///
/// Domain conditions are never errors; they are messages in the result.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    /// Arithmetic left the representable decimal range.
    #[error("numeric overflow: {message}")]
    Overflow { message: String },
}

/// Evaluate a validated request end to end and assemble the response.
///
/// Records wall-clock start/completion around the engine run; the engine
/// itself is synchronous and CPU-bound.
pub fn evaluate_request(
    request: &CalculationRequest,
    ctx: &EvalContext<'_>,
) -> Result<CalculationResponse, EvalError> {
    let started_at = Utc::now();
    let evaluation = engine::evaluate(&request.mutations, ctx)?;
    let completed_at = Utc::now();

    tracing::info!(
        tenant_id = %request.tenant_id,
        outcome = ?evaluation.outcome,
        mutations_processed = evaluation.mutations.len(),
        messages = evaluation.messages.len(),
        "calculation evaluated"
    );

    Ok(assemble::response(
        &request.tenant_id,
        started_at,
        completed_at,
        evaluation,
    ))
}
