//! Domain model and wire types for the pensum calculation service.
//!
//! A *situation* is the in-memory state transformed by an ordered list of
//! mutations: it holds at most one dossier, which owns its persons and
//! policies. Handlers report domain conditions as `CalculationMessage`s;
//! severity governs control flow (CRITICAL halts, WARNING continues).
//!
//! This crate is pure data: no I/O, no clock, no engine. The evaluation
//! loop lives in `pensum-eval`.

pub mod interchange;
pub mod message;
pub mod properties;
pub mod situation;

pub use interchange::{
    CalculationMetadata, CalculationRequest, CalculationResponse, CalculationResult, EndSituation,
    FieldProblem, InitialSituation, MutationEnvelope, MutationResultEntry, Outcome, RequestError,
};
pub use message::{code, CalculationMessage, Severity};
pub use properties::Properties;
pub use situation::{Dossier, DossierStatus, Person, PersonRole, Policy, Situation};
