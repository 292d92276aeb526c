//! Situation, dossier, person, and policy value types.
//!
//! The situation exclusively owns its dossier; the dossier exclusively owns
//! its person and policy lists. All lists keep insertion order, and the
//! serialized shape of these types is the canonical external shape
//! (snake_case keys, SCREAMING_SNAKE_CASE enum variants).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The in-memory state transformed by mutations. Holds at most one dossier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Situation {
    pub dossier: Option<Dossier>,
}

/// Lifecycle status of a dossier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DossierStatus {
    Active,
    Retired,
}

/// The pension case: persons and policies under a single dossier id.
///
/// Invariants: exactly one `PARTICIPANT` person; `retirement_date` is set
/// iff `status` is `RETIRED`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dossier {
    pub dossier_id: String,
    pub status: DossierStatus,
    pub retirement_date: Option<NaiveDate>,
    pub persons: Vec<Person>,
    pub policies: Vec<Policy>,
}

impl Dossier {
    /// A fresh active dossier holding a single participant and no policies.
    pub fn new(dossier_id: impl Into<String>, participant: Person) -> Self {
        Dossier {
            dossier_id: dossier_id.into(),
            status: DossierStatus::Active,
            retirement_date: None,
            persons: vec![participant],
            policies: Vec::new(),
        }
    }

    /// The person with role `PARTICIPANT`, if any.
    pub fn participant(&self) -> Option<&Person> {
        self.persons
            .iter()
            .find(|p| p.role == PersonRole::Participant)
    }

    /// The id the next inserted policy receives: `"{dossier_id}-{n}"` with
    /// n the 1-based position in insertion order.
    pub fn next_policy_id(&self) -> String {
        format!("{}-{}", self.dossier_id, self.policies.len() + 1)
    }
}

/// Role of a person within a dossier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PersonRole {
    Participant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub person_id: String,
    pub role: PersonRole,
    pub name: String,
    pub birth_date: NaiveDate,
}

/// A single employment record with salary, part-time factor, and accrual
/// outcome. `salary` is writable by indexation and clamped at 0;
/// `attainable_pension` is written by the retirement calculation;
/// `projections` is reserved and never written by the handlers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub policy_id: String,
    pub scheme_id: String,
    pub employment_start_date: NaiveDate,
    pub salary: Decimal,
    pub part_time_factor: Decimal,
    pub attainable_pension: Option<Decimal>,
    pub projections: Option<serde_json::Value>,
}
