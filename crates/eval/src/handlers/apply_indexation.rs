//! `apply_indexation` -- adjust policy salaries by a percentage.
//!
//! Selection starts with all policies in insertion order and narrows by
//! the optional scheme filter and the optional strict
//! `employment_start_date < effective_before` filter. A selection emptied
//! by filters is a warning, not a failure.

use rust_decimal::Decimal;

use pensum_core::{code, CalculationMessage, MutationEnvelope, Properties, Situation};

use crate::numeric;
use crate::EvalError;

pub(crate) fn apply(
    envelope: &MutationEnvelope,
    situation: &mut Situation,
) -> Result<Vec<CalculationMessage>, EvalError> {
    let props = Properties::new(&envelope.properties);

    let dossier = match situation.dossier.as_mut() {
        Some(dossier) => dossier,
        None => {
            return Ok(vec![CalculationMessage::critical(
                code::DOSSIER_NOT_FOUND,
                "no dossier exists in the situation",
            )])
        }
    };

    if dossier.policies.is_empty() {
        return Ok(vec![CalculationMessage::critical(
            code::NO_POLICIES,
            "the dossier has no policies",
        )]);
    }

    let percentage = props.decimal("percentage");
    let scheme_filter = props.nullable_string("scheme_id");
    let before_filter = props.nullable_date("effective_before");
    let filtered = scheme_filter.is_some() || before_filter.is_some();

    let selected: Vec<usize> = dossier
        .policies
        .iter()
        .enumerate()
        .filter(|(_, policy)| {
            scheme_filter
                .as_deref()
                .is_none_or(|scheme| policy.scheme_id == scheme)
                && before_filter.is_none_or(|before| policy.employment_start_date < before)
        })
        .map(|(index, _)| index)
        .collect();

    if filtered && selected.is_empty() {
        return Ok(vec![CalculationMessage::warning(
            code::NO_MATCHING_POLICIES,
            "no policies match the given filters",
        )]);
    }

    let factor = numeric::checked_add(Decimal::ONE, percentage)?;
    let mut clamped = false;
    for index in selected {
        let policy = &mut dossier.policies[index];
        let new_salary = numeric::checked_mul(policy.salary, factor)?;
        if new_salary < Decimal::ZERO {
            policy.salary = Decimal::ZERO;
            clamped = true;
        } else {
            policy.salary = new_salary;
        }
    }

    let mut messages = Vec::new();
    if clamped {
        messages.push(CalculationMessage::warning(
            code::NEGATIVE_SALARY_CLAMPED,
            "indexation produced a negative salary, clamped to 0",
        ));
    }
    Ok(messages)
}
