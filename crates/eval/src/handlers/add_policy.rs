//! `add_policy` -- append an employment policy to the dossier.

use rust_decimal::Decimal;

use pensum_core::{code, CalculationMessage, MutationEnvelope, Policy, Properties, Situation};

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

    let salary = props.decimal("salary");
    if salary < Decimal::ZERO {
        return Ok(vec![CalculationMessage::critical(
            code::INVALID_SALARY,
            format!("salary {} must not be negative", salary),
        )]);
    }

    let part_time_factor = props.decimal("part_time_factor");
    if part_time_factor < Decimal::ZERO || part_time_factor > Decimal::ONE {
        return Ok(vec![CalculationMessage::critical(
            code::INVALID_PART_TIME_FACTOR,
            format!("part-time factor {} must lie in [0, 1]", part_time_factor),
        )]);
    }

    let scheme_id = props.string("scheme_id");
    let employment_start_date = props.date("employment_start_date");

    let mut messages = Vec::new();
    let duplicate = dossier
        .policies
        .iter()
        .any(|p| p.scheme_id == scheme_id && p.employment_start_date == employment_start_date);
    if duplicate {
        messages.push(CalculationMessage::warning(
            code::DUPLICATE_POLICY,
            format!(
                "a policy for scheme '{}' starting {} already exists",
                scheme_id, employment_start_date
            ),
        ));
    }

    dossier.policies.push(Policy {
        policy_id: dossier.next_policy_id(),
        scheme_id,
        employment_start_date,
        salary,
        part_time_factor,
        attainable_pension: None,
        projections: None,
    });

    Ok(messages)
}
