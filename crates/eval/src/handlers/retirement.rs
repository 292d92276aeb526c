//! `calculate_retirement_benefit` -- eligibility check and benefit
//! distribution over the dossier's policies.
//!
//! Service years divide whole days by 365.25 and clamp at zero; age uses
//! the calendar-year difference with birthday adjustment. The attainable
//! pension per policy is `avg_salary * years_i * rate(scheme_i)`, with the
//! weighted-average salary over effective (part-time adjusted) salaries.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use pensum_core::{
    code, CalculationMessage, DossierStatus, MutationEnvelope, Properties, Situation,
};

use crate::context::EvalContext;
use crate::numeric;
use crate::EvalError;

/// Minimum age for retirement eligibility.
const ELIGIBLE_AGE: i32 = 65;

/// Alternative eligibility threshold in total service years.
const ELIGIBLE_SERVICE_YEARS: i64 = 40;

pub(crate) fn apply(
    envelope: &MutationEnvelope,
    situation: &mut Situation,
    ctx: &EvalContext<'_>,
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

    let birth_date = match dossier.participant() {
        Some(participant) => participant.birth_date,
        None => {
            return Ok(vec![CalculationMessage::critical(
                code::NO_PARTICIPANT,
                "the dossier has no participant",
            )])
        }
    };

    let retirement_date = props.date("retirement_date");

    let mut messages = Vec::new();
    let mut years = Vec::with_capacity(dossier.policies.len());
    let mut total_years = Decimal::ZERO;
    for policy in &dossier.policies {
        if retirement_date < policy.employment_start_date {
            messages.push(CalculationMessage::warning(
                code::RETIREMENT_BEFORE_EMPLOYMENT,
                format!(
                    "retirement date {} precedes the employment start of policy '{}'",
                    retirement_date, policy.policy_id
                ),
            ));
        }
        let policy_years = numeric::service_years(retirement_date, policy.employment_start_date);
        total_years = numeric::checked_add(total_years, policy_years)?;
        years.push(policy_years);
    }

    let age = numeric::age_at(birth_date, retirement_date);
    let eligible = age >= ELIGIBLE_AGE || total_years >= Decimal::from(ELIGIBLE_SERVICE_YEARS);
    if !eligible {
        messages.push(CalculationMessage::critical(
            code::NOT_ELIGIBLE,
            format!(
                "participant is not eligible for retirement: age {} with {} service years",
                age,
                numeric::to_cents(total_years)
            ),
        ));
        return Ok(messages);
    }

    if total_years == Decimal::ZERO {
        for policy in &mut dossier.policies {
            policy.attainable_pension = Some(Decimal::ZERO);
        }
    } else {
        let mut weighted_salary_sum = Decimal::ZERO;
        for (policy, policy_years) in dossier.policies.iter().zip(&years) {
            let effective_salary = numeric::checked_mul(policy.salary, policy.part_time_factor)?;
            let weighted = numeric::checked_mul(effective_salary, *policy_years)?;
            weighted_salary_sum = numeric::checked_add(weighted_salary_sum, weighted)?;
        }
        let avg_salary = numeric::checked_div(weighted_salary_sum, total_years)?;

        // One registry lookup per distinct scheme.
        let mut rates: BTreeMap<&str, Decimal> = BTreeMap::new();
        for policy in &dossier.policies {
            rates
                .entry(policy.scheme_id.as_str())
                .or_insert_with(|| ctx.rates.accrual_rate(&policy.scheme_id));
        }

        let mut accrued = Vec::with_capacity(dossier.policies.len());
        for (policy, policy_years) in dossier.policies.iter().zip(&years) {
            let rate = rates[policy.scheme_id.as_str()];
            let base = numeric::checked_mul(avg_salary, *policy_years)?;
            accrued.push(numeric::checked_mul(base, rate)?);
        }
        for (policy, pension) in dossier.policies.iter_mut().zip(accrued) {
            policy.attainable_pension = Some(pension);
        }
    }

    dossier.status = DossierStatus::Retired;
    dossier.retirement_date = Some(retirement_date);

    Ok(messages)
}
