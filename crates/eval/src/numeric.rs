//! Service-year and age arithmetic on `rust_decimal::Decimal`.
//!
//! Two distinct formulas that must not be conflated: service years divide
//! whole days by 365.25 (calendar-accurate average including leap years);
//! age is the calendar-year difference minus one when the reference date
//! falls before the birthday in that year.

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::EvalError;

/// Average days per calendar year, leap years included.
fn days_per_year() -> Decimal {
    Decimal::new(36_525, 2)
}

/// Service years between employment start and retirement, clamped at zero
/// when the retirement date precedes the start.
pub fn service_years(retirement_date: NaiveDate, employment_start_date: NaiveDate) -> Decimal {
    let days = (retirement_date - employment_start_date).num_days();
    if days <= 0 {
        return Decimal::ZERO;
    }
    Decimal::from(days) / days_per_year()
}

/// Calendar age at `on`: year difference, minus one when `on` falls before
/// the birthday in that year.
pub fn age_at(birth_date: NaiveDate, on: NaiveDate) -> i32 {
    let mut age = on.year() - birth_date.year();
    if (on.month(), on.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }
    age
}

/// Checked multiplication; overflow is an infrastructure failure.
pub fn checked_mul(left: Decimal, right: Decimal) -> Result<Decimal, EvalError> {
    left.checked_mul(right).ok_or_else(|| EvalError::Overflow {
        message: format!("{} * {}", left, right),
    })
}

/// Checked addition; overflow is an infrastructure failure.
pub fn checked_add(left: Decimal, right: Decimal) -> Result<Decimal, EvalError> {
    left.checked_add(right).ok_or_else(|| EvalError::Overflow {
        message: format!("{} + {}", left, right),
    })
}

/// Checked division; a zero divisor or overflow is an infrastructure
/// failure.
pub fn checked_div(left: Decimal, right: Decimal) -> Result<Decimal, EvalError> {
    left.checked_div(right).ok_or_else(|| EvalError::Overflow {
        message: format!("{} / {}", left, right),
    })
}

/// Round to cents with banker's rounding, for display in message texts.
pub fn to_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}
