//! Typed accessors over the loosely-typed mutation property bag.
//!
//! Mutation properties arrive as a JSON object. The accessors never fail:
//! absence and unparseable input are signalled by sentinel values (empty
//! string, the sentinel date, decimal zero) which downstream precondition
//! checks interpret.

use chrono::NaiveDate;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

/// The sentinel returned by [`Properties::date`] for absent or unparseable
/// dates.
pub fn invalid_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1, 1, 1).expect("0001-01-01 is a valid date")
}

/// Borrowing view over a mutation's property object.
#[derive(Debug, Clone, Copy)]
pub struct Properties<'a> {
    bag: &'a Map<String, Value>,
}

impl<'a> Properties<'a> {
    pub fn new(bag: &'a Map<String, Value>) -> Self {
        Properties { bag }
    }

    /// The value coerced to a string; absent or null becomes `""`.
    pub fn string(&self, key: &str) -> String {
        match self.bag.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        }
    }

    /// `None` when the key is absent or the coerced value is empty.
    pub fn nullable_string(&self, key: &str) -> Option<String> {
        let value = self.string(key);
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    /// An ISO calendar date; absent or unparseable input yields the
    /// sentinel [`invalid_date`].
    pub fn date(&self, key: &str) -> NaiveDate {
        self.nullable_date(key).unwrap_or_else(invalid_date)
    }

    /// `None` when the key is absent or the value does not parse as an ISO
    /// calendar date.
    pub fn nullable_date(&self, key: &str) -> Option<NaiveDate> {
        match self.bag.get(key) {
            Some(Value::String(s)) => s.trim().parse::<NaiveDate>().ok(),
            _ => None,
        }
    }

    /// A decimal number from a JSON integer, float, or numeric string;
    /// absent or invalid input yields zero.
    pub fn decimal(&self, key: &str) -> Decimal {
        match self.bag.get(key) {
            Some(Value::Number(n)) => {
                if let Some(i) = n.as_i64() {
                    Decimal::from(i)
                } else if let Some(u) = n.as_u64() {
                    Decimal::from(u)
                } else {
                    n.as_f64()
                        .and_then(Decimal::from_f64)
                        .unwrap_or(Decimal::ZERO)
                }
            }
            Some(Value::String(s)) => s.trim().parse::<Decimal>().unwrap_or(Decimal::ZERO),
            _ => Decimal::ZERO,
        }
    }
}
