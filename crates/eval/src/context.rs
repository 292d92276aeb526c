//! Evaluation context and cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::accrual::AccrualRateProvider;

/// Cooperative cancellation flag, checked by the engine at mutation
/// boundaries. Cloning shares the underlying flag.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        CancelFlag::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Ambient inputs for one evaluation run.
///
/// `today` anchors the birth-date-in-the-future check and is injectable so
/// tests stay deterministic.
pub struct EvalContext<'a> {
    pub today: NaiveDate,
    pub rates: &'a dyn AccrualRateProvider,
    pub cancel: Option<&'a CancelFlag>,
}

impl<'a> EvalContext<'a> {
    /// Context anchored at the current UTC calendar date.
    pub fn new(rates: &'a dyn AccrualRateProvider) -> Self {
        EvalContext {
            today: Utc::now().date_naive(),
            rates,
            cancel: None,
        }
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn with_cancel(mut self, cancel: &'a CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }
}
