//! Application state shared across request handlers.

use std::sync::Arc;

use pensum_eval::AccrualRateProvider;

pub(crate) struct AppState {
    /// Accrual rate source for retirement calculations.
    pub(crate) rates: Arc<dyn AccrualRateProvider>,
}
