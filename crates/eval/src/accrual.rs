//! Accrual rate providers.
//!
//! The retirement calculation multiplies by a per-scheme accrual rate.
//! Deployments without a scheme registry use the fixed default rate; when
//! a registry is configured, lookups run against `GET /schemes/{scheme_id}`
//! with a hard 2-second budget and fall back to the default rate on any
//! failure.

use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;

/// Timeout for a single registry lookup.
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(2);

/// The default accrual rate, 0.02, used when no registry is configured and
/// as the fallback for failed lookups.
pub fn default_rate() -> Decimal {
    Decimal::new(2, 2)
}

/// Supplies the accrual rate for a pension scheme.
///
/// Implementations must not fail: when a rate cannot be determined they
/// fall back to a configured default.
pub trait AccrualRateProvider: Send + Sync {
    fn accrual_rate(&self, scheme_id: &str) -> Decimal;
}

// ──────────────────────────────────────────────
// FixedAccrualRate
// ──────────────────────────────────────────────

/// A provider that returns the same rate for every scheme.
///
/// `Default` yields the standard rate 0.02. Also the test double.
#[derive(Debug, Clone)]
pub struct FixedAccrualRate {
    rate: Decimal,
}

impl FixedAccrualRate {
    pub fn new(rate: Decimal) -> Self {
        FixedAccrualRate { rate }
    }
}

impl Default for FixedAccrualRate {
    fn default() -> Self {
        FixedAccrualRate::new(default_rate())
    }
}

impl AccrualRateProvider for FixedAccrualRate {
    fn accrual_rate(&self, _scheme_id: &str) -> Decimal {
        self.rate
    }
}

// ──────────────────────────────────────────────
// SchemeRegistryClient
// ──────────────────────────────────────────────

/// The registry document for one scheme. Other fields are ignored.
#[derive(Debug, Deserialize)]
struct SchemeDocument {
    accrual_rate: Decimal,
}

/// Fetches per-scheme rates from an external scheme registry.
///
/// `GET {base_url}/schemes/{scheme_id}` with a global 2-second timeout.
/// Transport errors, non-success statuses, and undecodable bodies all log
/// a warning and fall back to [`default_rate`].
pub struct SchemeRegistryClient {
    base_url: String,
    agent: ureq::Agent,
}

impl SchemeRegistryClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(LOOKUP_TIMEOUT))
            .build()
            .into();
        SchemeRegistryClient {
            base_url: base_url.into(),
            agent,
        }
    }

    fn lookup(&self, scheme_id: &str) -> Result<Decimal, String> {
        let url = format!("{}/schemes/{}", self.base_url.trim_end_matches('/'), scheme_id);
        let response = self.agent.get(&url).call().map_err(|e| e.to_string())?;
        let document: SchemeDocument = response
            .into_body()
            .read_json()
            .map_err(|e| format!("failed to parse registry response: {}", e))?;
        Ok(document.accrual_rate)
    }
}

impl AccrualRateProvider for SchemeRegistryClient {
    fn accrual_rate(&self, scheme_id: &str) -> Decimal {
        match self.lookup(scheme_id) {
            Ok(rate) => rate,
            Err(reason) => {
                tracing::warn!(
                    scheme_id,
                    %reason,
                    "scheme registry lookup failed, falling back to default rate"
                );
                default_rate()
            }
        }
    }
}
