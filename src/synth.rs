//! Synthetic payment/ledger data generation for demos and test fixtures
//!
//! Produces a payments dataset and a ledger dataset derived from it, with a
//! configurable share of seeded discrepancies: perturbed ledger amounts and
//! blanked ledger postings. All randomness comes from one explicit seedable
//! generator instance, so a given config always yields the same datasets.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::traits::RecordSource;
use crate::types::{LedgerRecord, PaymentRecord, ReconError, ReconResult};

/// Parameters for synthetic dataset generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthConfig {
    /// Number of merchant codes (M001, M002, ...)
    pub num_merchants: u32,
    /// Number of payment records to generate
    pub num_transactions: usize,
    /// Earliest payment date
    pub start_date: NaiveDate,
    /// Latest payment date
    pub end_date: NaiveDate,
    /// Share of transactions seeded with a discrepancy, in [0, 1]
    pub discrepancy_rate: f64,
    /// RNG seed; the same seed reproduces the same datasets
    pub seed: u64,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            num_merchants: 5,
            num_transactions: 200,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date"),
            end_date: NaiveDate::from_ymd_opt(2025, 8, 15).expect("valid date"),
            discrepancy_rate: 0.1,
            seed: 0,
        }
    }
}

// Payment ids are drawn from P1000..=P9999 and amounts from 50.00..=500.00,
// generated in integer cents so every amount is an exact decimal.
const PAYMENT_ID_RANGE: std::ops::RangeInclusive<u32> = 1000..=9999;
const AMOUNT_CENTS_RANGE: std::ops::RangeInclusive<i64> = 5_000..=50_000;

struct RawPayment {
    payment_id: String,
    merchant: String,
    date: NaiveDate,
    cents: i64,
}

/// Record source producing one synthetic payments/ledger dataset pair.
///
/// The ledger is derived from the payments: `discrepancy_rate` of the rows
/// get their posted amount perturbed by a uniform 0.8-1.2 factor, and half
/// that many get the posted amount blanked entirely. Both record sets are
/// generated once on first fetch and then served from the same snapshot, so
/// `payments()` and `ledger()` are always mutually consistent.
pub struct SyntheticSource {
    config: SynthConfig,
    rng: StdRng,
    generated: Option<(Vec<PaymentRecord>, Vec<LedgerRecord>)>,
}

impl SyntheticSource {
    /// Create a source for the given config
    pub fn new(config: SynthConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            config,
            rng,
            generated: None,
        }
    }

    /// Create a source with default parameters and the given seed
    pub fn with_seed(seed: u64) -> Self {
        Self::new(SynthConfig {
            seed,
            ..SynthConfig::default()
        })
    }

    fn validate_config(&self) -> ReconResult<()> {
        let config = &self.config;
        if config.num_merchants == 0 {
            return Err(ReconError::Source(
                "num_merchants must be at least 1".to_string(),
            ));
        }
        if config.end_date < config.start_date {
            return Err(ReconError::Source(format!(
                "end_date {} precedes start_date {}",
                config.end_date, config.start_date
            )));
        }
        if !(0.0..=1.0).contains(&config.discrepancy_rate) {
            return Err(ReconError::Source(format!(
                "discrepancy_rate {} is outside [0, 1]",
                config.discrepancy_rate
            )));
        }

        // Distinct (PaymentID, Merchant) pairs available
        let id_space = (PAYMENT_ID_RANGE.end() - PAYMENT_ID_RANGE.start() + 1) as usize;
        let keyspace = id_space * config.num_merchants as usize;
        if config.num_transactions > keyspace {
            return Err(ReconError::Source(format!(
                "num_transactions {} exceeds the {} distinct keys available",
                config.num_transactions, keyspace
            )));
        }
        Ok(())
    }

    fn generate(&mut self) -> ReconResult<()> {
        if self.generated.is_some() {
            return Ok(());
        }
        self.validate_config()?;

        let raw = self.generate_raw_payments();
        let ledger = self.derive_ledger(&raw);
        let payments = raw
            .into_iter()
            .map(|r| PaymentRecord::new(r.payment_id, r.merchant, r.date, cents_to_amount(r.cents)))
            .collect::<Vec<_>>();

        debug!(
            payments = payments.len(),
            ledger = ledger.len(),
            seed = self.config.seed,
            "synthetic datasets generated"
        );
        self.generated = Some((payments, ledger));
        Ok(())
    }

    fn generate_raw_payments(&mut self) -> Vec<RawPayment> {
        let merchants: Vec<String> = (1..=self.config.num_merchants)
            .map(|i| format!("M{i:03}"))
            .collect();
        let span_days = (self.config.end_date - self.config.start_date).num_days();

        let mut seen = std::collections::HashSet::new();
        let mut raw = Vec::with_capacity(self.config.num_transactions);
        while raw.len() < self.config.num_transactions {
            let payment_id = format!("P{}", self.rng.gen_range(PAYMENT_ID_RANGE));
            let merchant = merchants[self.rng.gen_range(0..merchants.len())].clone();
            // Random id draws collide; re-draw so composite keys stay unique
            if !seen.insert((payment_id.clone(), merchant.clone())) {
                continue;
            }
            let date = self.config.start_date
                + chrono::Duration::days(self.rng.gen_range(0..=span_days));
            let cents = self.rng.gen_range(AMOUNT_CENTS_RANGE);
            raw.push(RawPayment {
                payment_id,
                merchant,
                date,
                cents,
            });
        }
        raw
    }

    fn derive_ledger(&mut self, payments: &[RawPayment]) -> Vec<LedgerRecord> {
        let num_discrepancies =
            (payments.len() as f64 * self.config.discrepancy_rate).floor() as usize;

        let mut ledger_cents: Vec<Option<i64>> = payments.iter().map(|p| Some(p.cents)).collect();

        for idx in sample_indices(&mut self.rng, payments.len(), num_discrepancies) {
            let original = payments[idx].cents;
            let mut perturbed = original;
            // Re-draw until the perturbation actually changes the amount
            while perturbed == original {
                let factor: f64 = self.rng.gen_range(0.8..1.2);
                perturbed = (original as f64 * factor).round() as i64;
            }
            ledger_cents[idx] = Some(perturbed);
        }

        for idx in sample_indices(&mut self.rng, payments.len(), num_discrepancies / 2) {
            ledger_cents[idx] = None;
        }

        payments
            .iter()
            .zip(ledger_cents)
            .map(|(p, cents)| {
                LedgerRecord::new(
                    p.payment_id.clone(),
                    p.merchant.clone(),
                    p.date,
                    cents.map(cents_to_amount),
                )
            })
            .collect()
    }
}

#[async_trait]
impl RecordSource for SyntheticSource {
    async fn payments(&mut self) -> ReconResult<Vec<PaymentRecord>> {
        self.generate()?;
        Ok(self.generated.as_ref().map(|(p, _)| p.clone()).unwrap_or_default())
    }

    async fn ledger(&mut self) -> ReconResult<Vec<LedgerRecord>> {
        self.generate()?;
        Ok(self.generated.as_ref().map(|(_, l)| l.clone()).unwrap_or_default())
    }
}

/// Exact decimal from integer cents (scale 2)
fn cents_to_amount(cents: i64) -> BigDecimal {
    BigDecimal::from(cents) / BigDecimal::from(100)
}

/// Sample `count` distinct indices from `0..len`
fn sample_indices(rng: &mut StdRng, len: usize, count: usize) -> Vec<usize> {
    rand::seq::index::sample(rng, len, count.min(len)).into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn datasets(config: SynthConfig) -> (Vec<PaymentRecord>, Vec<LedgerRecord>) {
        let mut source = SyntheticSource::new(config);
        let payments = source.payments().await.unwrap();
        let ledger = source.ledger().await.unwrap();
        (payments, ledger)
    }

    async fn seeded(seed: u64) -> (Vec<PaymentRecord>, Vec<LedgerRecord>) {
        datasets(SynthConfig {
            seed,
            ..SynthConfig::default()
        })
        .await
    }

    #[tokio::test]
    async fn test_same_seed_reproduces_datasets() {
        let (p1, l1) = seeded(42).await;
        let (p2, l2) = seeded(42).await;
        assert_eq!(p1, p2);
        assert_eq!(l1, l2);
    }

    #[tokio::test]
    async fn test_different_seeds_differ() {
        let (p1, _) = seeded(1).await;
        let (p2, _) = seeded(2).await;
        assert_ne!(p1, p2);
    }

    #[tokio::test]
    async fn test_generates_requested_counts_with_unique_keys() {
        let (payments, ledger) = seeded(3).await;

        assert_eq!(payments.len(), 200);
        assert_eq!(ledger.len(), 200);

        let keys: std::collections::HashSet<_> = payments.iter().map(|p| p.key()).collect();
        assert_eq!(keys.len(), payments.len());
    }

    #[tokio::test]
    async fn test_ledger_mirrors_payment_keys_and_dates() {
        let (payments, ledger) = seeded(4).await;

        for (p, l) in payments.iter().zip(&ledger) {
            assert_eq!(p.key(), l.key());
            assert_eq!(p.payment_date, l.ledger_date);
        }
    }

    #[tokio::test]
    async fn test_discrepancy_seeding_counts() {
        let config = SynthConfig {
            num_transactions: 100,
            discrepancy_rate: 0.2,
            seed: 5,
            ..SynthConfig::default()
        };
        let (payments, ledger) = datasets(config).await;

        // 20 seeded discrepancies, 10 of which are blanked postings. The two
        // index draws may overlap, so mismatch counts are bounded, not exact.
        let blanked = ledger.iter().filter(|l| l.amount.is_none()).count();
        assert_eq!(blanked, 10);

        let mismatched = payments
            .iter()
            .zip(&ledger)
            .filter(|(p, l)| matches!(&l.amount, Some(a) if a != &p.amount))
            .count();
        assert!(mismatched >= 10 && mismatched <= 20, "got {mismatched}");
    }

    #[tokio::test]
    async fn test_amounts_have_exact_two_decimal_values() {
        let (payments, _) = seeded(6).await;

        let min = BigDecimal::from(50);
        let max = BigDecimal::from(500);
        for p in &payments {
            assert!(p.amount >= min && p.amount <= max, "amount {}", p.amount);
            // Scaling by 100 must land on an integer
            let cents = &p.amount * BigDecimal::from(100);
            assert_eq!(cents, cents.with_scale(0));
        }
    }

    #[tokio::test]
    async fn test_rejects_invalid_config() {
        let mut zero_merchants = SyntheticSource::new(SynthConfig {
            num_merchants: 0,
            ..SynthConfig::default()
        });
        assert!(matches!(
            zero_merchants.payments().await,
            Err(ReconError::Source(_))
        ));

        let mut inverted_dates = SyntheticSource::new(SynthConfig {
            start_date: NaiveDate::from_ymd_opt(2025, 8, 15).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            ..SynthConfig::default()
        });
        assert!(inverted_dates.payments().await.is_err());

        let mut oversubscribed = SyntheticSource::new(SynthConfig {
            num_merchants: 1,
            num_transactions: 10_000,
            ..SynthConfig::default()
        });
        assert!(oversubscribed.payments().await.is_err());
    }
}
