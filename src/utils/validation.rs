//! Validation utilities

use crate::traits::*;
use crate::types::*;
use bigdecimal::BigDecimal;

/// Validate that an amount is non-negative
pub fn validate_non_negative_amount(amount: &BigDecimal, key: &RecordKey) -> ReconResult<()> {
    if *amount < BigDecimal::from(0) {
        Err(ReconError::Schema(format!(
            "Record {key} has a negative amount: {amount}"
        )))
    } else {
        Ok(())
    }
}

/// Validate that a payment identifier is well-formed
pub fn validate_payment_id(payment_id: &str) -> ReconResult<()> {
    if payment_id.trim().is_empty() {
        return Err(ReconError::Schema(
            "PaymentID cannot be empty".to_string(),
        ));
    }

    if payment_id.len() > 50 {
        return Err(ReconError::Schema(
            "PaymentID cannot exceed 50 characters".to_string(),
        ));
    }

    // Check for valid characters (alphanumeric, dashes, underscores)
    if !payment_id
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ReconError::Schema(
            "PaymentID can only contain alphanumeric characters, dashes, and underscores"
                .to_string(),
        ));
    }

    Ok(())
}

/// Validate that a merchant code is well-formed
pub fn validate_merchant_code(merchant: &str) -> ReconResult<()> {
    if merchant.trim().is_empty() {
        return Err(ReconError::Schema(
            "Merchant cannot be empty".to_string(),
        ));
    }

    if merchant.len() > 20 {
        return Err(ReconError::Schema(
            "Merchant code cannot exceed 20 characters".to_string(),
        ));
    }

    if !merchant.chars().all(|c| c.is_alphanumeric()) {
        return Err(ReconError::Schema(
            "Merchant code can only contain alphanumeric characters".to_string(),
        ));
    }

    Ok(())
}

/// Strict record validator with detailed checks on identifier shape in
/// addition to the default schema contract
pub struct StrictRecordValidator;

impl RecordValidator for StrictRecordValidator {
    fn validate_payment(&self, record: &PaymentRecord) -> ReconResult<()> {
        DefaultRecordValidator.validate_payment(record)?;
        validate_payment_id(&record.payment_id)?;
        validate_merchant_code(&record.merchant)?;
        validate_non_negative_amount(&record.amount, &record.key())
    }

    fn validate_ledger(&self, record: &LedgerRecord) -> ReconResult<()> {
        DefaultRecordValidator.validate_ledger(record)?;
        validate_payment_id(&record.payment_id)?;
        validate_merchant_code(&record.merchant)?;
        match &record.amount {
            Some(amount) => validate_non_negative_amount(amount, &record.key()),
            None => Ok(()),
        }
    }
}
