//! Payment processor port
//!
//! The bind workflow only needs a transaction id back from whatever takes the
//! money. [`MockPaymentProcessor`] completes instantly and is what the portal
//! runs with until a card processor is wired in.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use core_kernel::{PortError, SubmissionId, Usd};

use crate::stage::PaymentMethod;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    pub submission_id: SubmissionId,
    pub amount: Usd,
    pub method: PaymentMethod,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReceipt {
    pub transaction_id: String,
    pub paid_at: DateTime<Utc>,
}

#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Charges the amount; an error means no money moved
    async fn charge(&self, request: &PaymentRequest) -> Result<PaymentReceipt, PortError>;
}

/// Always succeeds with a `MOCK-<millis>-<suffix>` transaction id
#[derive(Debug, Clone, Default)]
pub struct MockPaymentProcessor;

impl MockPaymentProcessor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PaymentProcessor for MockPaymentProcessor {
    async fn charge(&self, request: &PaymentRequest) -> Result<PaymentReceipt, PortError> {
        let paid_at = Utc::now();
        let suffix: String = uuid::Uuid::new_v4().simple().to_string().chars().take(9).collect();
        let transaction_id = format!("MOCK-{}-{}", paid_at.timestamp_millis(), suffix);

        tracing::info!(
            submission_id = %request.submission_id,
            amount = %request.amount,
            method = %request.method,
            transaction_id = %transaction_id,
            "Mock payment completed"
        );

        Ok(PaymentReceipt { transaction_id, paid_at })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_mock_transaction_id_format() {
        let receipt = MockPaymentProcessor::new()
            .charge(&PaymentRequest {
                submission_id: SubmissionId::new(),
                amount: Usd::new(dec!(1200)),
                method: PaymentMethod::Card,
            })
            .await
            .unwrap();

        let parts: Vec<&str> = receipt.transaction_id.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "MOCK");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 9);
    }
}
