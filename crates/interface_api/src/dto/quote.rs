//! Quote DTOs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{CarrierId, QuoteId, SubmissionId, Usd};
use domain_quote::{FinancePlan, Quote, QuoteCoverage};
use domain_submission::{SignedDocument, TimelineStep, WorkflowGates};

use super::submission::SubmissionView;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnterQuoteRequest {
    pub submission_id: SubmissionId,
    pub carrier_id: CarrierId,
    #[serde(rename = "carrierQuoteUSD")]
    pub carrier_quote: Decimal,
    pub premium_tax_percent: Option<Decimal>,
    #[serde(rename = "policyFeeUSD")]
    pub policy_fee: Option<Decimal>,
    #[serde(rename = "brokerFeeAmountUSD")]
    pub broker_fee: Option<Decimal>,
    #[serde(default)]
    pub coverage: QuoteCoverage,
    pub finance_plan: Option<FinancePlan>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuoteRequest {
    #[serde(rename = "brokerFeeAmountUSD")]
    pub broker_fee: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub success: bool,
    pub quote: Quote,
}

impl QuoteResponse {
    pub fn new(quote: Quote) -> Self {
        Self { success: true, quote }
    }
}

#[derive(Debug, Serialize)]
pub struct QuoteListResponse {
    pub success: bool,
    pub quotes: Vec<Quote>,
}

/// Result of a broker fee change
#[derive(Debug, Serialize)]
pub struct BrokerFeeResponse {
    pub success: bool,
    pub quote: BrokerFeeView,
}

#[derive(Debug, Serialize)]
pub struct BrokerFeeView {
    pub id: QuoteId,
    #[serde(rename = "brokerFeeAmountUSD")]
    pub broker_fee: Usd,
    #[serde(rename = "finalAmountUSD")]
    pub final_amount: Usd,
}

impl From<&Quote> for BrokerFeeView {
    fn from(quote: &Quote) -> Self {
        Self {
            id: quote.id(),
            broker_fee: quote.fees().broker_fee(),
            final_amount: quote.final_amount(),
        }
    }
}

/// Quote page: the quote, its submission, and what can be done next
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDetailResponse {
    pub success: bool,
    pub quote: Quote,
    pub carrier_name: String,
    pub client_name: String,
    pub submission: SubmissionView,
    pub gates: WorkflowGates,
    pub timeline: Vec<TimelineStep>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDocumentsResponse {
    pub success: bool,
    pub documents_generated: usize,
    pub documents: Vec<SignedDocument>,
}

/// `?format=html` returns the document source instead of the PDF
#[derive(Debug, Default, Deserialize)]
pub struct DocumentQuery {
    pub format: Option<String>,
}

impl DocumentQuery {
    pub fn wants_html(&self) -> bool {
        self.format.as_deref().is_some_and(|f| f.eq_ignore_ascii_case("html"))
    }
}
