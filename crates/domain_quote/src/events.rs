//! Domain events for the quote aggregate
//!
//! Events are collected on the aggregate and drained by the application
//! services after a successful save, which log them as the audit trail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{CarrierId, QuoteId, SubmissionId, Usd, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuoteEvent {
    /// Admin entered a carrier quote for a submission
    QuoteEntered {
        quote_id: QuoteId,
        submission_id: SubmissionId,
        carrier_id: CarrierId,
        final_amount: Usd,
        entered_by: UserId,
        timestamp: DateTime<Utc>,
    },

    /// Quote was made visible to the agency
    QuotePosted {
        quote_id: QuoteId,
        timestamp: DateTime<Utc>,
    },

    /// Agency accepted the quote
    QuoteApproved {
        quote_id: QuoteId,
        approved_by: UserId,
        timestamp: DateTime<Utc>,
    },

    /// One or more addends changed and the total was recomputed
    FeesRevised {
        quote_id: QuoteId,
        previous_final_amount: Usd,
        final_amount: Usd,
        timestamp: DateTime<Utc>,
    },

    BindRequested {
        quote_id: QuoteId,
        timestamp: DateTime<Utc>,
    },

    QuoteBound {
        quote_id: QuoteId,
        timestamp: DateTime<Utc>,
    },
}

impl QuoteEvent {
    pub fn quote_id(&self) -> QuoteId {
        match self {
            QuoteEvent::QuoteEntered { quote_id, .. }
            | QuoteEvent::QuotePosted { quote_id, .. }
            | QuoteEvent::QuoteApproved { quote_id, .. }
            | QuoteEvent::FeesRevised { quote_id, .. }
            | QuoteEvent::BindRequested { quote_id, .. }
            | QuoteEvent::QuoteBound { quote_id, .. } => *quote_id,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            QuoteEvent::QuoteEntered { timestamp, .. }
            | QuoteEvent::QuotePosted { timestamp, .. }
            | QuoteEvent::QuoteApproved { timestamp, .. }
            | QuoteEvent::FeesRevised { timestamp, .. }
            | QuoteEvent::BindRequested { timestamp, .. }
            | QuoteEvent::QuoteBound { timestamp, .. } => *timestamp,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            QuoteEvent::QuoteEntered { .. } => "QuoteEntered",
            QuoteEvent::QuotePosted { .. } => "QuotePosted",
            QuoteEvent::QuoteApproved { .. } => "QuoteApproved",
            QuoteEvent::FeesRevised { .. } => "FeesRevised",
            QuoteEvent::BindRequested { .. } => "BindRequested",
            QuoteEvent::QuoteBound { .. } => "QuoteBound",
        }
    }
}
