//! Bind workflow state machine
//!
//! A submission moves through signature, payment and bind as one explicit
//! stage value. Combinations such as "paid but not signed" cannot be built.
//!
//! ```text
//! Preparing ──send──► AwaitingSignature ──sign──► Signed ──pay──► Paid
//!     ▲                     │  ▲ resend                             │
//!     └──── regenerate ─────┘  └──┘                          request bind
//!                                                                   ▼
//!                                         Bound ◄──approve── BindRequested
//! ```
//!
//! Storage keeps the familiar flat columns (`esign_completed`,
//! `payment_status`, `bind_requested`, ...). [`StageFlags`] is that flat
//! shape; converting it back into a [`BindStage`] rejects illegal rows.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{EnvelopeId, Usd};

use crate::error::WorkflowError;

/// How long an unfinished payment blocks another attempt
pub const PAYMENT_CLAIM_TIMEOUT_MINUTES: i64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Paid => "PAID",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(PaymentStatus::Pending),
            "PAID" => Ok(PaymentStatus::Paid),
            other => Err(WorkflowError::validation(format!("Unknown payment status: {other}"))),
        }
    }
}

/// How the client paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Ach,
    Check,
    Wire,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Ach => "ach",
            PaymentMethod::Check => "check",
            PaymentMethod::Wire => "wire",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "card" | "credit_card" => Ok(PaymentMethod::Card),
            "ach" | "bank_transfer" => Ok(PaymentMethod::Ach),
            "check" => Ok(PaymentMethod::Check),
            "wire" => Ok(PaymentMethod::Wire),
            other => Err(WorkflowError::validation(format!("Unsupported payment method: {other}"))),
        }
    }
}

/// A completed payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub amount: Usd,
    pub method: PaymentMethod,
    pub transaction_id: String,
    pub paid_at: DateTime<Utc>,
}

/// Where a submission stands between document generation and bind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BindStage {
    /// Documents may be (re)generated; nothing sent yet
    #[default]
    Preparing,
    AwaitingSignature {
        envelope_id: EnvelopeId,
        sent_at: DateTime<Utc>,
    },
    Signed {
        esign_completed_at: DateTime<Utc>,
        /// Set while a charge is in flight
        #[serde(default, skip_serializing_if = "Option::is_none")]
        payment_started_at: Option<DateTime<Utc>>,
    },
    Paid {
        esign_completed_at: DateTime<Utc>,
        payment: PaymentRecord,
    },
    BindRequested {
        esign_completed_at: DateTime<Utc>,
        payment: PaymentRecord,
        bind_requested_at: DateTime<Utc>,
    },
    Bound {
        esign_completed_at: DateTime<Utc>,
        payment: PaymentRecord,
        bind_requested_at: DateTime<Utc>,
        bind_approved_at: DateTime<Utc>,
    },
}

impl BindStage {
    pub fn name(&self) -> &'static str {
        match self {
            BindStage::Preparing => "PREPARING",
            BindStage::AwaitingSignature { .. } => "AWAITING_SIGNATURE",
            BindStage::Signed { .. } => "SIGNED",
            BindStage::Paid { .. } => "PAID",
            BindStage::BindRequested { .. } => "BIND_REQUESTED",
            BindStage::Bound { .. } => "BOUND",
        }
    }

    // ------------------------------------------------------------------
    // Derived flags
    // ------------------------------------------------------------------

    pub fn esign_completed(&self) -> bool {
        self.esign_completed_at().is_some()
    }

    pub fn esign_completed_at(&self) -> Option<DateTime<Utc>> {
        match self {
            BindStage::Preparing | BindStage::AwaitingSignature { .. } => None,
            BindStage::Signed { esign_completed_at, .. }
            | BindStage::Paid { esign_completed_at, .. }
            | BindStage::BindRequested { esign_completed_at, .. }
            | BindStage::Bound { esign_completed_at, .. } => Some(*esign_completed_at),
        }
    }

    pub fn envelope_id(&self) -> Option<EnvelopeId> {
        match self {
            BindStage::AwaitingSignature { envelope_id, .. } => Some(*envelope_id),
            _ => None,
        }
    }

    pub fn payment(&self) -> Option<&PaymentRecord> {
        match self {
            BindStage::Paid { payment, .. }
            | BindStage::BindRequested { payment, .. }
            | BindStage::Bound { payment, .. } => Some(payment),
            _ => None,
        }
    }

    pub fn payment_started_at(&self) -> Option<DateTime<Utc>> {
        match self {
            BindStage::Signed { payment_started_at, .. } => *payment_started_at,
            _ => None,
        }
    }

    /// True while a payment claim younger than the timeout is held
    pub fn payment_in_flight(&self, at: DateTime<Utc>) -> bool {
        self.payment_started_at()
            .is_some_and(|started| at - started < Duration::minutes(PAYMENT_CLAIM_TIMEOUT_MINUTES))
    }

    pub fn payment_status(&self) -> PaymentStatus {
        if self.payment().is_some() {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Pending
        }
    }

    pub fn bind_requested(&self) -> bool {
        self.bind_requested_at().is_some()
    }

    pub fn bind_requested_at(&self) -> Option<DateTime<Utc>> {
        match self {
            BindStage::BindRequested { bind_requested_at, .. }
            | BindStage::Bound { bind_requested_at, .. } => Some(*bind_requested_at),
            _ => None,
        }
    }

    pub fn bind_approved(&self) -> bool {
        self.bind_approved_at().is_some()
    }

    pub fn bind_approved_at(&self) -> Option<DateTime<Utc>> {
        match self {
            BindStage::Bound { bind_approved_at, .. } => Some(*bind_approved_at),
            _ => None,
        }
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    /// Back to `Preparing` so documents can be regenerated
    pub fn reset_for_documents(&self) -> Result<BindStage, WorkflowError> {
        match self {
            BindStage::Preparing | BindStage::AwaitingSignature { .. } => Ok(BindStage::Preparing),
            _ => Err(WorkflowError::EsignAlreadyCompleted),
        }
    }

    /// Issues a new envelope; resending replaces the previous one
    pub fn send_for_signature(&self, envelope_id: EnvelopeId, at: DateTime<Utc>) -> Result<BindStage, WorkflowError> {
        match self {
            BindStage::Preparing | BindStage::AwaitingSignature { .. } => Ok(BindStage::AwaitingSignature {
                envelope_id,
                sent_at: at,
            }),
            _ => Err(WorkflowError::EsignAlreadyCompleted),
        }
    }

    /// Completes the e-signature for the envelope that was issued
    pub fn complete_signature(&self, envelope_id: EnvelopeId, at: DateTime<Utc>) -> Result<BindStage, WorkflowError> {
        match self {
            BindStage::AwaitingSignature { envelope_id: issued, .. } if *issued == envelope_id => {
                Ok(BindStage::Signed {
                    esign_completed_at: at,
                    payment_started_at: None,
                })
            }
            BindStage::AwaitingSignature { .. } => Err(WorkflowError::EnvelopeMismatch(envelope_id)),
            BindStage::Preparing => Err(WorkflowError::NotSentForSignature),
            _ => Err(WorkflowError::EsignAlreadyCompleted),
        }
    }

    /// Claims the payment before any money moves
    ///
    /// A claim younger than [`PAYMENT_CLAIM_TIMEOUT_MINUTES`] rejects the
    /// attempt; an older one is treated as abandoned and taken over.
    pub fn begin_payment(&self, at: DateTime<Utc>) -> Result<BindStage, WorkflowError> {
        match self {
            BindStage::Preparing | BindStage::AwaitingSignature { .. } => Err(WorkflowError::EsignRequiredForPayment),
            BindStage::Signed { .. } if self.payment_in_flight(at) => Err(WorkflowError::PaymentInProgress),
            BindStage::Signed { esign_completed_at, .. } => Ok(BindStage::Signed {
                esign_completed_at: *esign_completed_at,
                payment_started_at: Some(at),
            }),
            _ => Err(WorkflowError::AlreadyPaid),
        }
    }

    /// Drops a payment claim after a failed charge
    pub fn release_payment(&self) -> BindStage {
        match self {
            BindStage::Signed { esign_completed_at, .. } => BindStage::Signed {
                esign_completed_at: *esign_completed_at,
                payment_started_at: None,
            },
            other => other.clone(),
        }
    }

    pub fn record_payment(&self, payment: PaymentRecord) -> Result<BindStage, WorkflowError> {
        match self {
            BindStage::Preparing | BindStage::AwaitingSignature { .. } => Err(WorkflowError::EsignRequiredForPayment),
            BindStage::Signed { esign_completed_at, .. } => Ok(BindStage::Paid {
                esign_completed_at: *esign_completed_at,
                payment,
            }),
            _ => Err(WorkflowError::AlreadyPaid),
        }
    }

    pub fn request_bind(&self, at: DateTime<Utc>) -> Result<BindStage, WorkflowError> {
        match self {
            BindStage::Preparing | BindStage::AwaitingSignature { .. } => Err(WorkflowError::EsignRequiredForBind),
            BindStage::Signed { .. } => Err(WorkflowError::PaymentRequiredForBind),
            BindStage::Paid { esign_completed_at, payment } => Ok(BindStage::BindRequested {
                esign_completed_at: *esign_completed_at,
                payment: payment.clone(),
                bind_requested_at: at,
            }),
            BindStage::BindRequested { .. } | BindStage::Bound { .. } => Err(WorkflowError::BindAlreadyRequested),
        }
    }

    pub fn approve_bind(&self, at: DateTime<Utc>) -> Result<BindStage, WorkflowError> {
        match self {
            BindStage::BindRequested {
                esign_completed_at,
                payment,
                bind_requested_at,
            } => Ok(BindStage::Bound {
                esign_completed_at: *esign_completed_at,
                payment: payment.clone(),
                bind_requested_at: *bind_requested_at,
                bind_approved_at: at,
            }),
            BindStage::Bound { .. } => Err(WorkflowError::BindAlreadyApproved),
            _ => Err(WorkflowError::BindNotRequested),
        }
    }

    /// Flattens the stage into the stored column layout
    pub fn flags(&self) -> StageFlags {
        let payment = self.payment();
        StageFlags {
            envelope_id: self.envelope_id(),
            sent_for_signature_at: match self {
                BindStage::AwaitingSignature { sent_at, .. } => Some(*sent_at),
                _ => None,
            },
            esign_completed: self.esign_completed(),
            esign_completed_at: self.esign_completed_at(),
            payment_started_at: self.payment_started_at(),
            payment_status: self.payment_status(),
            payment_amount: payment.map(|p| p.amount),
            payment_method: payment.map(|p| p.method),
            transaction_id: payment.map(|p| p.transaction_id.clone()),
            payment_date: payment.map(|p| p.paid_at),
            bind_requested: self.bind_requested(),
            bind_requested_at: self.bind_requested_at(),
            bind_approved: self.bind_approved(),
            bind_approved_at: self.bind_approved_at(),
        }
    }
}

/// The flat stored form of a [`BindStage`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageFlags {
    pub envelope_id: Option<EnvelopeId>,
    pub sent_for_signature_at: Option<DateTime<Utc>>,
    pub esign_completed: bool,
    pub esign_completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_started_at: Option<DateTime<Utc>>,
    pub payment_status: PaymentStatus,
    pub payment_amount: Option<Usd>,
    pub payment_method: Option<PaymentMethod>,
    pub transaction_id: Option<String>,
    pub payment_date: Option<DateTime<Utc>>,
    pub bind_requested: bool,
    pub bind_requested_at: Option<DateTime<Utc>>,
    pub bind_approved: bool,
    pub bind_approved_at: Option<DateTime<Utc>>,
}

impl TryFrom<StageFlags> for BindStage {
    type Error = WorkflowError;

    fn try_from(flags: StageFlags) -> Result<Self, Self::Error> {
        let illegal = |reason: &str| WorkflowError::validation(format!("Illegal workflow state: {reason}"));

        if !flags.esign_completed {
            if flags.payment_status == PaymentStatus::Paid {
                return Err(illegal("paid without e-signature"));
            }
            if flags.bind_requested || flags.bind_approved {
                return Err(illegal("bind without e-signature"));
            }
            return Ok(match (flags.envelope_id, flags.sent_for_signature_at) {
                (Some(envelope_id), Some(sent_at)) => BindStage::AwaitingSignature { envelope_id, sent_at },
                (None, None) => BindStage::Preparing,
                _ => return Err(illegal("envelope without send time")),
            });
        }

        let esign_completed_at = flags
            .esign_completed_at
            .ok_or_else(|| illegal("e-signature completed without timestamp"))?;

        if flags.payment_status == PaymentStatus::Pending {
            if flags.bind_requested || flags.bind_approved {
                return Err(illegal("bind requested without payment"));
            }
            return Ok(BindStage::Signed {
                esign_completed_at,
                payment_started_at: flags.payment_started_at,
            });
        }

        let payment = match (flags.payment_amount, flags.payment_method, flags.transaction_id, flags.payment_date) {
            (Some(amount), Some(method), Some(transaction_id), Some(paid_at)) => PaymentRecord {
                amount,
                method,
                transaction_id,
                paid_at,
            },
            _ => return Err(illegal("paid without payment details")),
        };

        match (flags.bind_requested, flags.bind_requested_at, flags.bind_approved, flags.bind_approved_at) {
            (false, _, false, _) => Ok(BindStage::Paid { esign_completed_at, payment }),
            (true, Some(bind_requested_at), false, _) => Ok(BindStage::BindRequested {
                esign_completed_at,
                payment,
                bind_requested_at,
            }),
            (true, Some(bind_requested_at), true, Some(bind_approved_at)) => Ok(BindStage::Bound {
                esign_completed_at,
                payment,
                bind_requested_at,
                bind_approved_at,
            }),
            (false, _, true, _) => Err(illegal("bind approved without request")),
            _ => Err(illegal("bind flag without timestamp")),
        }
    }
}
