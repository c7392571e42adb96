//! Submission Domain
//!
//! Application intake and the bind workflow: generated documents,
//! e-signature, payment and bind approval.
//!
//! # Architecture
//!
//! - **Aggregate**: [`Submission`] owns its documents and its [`BindStage`]
//! - **State machine**: [`BindStage`] replaces the loose esign/payment/bind flags
//! - **Gates**: [`evaluate_gates`] is the one place that decides which action is open
//! - **Services**: [`BindWorkflowService`] applies actions through a [`WorkflowPort`]
//! - **Ports**: [`WorkflowPort`] for storage, [`PaymentProcessor`] for payments
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_submission::{evaluate_gates, WorkflowSnapshot};
//!
//! let gates = evaluate_gates(&WorkflowSnapshot::of(&submission, &quote));
//! if gates.can_pay {
//!     service.process_payment(submission.id(), dec!(1200), PaymentMethod::Card).await?;
//! }
//! ```

pub mod application;
pub mod documents;
pub mod error;
pub mod events;
pub mod payment;
pub mod ports;
pub mod services;
pub mod stage;
pub mod submission;
pub mod workflow;

pub use application::{
    ApplicantDetails, ApplicationForm, ContractPractices, CoverageRequest, ExposureProfile, Signatures,
    WorkExperience, YesNo,
};
pub use documents::{DocumentType, SignatureStatus, SignedDocument, Signer};
pub use error::WorkflowError;
pub use events::SubmissionEvent;
pub use payment::{MockPaymentProcessor, PaymentProcessor, PaymentReceipt, PaymentRequest};
pub use ports::{QuoteQuery, SubmissionQuery, WorkflowPort, DUPLICATE_QUOTE};
pub use services::{
    BindWorkflowService, EnterQuote, QuoteWorkflowView, SignatureCompletion, SignatureRequest, WorkflowSettings,
};
pub use stage::{BindStage, PaymentMethod, PaymentRecord, PaymentStatus, StageFlags};
pub use submission::{
    BusinessAddress, ClientContact, NewSubmission, Submission, SubmissionParts, SubmissionStatus,
};
pub use workflow::{evaluate_gates, timeline, TimelineStep, WorkflowAction, WorkflowGates, WorkflowSnapshot};

#[cfg(any(test, feature = "mock"))]
pub use ports::mock::MockWorkflowPort;
