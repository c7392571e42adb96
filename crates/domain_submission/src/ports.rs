//! Workflow store port
//!
//! The bind workflow reads and writes submissions, quotes and carriers
//! through [`WorkflowPort`]. Every save is version checked: the adapter
//! writes only when the stored version still equals the aggregate's
//! version, and returns [`PortError::Conflict`] otherwise. After a
//! successful save the caller bumps the in-memory version with
//! `mark_persisted`.
//!
//! ```rust,ignore
//! let mut submission = port.get_submission(id).await?;
//! submission.request_bind()?;
//! quote.mark_bind_requested()?;
//! port.save_submission_and_quote(&submission, &quote, None).await?;
//! submission.mark_persisted();
//! quote.mark_persisted();
//! ```

use async_trait::async_trait;

use core_kernel::{
    AgencyId, CarrierId, DomainPort, HealthCheckable, OperationMetadata, PortError, QuoteId, SubmissionId,
};
use domain_quote::{Carrier, Quote, QuoteStatus};

use crate::submission::{Submission, SubmissionStatus};

/// Filters for listing submissions
#[derive(Debug, Clone, Default)]
pub struct SubmissionQuery {
    pub agency_id: Option<AgencyId>,
    pub status: Option<SubmissionStatus>,
    /// Only submissions with a bind request (pending or approved)
    pub bind_requested: Option<bool>,
    pub limit: Option<u32>,
}

impl SubmissionQuery {
    pub fn for_agency(agency_id: AgencyId) -> Self {
        Self {
            agency_id: Some(agency_id),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: SubmissionStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn bind_requests() -> Self {
        Self {
            bind_requested: Some(true),
            ..Default::default()
        }
    }

    pub fn matches(&self, submission: &Submission) -> bool {
        self.agency_id.map_or(true, |a| submission.agency_id() == a)
            && self.status.map_or(true, |s| submission.status() == s)
            && self
                .bind_requested
                .map_or(true, |b| submission.workflow().bind_requested() == b)
    }
}

/// Filters for listing quotes
#[derive(Debug, Clone, Default)]
pub struct QuoteQuery {
    pub submission_id: Option<SubmissionId>,
    pub status: Option<QuoteStatus>,
    pub limit: Option<u32>,
}

impl QuoteQuery {
    pub fn for_submission(submission_id: SubmissionId) -> Self {
        Self {
            submission_id: Some(submission_id),
            ..Default::default()
        }
    }

    pub fn matches(&self, quote: &Quote) -> bool {
        self.submission_id.map_or(true, |s| quote.submission_id() == s)
            && self.status.map_or(true, |s| quote.status() == s)
    }
}

/// Message returned when a second quote is entered for the same carrier
pub const DUPLICATE_QUOTE: &str = "Quote already exists for this submission and carrier";

/// Persistence operations needed by the bind workflow
#[async_trait]
pub trait WorkflowPort: DomainPort + HealthCheckable {
    // ========================================================================
    // Submissions
    // ========================================================================

    async fn get_submission(&self, id: SubmissionId) -> Result<Submission, PortError>;

    async fn find_submissions(&self, query: SubmissionQuery) -> Result<Vec<Submission>, PortError>;

    async fn insert_submission(
        &self,
        submission: &Submission,
        metadata: Option<OperationMetadata>,
    ) -> Result<(), PortError>;

    /// Version-checked update
    async fn save_submission(
        &self,
        submission: &Submission,
        metadata: Option<OperationMetadata>,
    ) -> Result<(), PortError>;

    // ========================================================================
    // Quotes
    // ========================================================================

    async fn get_quote(&self, id: QuoteId) -> Result<Quote, PortError>;

    async fn find_quotes(&self, query: QuoteQuery) -> Result<Vec<Quote>, PortError>;

    /// The quote the agency approved for the submission, if any
    async fn find_active_quote(&self, submission_id: SubmissionId) -> Result<Option<Quote>, PortError>;

    /// Version-checked update
    async fn save_quote(&self, quote: &Quote, metadata: Option<OperationMetadata>) -> Result<(), PortError>;

    /// Inserts a new quote and saves the submission in one transaction
    ///
    /// Fails with a validation error carrying [`DUPLICATE_QUOTE`] when the
    /// submission already has a quote from the same carrier.
    async fn insert_quote_with_submission(
        &self,
        quote: &Quote,
        submission: &Submission,
        metadata: Option<OperationMetadata>,
    ) -> Result<(), PortError>;

    /// Saves both aggregates in one transaction, each version checked
    async fn save_submission_and_quote(
        &self,
        submission: &Submission,
        quote: &Quote,
        metadata: Option<OperationMetadata>,
    ) -> Result<(), PortError>;

    // ========================================================================
    // Carriers
    // ========================================================================

    async fn get_carrier(&self, id: CarrierId) -> Result<Carrier, PortError>;

    async fn list_carriers(&self) -> Result<Vec<Carrier>, PortError>;

    async fn insert_carrier(&self, carrier: &Carrier) -> Result<(), PortError>;
}

/// Mock implementation of WorkflowPort for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    #[derive(Debug, Default)]
    struct Store {
        submissions: HashMap<SubmissionId, Submission>,
        quotes: HashMap<QuoteId, Quote>,
        carriers: HashMap<CarrierId, Carrier>,
    }

    /// In-memory mock implementation of WorkflowPort
    ///
    /// One lock guards all maps so paired saves are atomic like the
    /// Postgres transaction.
    #[derive(Debug, Clone, Default)]
    pub struct MockWorkflowPort {
        store: Arc<RwLock<Store>>,
    }

    impl MockWorkflowPort {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with carriers for testing
        pub async fn with_carriers(carriers: Vec<Carrier>) -> Self {
            let port = Self::new();
            {
                let mut store = port.store.write().await;
                for carrier in carriers {
                    store.carriers.insert(carrier.id, carrier);
                }
            }
            port
        }

        /// Stored version of a submission, for assertions
        pub async fn submission_version(&self, id: SubmissionId) -> Option<u32> {
            self.store.read().await.submissions.get(&id).map(Submission::version)
        }
    }

    fn check_submission_version(store: &Store, submission: &Submission) -> Result<(), PortError> {
        let stored = store
            .submissions
            .get(&submission.id())
            .ok_or_else(|| PortError::not_found("Submission", submission.id()))?;
        if stored.version() != submission.version() {
            return Err(PortError::conflict(format!(
                "Submission {} was modified concurrently (expected version {}, found {})",
                submission.id(),
                submission.version(),
                stored.version()
            )));
        }
        Ok(())
    }

    fn check_quote_version(store: &Store, quote: &Quote) -> Result<(), PortError> {
        let stored = store
            .quotes
            .get(&quote.id())
            .ok_or_else(|| PortError::not_found("Quote", quote.id()))?;
        if stored.version() != quote.version() {
            return Err(PortError::conflict(format!(
                "Quote {} was modified concurrently (expected version {}, found {})",
                quote.id(),
                quote.version(),
                stored.version()
            )));
        }
        Ok(())
    }

    fn persisted<T: Clone>(value: &T, bump: impl FnOnce(&mut T)) -> T {
        let mut copy = value.clone();
        bump(&mut copy);
        copy
    }

    impl DomainPort for MockWorkflowPort {}

    #[async_trait]
    impl HealthCheckable for MockWorkflowPort {
        async fn health_check(&self) -> core_kernel::HealthCheckResult {
            core_kernel::HealthCheckResult {
                adapter_id: "mock-workflow-port".to_string(),
                status: core_kernel::AdapterHealth::Healthy,
                latency_ms: 0,
                message: Some("Mock adapter always healthy".to_string()),
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl WorkflowPort for MockWorkflowPort {
        async fn get_submission(&self, id: SubmissionId) -> Result<Submission, PortError> {
            self.store
                .read()
                .await
                .submissions
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Submission", id))
        }

        async fn find_submissions(&self, query: SubmissionQuery) -> Result<Vec<Submission>, PortError> {
            let store = self.store.read().await;
            let mut results: Vec<Submission> = store
                .submissions
                .values()
                .filter(|s| query.matches(s))
                .cloned()
                .collect();
            results.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
            if let Some(limit) = query.limit {
                results.truncate(limit as usize);
            }
            Ok(results)
        }

        async fn insert_submission(
            &self,
            submission: &Submission,
            _metadata: Option<OperationMetadata>,
        ) -> Result<(), PortError> {
            let mut store = self.store.write().await;
            if store.submissions.contains_key(&submission.id()) {
                return Err(PortError::conflict(format!("Submission {} already exists", submission.id())));
            }
            store.submissions.insert(submission.id(), submission.clone());
            Ok(())
        }

        async fn save_submission(
            &self,
            submission: &Submission,
            _metadata: Option<OperationMetadata>,
        ) -> Result<(), PortError> {
            let mut store = self.store.write().await;
            check_submission_version(&store, submission)?;
            store
                .submissions
                .insert(submission.id(), persisted(submission, Submission::mark_persisted));
            Ok(())
        }

        async fn get_quote(&self, id: QuoteId) -> Result<Quote, PortError> {
            self.store
                .read()
                .await
                .quotes
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Quote", id))
        }

        async fn find_quotes(&self, query: QuoteQuery) -> Result<Vec<Quote>, PortError> {
            let store = self.store.read().await;
            let mut results: Vec<Quote> = store.quotes.values().filter(|q| query.matches(q)).cloned().collect();
            results.sort_by(|a, b| b.entered_at().cmp(&a.entered_at()));
            if let Some(limit) = query.limit {
                results.truncate(limit as usize);
            }
            Ok(results)
        }

        async fn find_active_quote(&self, submission_id: SubmissionId) -> Result<Option<Quote>, PortError> {
            let store = self.store.read().await;
            Ok(store
                .quotes
                .values()
                .filter(|q| q.submission_id() == submission_id)
                .filter(|q| {
                    matches!(
                        q.status(),
                        QuoteStatus::Approved | QuoteStatus::BindRequested | QuoteStatus::Bound
                    )
                })
                .max_by_key(|q| q.approved_at())
                .cloned())
        }

        async fn save_quote(&self, quote: &Quote, _metadata: Option<OperationMetadata>) -> Result<(), PortError> {
            let mut store = self.store.write().await;
            check_quote_version(&store, quote)?;
            store.quotes.insert(quote.id(), persisted(quote, Quote::mark_persisted));
            Ok(())
        }

        async fn insert_quote_with_submission(
            &self,
            quote: &Quote,
            submission: &Submission,
            _metadata: Option<OperationMetadata>,
        ) -> Result<(), PortError> {
            let mut store = self.store.write().await;
            let duplicate = store
                .quotes
                .values()
                .any(|q| q.submission_id() == quote.submission_id() && q.carrier_id() == quote.carrier_id());
            if duplicate {
                return Err(PortError::validation_field(DUPLICATE_QUOTE, "carrierId"));
            }
            check_submission_version(&store, submission)?;

            store.quotes.insert(quote.id(), quote.clone());
            store
                .submissions
                .insert(submission.id(), persisted(submission, Submission::mark_persisted));
            Ok(())
        }

        async fn save_submission_and_quote(
            &self,
            submission: &Submission,
            quote: &Quote,
            _metadata: Option<OperationMetadata>,
        ) -> Result<(), PortError> {
            let mut store = self.store.write().await;
            check_submission_version(&store, submission)?;
            check_quote_version(&store, quote)?;

            store
                .submissions
                .insert(submission.id(), persisted(submission, Submission::mark_persisted));
            store.quotes.insert(quote.id(), persisted(quote, Quote::mark_persisted));
            Ok(())
        }

        async fn get_carrier(&self, id: CarrierId) -> Result<Carrier, PortError> {
            self.store
                .read()
                .await
                .carriers
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Carrier", id))
        }

        async fn list_carriers(&self) -> Result<Vec<Carrier>, PortError> {
            let mut carriers: Vec<Carrier> = self.store.read().await.carriers.values().cloned().collect();
            carriers.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(carriers)
        }

        async fn insert_carrier(&self, carrier: &Carrier) -> Result<(), PortError> {
            self.store.write().await.carriers.insert(carrier.id, carrier.clone());
            Ok(())
        }
    }
}
