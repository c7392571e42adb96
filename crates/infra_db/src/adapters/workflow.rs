//! PostgreSQL Workflow Adapter
//!
//! Implements [`WorkflowPort`] over the submission, quote and carrier
//! repositories. Every write runs inside a transaction; paired saves
//! (quote + submission) commit together or not at all.
//!
//! Error translation:
//! - missing row -> `PortError::NotFound`
//! - stale version -> `PortError::Conflict`
//! - duplicate (submission, carrier) quote -> `PortError::Validation` carrying [`DUPLICATE_QUOTE`]
//! - unreadable JSON or status text -> `PortError::CorruptRecord`

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, info, instrument, warn};

use core_kernel::{
    AdapterHealth, CarrierId, DomainPort, HealthCheckResult, HealthCheckable, OperationMetadata, PortError, QuoteId,
    SubmissionId,
};
use domain_quote::{Carrier, Quote};
use domain_submission::{QuoteQuery, Submission, SubmissionQuery, WorkflowPort, DUPLICATE_QUOTE};

use crate::error::DatabaseError;
use crate::repositories::{
    CarrierRepository, CarrierRow, DerivedFlags, QuoteRepository, QuoteRow, SubmissionRepository, SubmissionRow,
    SUBMISSION_CARRIER_KEY,
};

const ADAPTER_ID: &str = "postgres-workflow-adapter";

/// PostgreSQL-backed implementation of [`WorkflowPort`]
#[derive(Debug, Clone)]
pub struct PostgresWorkflowAdapter {
    pool: PgPool,
    submissions: SubmissionRepository,
    quotes: QuoteRepository,
    carriers: CarrierRepository,
}

impl PostgresWorkflowAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            submissions: SubmissionRepository::new(pool.clone()),
            quotes: QuoteRepository::new(pool.clone()),
            carriers: CarrierRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn initiator(metadata: &Option<OperationMetadata>) -> &str {
    metadata
        .as_ref()
        .and_then(|m| m.initiated_by.as_deref())
        .unwrap_or("system")
}

/// Keeps the entity name on not-found errors
fn not_found_as(entity: &'static str, id: impl std::fmt::Display) -> impl FnOnce(DatabaseError) -> PortError {
    let id = id.to_string();
    move |e| {
        if e.is_not_found() {
            PortError::not_found(entity, id)
        } else {
            e.into()
        }
    }
}

impl DomainPort for PostgresWorkflowAdapter {}

#[async_trait]
impl HealthCheckable for PostgresWorkflowAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();
        let result = sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(&self.pool).await;
        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        let (status, message) = match result {
            Ok(_) => (AdapterHealth::Healthy, None),
            Err(e) => (AdapterHealth::Unhealthy, Some(format!("Database error: {e}"))),
        };
        HealthCheckResult {
            adapter_id: ADAPTER_ID.to_string(),
            status,
            latency_ms,
            message,
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl WorkflowPort for PostgresWorkflowAdapter {
    // ========================================================================
    // Submissions
    // ========================================================================

    #[instrument(skip(self), fields(submission_id = %id))]
    async fn get_submission(&self, id: SubmissionId) -> Result<Submission, PortError> {
        let row = self
            .submissions
            .get(*id.as_uuid())
            .await
            .map_err(not_found_as("Submission", id))?;
        Ok(row.into_domain()?)
    }

    #[instrument(skip(self))]
    async fn find_submissions(&self, query: SubmissionQuery) -> Result<Vec<Submission>, PortError> {
        let rows = self.submissions.find(&query).await?;
        debug!(count = rows.len(), "Submissions found");
        Ok(rows
            .into_iter()
            .map(SubmissionRow::into_domain)
            .collect::<Result<Vec<_>, _>>()?)
    }

    #[instrument(skip(self, submission, metadata), fields(submission_id = %submission.id()))]
    async fn insert_submission(
        &self,
        submission: &Submission,
        metadata: Option<OperationMetadata>,
    ) -> Result<(), PortError> {
        let row = SubmissionRow::from_domain(submission)?;
        let mut conn = self.pool.acquire().await.map_err(DatabaseError::from)?;
        self.submissions
            .insert(&mut conn, &row, &DerivedFlags::of(submission))
            .await?;
        info!(by = initiator(&metadata), "Submission inserted");
        Ok(())
    }

    #[instrument(skip(self, submission, metadata), fields(submission_id = %submission.id(), version = submission.version()))]
    async fn save_submission(
        &self,
        submission: &Submission,
        metadata: Option<OperationMetadata>,
    ) -> Result<(), PortError> {
        let row = SubmissionRow::from_domain(submission)?;
        let mut tx = self.pool.begin().await.map_err(DatabaseError::from)?;
        if let Err(e) = self
            .submissions
            .update(&mut tx, &row, &DerivedFlags::of(submission))
            .await
        {
            warn!(error = %e, "Submission save rejected");
            return Err(e.into());
        }
        tx.commit().await.map_err(DatabaseError::from)?;
        debug!(by = initiator(&metadata), "Submission saved");
        Ok(())
    }

    // ========================================================================
    // Quotes
    // ========================================================================

    #[instrument(skip(self), fields(quote_id = %id))]
    async fn get_quote(&self, id: QuoteId) -> Result<Quote, PortError> {
        let row = self.quotes.get(*id.as_uuid()).await.map_err(not_found_as("Quote", id))?;
        Ok(row.into_domain()?)
    }

    #[instrument(skip(self))]
    async fn find_quotes(&self, query: QuoteQuery) -> Result<Vec<Quote>, PortError> {
        let rows = self.quotes.find(&query).await?;
        Ok(rows
            .into_iter()
            .map(QuoteRow::into_domain)
            .collect::<Result<Vec<_>, _>>()?)
    }

    #[instrument(skip(self), fields(submission_id = %submission_id))]
    async fn find_active_quote(&self, submission_id: SubmissionId) -> Result<Option<Quote>, PortError> {
        match self.quotes.find_active(*submission_id.as_uuid()).await? {
            Some(row) => Ok(Some(row.into_domain()?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self, quote, metadata), fields(quote_id = %quote.id(), version = quote.version()))]
    async fn save_quote(&self, quote: &Quote, metadata: Option<OperationMetadata>) -> Result<(), PortError> {
        let row = QuoteRow::from_domain(quote)?;
        let mut tx = self.pool.begin().await.map_err(DatabaseError::from)?;
        if let Err(e) = self.quotes.update(&mut tx, &row).await {
            warn!(error = %e, "Quote save rejected");
            return Err(e.into());
        }
        tx.commit().await.map_err(DatabaseError::from)?;
        debug!(by = initiator(&metadata), "Quote saved");
        Ok(())
    }

    #[instrument(skip(self, quote, submission, metadata), fields(quote_id = %quote.id(), submission_id = %submission.id()))]
    async fn insert_quote_with_submission(
        &self,
        quote: &Quote,
        submission: &Submission,
        metadata: Option<OperationMetadata>,
    ) -> Result<(), PortError> {
        let quote_row = QuoteRow::from_domain(quote)?;
        let submission_row = SubmissionRow::from_domain(submission)?;

        let mut tx = self.pool.begin().await.map_err(DatabaseError::from)?;
        if let Err(e) = self.quotes.insert(&mut tx, &quote_row).await {
            if e.is_duplicate_of(SUBMISSION_CARRIER_KEY) {
                warn!(carrier_id = %quote.carrier_id(), "Duplicate quote rejected");
                return Err(PortError::validation_field(DUPLICATE_QUOTE, "carrierId"));
            }
            return Err(e.into());
        }
        self.submissions
            .update(&mut tx, &submission_row, &DerivedFlags::of(submission))
            .await?;
        tx.commit().await.map_err(DatabaseError::from)?;

        info!(by = initiator(&metadata), final_amount = %quote.final_amount(), "Quote inserted");
        Ok(())
    }

    #[instrument(skip(self, submission, quote, metadata), fields(submission_id = %submission.id(), quote_id = %quote.id()))]
    async fn save_submission_and_quote(
        &self,
        submission: &Submission,
        quote: &Quote,
        metadata: Option<OperationMetadata>,
    ) -> Result<(), PortError> {
        let submission_row = SubmissionRow::from_domain(submission)?;
        let quote_row = QuoteRow::from_domain(quote)?;

        // dropping the transaction on error rolls both writes back
        let mut tx = self.pool.begin().await.map_err(DatabaseError::from)?;
        self.submissions
            .update(&mut tx, &submission_row, &DerivedFlags::of(submission))
            .await?;
        self.quotes.update(&mut tx, &quote_row).await?;
        tx.commit().await.map_err(DatabaseError::from)?;

        debug!(by = initiator(&metadata), "Submission and quote saved");
        Ok(())
    }

    // ========================================================================
    // Carriers
    // ========================================================================

    #[instrument(skip(self), fields(carrier_id = %id))]
    async fn get_carrier(&self, id: CarrierId) -> Result<Carrier, PortError> {
        let row = self
            .carriers
            .get(*id.as_uuid())
            .await
            .map_err(not_found_as("Carrier", id))?;
        Ok(row.into_domain()?)
    }

    async fn list_carriers(&self) -> Result<Vec<Carrier>, PortError> {
        Ok(self
            .carriers
            .list()
            .await?
            .into_iter()
            .map(CarrierRow::into_domain)
            .collect::<Result<Vec<_>, _>>()?)
    }

    #[instrument(skip(self, carrier), fields(carrier_id = %carrier.id))]
    async fn insert_carrier(&self, carrier: &Carrier) -> Result<(), PortError> {
        self.carriers.insert(&CarrierRow::from_domain(carrier)).await?;
        info!(name = %carrier.name, "Carrier inserted");
        Ok(())
    }
}
