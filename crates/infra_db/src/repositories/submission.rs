//! Submission repository
//!
//! The application form, contact, documents and workflow stage are JSONB
//! columns. The flat esign/payment/bind flags are written alongside the
//! stage so list queries and check constraints can use them; they are
//! never read back, the stage is the source of truth.

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use core_kernel::{AgencyId, SubmissionId, UserId};
use domain_submission::{Submission, SubmissionParts, SubmissionQuery};

use crate::error::DatabaseError;

const COLUMNS: &str = "id, agency_id, created_by, client_contact, application, status, signed_documents, \
     workflow, decline_reason, version, created_at, updated_at";

/// One row of the `submissions` table
#[derive(Debug, Clone, FromRow)]
pub struct SubmissionRow {
    pub id: Uuid,
    pub agency_id: Uuid,
    pub created_by: Uuid,
    pub client_contact: JsonValue,
    pub application: JsonValue,
    pub status: String,
    pub signed_documents: JsonValue,
    pub workflow: JsonValue,
    pub decline_reason: Option<String>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Flags derived from the workflow stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedFlags {
    pub esign_completed: bool,
    pub payment_status: &'static str,
    pub bind_requested: bool,
    pub bind_approved: bool,
}

impl DerivedFlags {
    pub fn of(submission: &Submission) -> Self {
        let stage = submission.workflow();
        Self {
            esign_completed: stage.esign_completed(),
            payment_status: stage.payment_status().as_str(),
            bind_requested: stage.bind_requested(),
            bind_approved: stage.bind_approved(),
        }
    }
}

impl SubmissionRow {
    pub fn from_domain(submission: &Submission) -> Result<Self, DatabaseError> {
        Ok(Self {
            id: *submission.id().as_uuid(),
            agency_id: *submission.agency_id().as_uuid(),
            created_by: *submission.created_by().as_uuid(),
            client_contact: serde_json::to_value(submission.client_contact())?,
            application: serde_json::to_value(submission.application())?,
            status: submission.status().as_str().to_string(),
            signed_documents: serde_json::to_value(submission.signed_documents())?,
            workflow: serde_json::to_value(submission.workflow())?,
            decline_reason: submission.decline_reason().map(str::to_string),
            version: i32::try_from(submission.version())
                .map_err(|_| DatabaseError::SerializationError("version out of range".to_string()))?,
            created_at: submission.created_at(),
            updated_at: submission.updated_at(),
        })
    }

    /// Rebuilds the aggregate; an unreadable stage or form is a serialization error
    pub fn into_domain(self) -> Result<Submission, DatabaseError> {
        let status = self
            .status
            .parse()
            .map_err(|e| DatabaseError::SerializationError(format!("submission {}: {e}", self.id)))?;
        let version = u32::try_from(self.version)
            .map_err(|_| DatabaseError::SerializationError(format!("submission {}: negative version", self.id)))?;

        Ok(Submission::restore(SubmissionParts {
            id: SubmissionId::from_uuid(self.id),
            agency_id: AgencyId::from_uuid(self.agency_id),
            created_by: UserId::from_uuid(self.created_by),
            client_contact: serde_json::from_value(self.client_contact)?,
            application: serde_json::from_value(self.application)?,
            status,
            signed_documents: serde_json::from_value(self.signed_documents)?,
            workflow: serde_json::from_value(self.workflow)?,
            decline_reason: self.decline_reason,
            version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }))
    }
}

/// Repository for the `submissions` table
#[derive(Debug, Clone)]
pub struct SubmissionRepository {
    pool: PgPool,
}

impl SubmissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: Uuid) -> Result<SubmissionRow, DatabaseError> {
        sqlx::query_as::<_, SubmissionRow>(&format!("SELECT {COLUMNS} FROM submissions WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Submission", id))
    }

    /// Newest first
    pub async fn find(&self, query: &SubmissionQuery) -> Result<Vec<SubmissionRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, SubmissionRow>(&format!(
            "SELECT {COLUMNS} FROM submissions \
             WHERE ($1::uuid IS NULL OR agency_id = $1) \
               AND ($2::text IS NULL OR status = $2) \
               AND ($3::boolean IS NULL OR bind_requested = $3) \
             ORDER BY created_at DESC \
             LIMIT $4"
        ))
        .bind(query.agency_id.map(|a| *a.as_uuid()))
        .bind(query.status.map(|s| s.as_str()))
        .bind(query.bind_requested)
        .bind(query.limit.map(i64::from))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn insert(&self, conn: &mut PgConnection, row: &SubmissionRow, flags: &DerivedFlags) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO submissions (
                id, agency_id, created_by, client_contact, application, status,
                signed_documents, workflow, esign_completed, payment_status,
                bind_requested, bind_approved, decline_reason, version, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(row.id)
        .bind(row.agency_id)
        .bind(row.created_by)
        .bind(&row.client_contact)
        .bind(&row.application)
        .bind(&row.status)
        .bind(&row.signed_documents)
        .bind(&row.workflow)
        .bind(flags.esign_completed)
        .bind(flags.payment_status)
        .bind(flags.bind_requested)
        .bind(flags.bind_approved)
        .bind(&row.decline_reason)
        .bind(row.version)
        .bind(row.created_at)
        .bind(row.updated_at)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Writes the row if the stored version still equals `row.version`
    ///
    /// # Errors
    ///
    /// [`DatabaseError::StaleVersion`] when another writer got there first
    pub async fn update(&self, conn: &mut PgConnection, row: &SubmissionRow, flags: &DerivedFlags) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE submissions SET
                client_contact = $3,
                application = $4,
                status = $5,
                signed_documents = $6,
                workflow = $7,
                esign_completed = $8,
                payment_status = $9,
                bind_requested = $10,
                bind_approved = $11,
                decline_reason = $12,
                version = version + 1,
                updated_at = $13
            WHERE id = $1 AND version = $2
            "#,
        )
        .bind(row.id)
        .bind(row.version)
        .bind(&row.client_contact)
        .bind(&row.application)
        .bind(&row.status)
        .bind(&row.signed_documents)
        .bind(&row.workflow)
        .bind(flags.esign_completed)
        .bind(flags.payment_status)
        .bind(flags.bind_requested)
        .bind(flags.bind_approved)
        .bind(&row.decline_reason)
        .bind(row.updated_at)
        .execute(conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::stale("Submission", row.id, row.version.unsigned_abs()));
        }
        Ok(())
    }
}
