//! Quote repository
//!
//! Every fee column is written from the recomputed [`FeeSchedule`]. On
//! read only the inputs are used; the derived amounts are recomputed by
//! `Quote::restore`, so a hand-edited total can never leak back out.
//!
//! [`FeeSchedule`]: domain_quote::FeeSchedule

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use sqlx::{FromRow, PgConnection, PgPool};
use tracing::warn;
use uuid::Uuid;

use core_kernel::{CarrierId, QuoteId, SubmissionId, UserId};
use domain_quote::{FeeInputs, Quote, QuoteParts};
use domain_submission::QuoteQuery;

use crate::error::DatabaseError;

/// Unique constraint on (submission_id, carrier_id)
pub const SUBMISSION_CARRIER_KEY: &str = "quotes_submission_carrier_key";

const COLUMNS: &str = "id, submission_id, carrier_id, carrier_quote, premium_tax_percent, premium_tax_amount, \
     policy_fee, broker_fee, final_amount, status, coverage, finance_plan, entered_by, entered_at, \
     posted_at, approved_at, version, updated_at";

#[derive(Debug, Clone, FromRow)]
pub struct QuoteRow {
    pub id: Uuid,
    pub submission_id: Uuid,
    pub carrier_id: Uuid,
    pub carrier_quote: Decimal,
    pub premium_tax_percent: Option<Decimal>,
    pub premium_tax_amount: Decimal,
    pub policy_fee: Decimal,
    pub broker_fee: Decimal,
    pub final_amount: Decimal,
    pub status: String,
    pub coverage: JsonValue,
    pub finance_plan: Option<JsonValue>,
    pub entered_by: Uuid,
    pub entered_at: DateTime<Utc>,
    pub posted_at: Option<DateTime<Utc>>,
    pub approved_at: Option<DateTime<Utc>>,
    pub version: i32,
    pub updated_at: DateTime<Utc>,
}

impl QuoteRow {
    pub fn from_domain(quote: &Quote) -> Result<Self, DatabaseError> {
        let fees = quote.fees();
        Ok(Self {
            id: *quote.id().as_uuid(),
            submission_id: *quote.submission_id().as_uuid(),
            carrier_id: *quote.carrier_id().as_uuid(),
            carrier_quote: fees.carrier_quote().amount(),
            premium_tax_percent: fees.premium_tax_percent().map(Decimal::from),
            premium_tax_amount: fees.premium_tax_amount().amount(),
            policy_fee: fees.policy_fee().amount(),
            broker_fee: fees.broker_fee().amount(),
            final_amount: fees.final_amount().amount(),
            status: quote.status().as_str().to_string(),
            coverage: serde_json::to_value(quote.coverage())?,
            finance_plan: quote.finance_plan().map(serde_json::to_value).transpose()?,
            entered_by: *quote.entered_by().as_uuid(),
            entered_at: quote.entered_at(),
            posted_at: quote.posted_at(),
            approved_at: quote.approved_at(),
            version: i32::try_from(quote.version())
                .map_err(|_| DatabaseError::SerializationError("version out of range".to_string()))?,
            updated_at: quote.updated_at(),
        })
    }

    pub fn into_domain(self) -> Result<Quote, DatabaseError> {
        let corrupt = |e: String| DatabaseError::SerializationError(format!("quote {}: {e}", self.id));

        let status = self.status.parse().map_err(|e| corrupt(format!("{e}")))?;
        let version = u32::try_from(self.version).map_err(|_| corrupt("negative version".to_string()))?;
        let quote = Quote::restore(QuoteParts {
            id: QuoteId::from_uuid(self.id),
            submission_id: SubmissionId::from_uuid(self.submission_id),
            carrier_id: CarrierId::from_uuid(self.carrier_id),
            fees: FeeInputs {
                carrier_quote: self.carrier_quote,
                premium_tax_percent: self.premium_tax_percent,
                policy_fee: Some(self.policy_fee),
                broker_fee: Some(self.broker_fee),
            },
            status,
            coverage: serde_json::from_value(self.coverage.clone())?,
            finance_plan: self.finance_plan.clone().map(serde_json::from_value).transpose()?,
            entered_by: UserId::from_uuid(self.entered_by),
            entered_at: self.entered_at,
            posted_at: self.posted_at,
            approved_at: self.approved_at,
            version,
            updated_at: self.updated_at,
        })
        .map_err(|e| corrupt(e.to_string()))?;

        if quote.final_amount().amount() != self.final_amount {
            warn!(
                quote_id = %quote.id(),
                stored = %self.final_amount,
                recomputed = %quote.final_amount(),
                "Stored final amount differs from recomputed total"
            );
        }
        Ok(quote)
    }
}

#[derive(Debug, Clone)]
pub struct QuoteRepository {
    pool: PgPool,
}

impl QuoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: Uuid) -> Result<QuoteRow, DatabaseError> {
        sqlx::query_as::<_, QuoteRow>(&format!("SELECT {COLUMNS} FROM quotes WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Quote", id))
    }

    /// Newest first
    pub async fn find(&self, query: &QuoteQuery) -> Result<Vec<QuoteRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, QuoteRow>(&format!(
            "SELECT {COLUMNS} FROM quotes \
             WHERE ($1::uuid IS NULL OR submission_id = $1) \
               AND ($2::text IS NULL OR status = $2) \
             ORDER BY entered_at DESC \
             LIMIT $3"
        ))
        .bind(query.submission_id.map(|s| *s.as_uuid()))
        .bind(query.status.map(|s| s.as_str()))
        .bind(query.limit.map(i64::from))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// The approved (or later) quote of a submission, most recently approved first
    pub async fn find_active(&self, submission_id: Uuid) -> Result<Option<QuoteRow>, DatabaseError> {
        let row = sqlx::query_as::<_, QuoteRow>(&format!(
            "SELECT {COLUMNS} FROM quotes \
             WHERE submission_id = $1 AND status IN ('APPROVED', 'BIND_REQUESTED', 'BOUND') \
             ORDER BY approved_at DESC NULLS LAST \
             LIMIT 1"
        ))
        .bind(submission_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn insert(&self, conn: &mut PgConnection, row: &QuoteRow) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO quotes (
                id, submission_id, carrier_id, carrier_quote, premium_tax_percent,
                premium_tax_amount, policy_fee, broker_fee, final_amount, status,
                coverage, finance_plan, entered_by, entered_at, posted_at, approved_at,
                version, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            "#,
        )
        .bind(row.id)
        .bind(row.submission_id)
        .bind(row.carrier_id)
        .bind(row.carrier_quote)
        .bind(row.premium_tax_percent)
        .bind(row.premium_tax_amount)
        .bind(row.policy_fee)
        .bind(row.broker_fee)
        .bind(row.final_amount)
        .bind(&row.status)
        .bind(&row.coverage)
        .bind(&row.finance_plan)
        .bind(row.entered_by)
        .bind(row.entered_at)
        .bind(row.posted_at)
        .bind(row.approved_at)
        .bind(row.version)
        .bind(row.updated_at)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Version-checked update of every mutable column
    pub async fn update(&self, conn: &mut PgConnection, row: &QuoteRow) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE quotes SET
                carrier_quote = $3,
                premium_tax_percent = $4,
                premium_tax_amount = $5,
                policy_fee = $6,
                broker_fee = $7,
                final_amount = $8,
                status = $9,
                coverage = $10,
                finance_plan = $11,
                posted_at = $12,
                approved_at = $13,
                version = version + 1,
                updated_at = $14
            WHERE id = $1 AND version = $2
            "#,
        )
        .bind(row.id)
        .bind(row.version)
        .bind(row.carrier_quote)
        .bind(row.premium_tax_percent)
        .bind(row.premium_tax_amount)
        .bind(row.policy_fee)
        .bind(row.broker_fee)
        .bind(row.final_amount)
        .bind(&row.status)
        .bind(&row.coverage)
        .bind(&row.finance_plan)
        .bind(row.posted_at)
        .bind(row.approved_at)
        .bind(row.updated_at)
        .execute(conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::stale("Quote", row.id, row.version.unsigned_abs()));
        }
        Ok(())
    }
}
