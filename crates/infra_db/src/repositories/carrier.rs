//! Carrier repository

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use core_kernel::{CarrierId, Percent};
use domain_quote::Carrier;

use crate::error::DatabaseError;

#[derive(Debug, Clone, FromRow)]
pub struct CarrierRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub states_served: Vec<String>,
    pub industries: Vec<String>,
    pub wholesale_fee_percent: Decimal,
    pub created_at: DateTime<Utc>,
}

impl CarrierRow {
    pub fn from_domain(carrier: &Carrier) -> Self {
        Self {
            id: *carrier.id.as_uuid(),
            name: carrier.name.clone(),
            email: carrier.email.clone(),
            states_served: carrier.states_served.clone(),
            industries: carrier.industries.clone(),
            wholesale_fee_percent: carrier.wholesale_fee_percent.into(),
            created_at: carrier.created_at,
        }
    }

    pub fn into_domain(self) -> Result<Carrier, DatabaseError> {
        let wholesale_fee_percent = Percent::new(self.wholesale_fee_percent)
            .map_err(|e| DatabaseError::SerializationError(format!("carrier {}: {e}", self.id)))?;
        Ok(Carrier {
            id: CarrierId::from_uuid(self.id),
            name: self.name,
            email: self.email,
            states_served: self.states_served,
            industries: self.industries,
            wholesale_fee_percent,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CarrierRepository {
    pool: PgPool,
}

impl CarrierRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: Uuid) -> Result<CarrierRow, DatabaseError> {
        sqlx::query_as::<_, CarrierRow>(
            "SELECT id, name, email, states_served, industries, wholesale_fee_percent, created_at \
             FROM carriers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Carrier", id))
    }

    /// All carriers by name
    pub async fn list(&self) -> Result<Vec<CarrierRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, CarrierRow>(
            "SELECT id, name, email, states_served, industries, wholesale_fee_percent, created_at \
             FROM carriers ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn insert(&self, row: &CarrierRow) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO carriers (id, name, email, states_served, industries, wholesale_fee_percent, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(row.id)
        .bind(&row.name)
        .bind(&row.email)
        .bind(&row.states_served)
        .bind(&row.industries)
        .bind(row.wholesale_fee_percent)
        .bind(row.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
