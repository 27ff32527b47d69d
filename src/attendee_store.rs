use crate::configuration::DatabaseSettings;
use crate::domain::{AttendeeEmail, AttendeeRecord};
use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

/// Where attendee records live. Records are only ever created, never updated.
#[async_trait]
pub trait AttendeeStore: Send + Sync {
    async fn email_exists(&self, email: &AttendeeEmail) -> Result<bool, anyhow::Error>;

    async fn create(&self, record: &AttendeeRecord) -> Result<(), anyhow::Error>;
}

pub fn get_connection_pool(db_configuration: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(db_configuration.acquire_timeout())
        .connect_lazy_with(db_configuration.connect_options())
}

#[derive(Clone, Debug)]
pub struct PostgresAttendeeStore {
    db: PgPool,
}

impl PostgresAttendeeStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AttendeeStore for PostgresAttendeeStore {
    #[tracing::instrument(name = "Checking for an existing attendee", skip(self))]
    async fn email_exists(&self, email: &AttendeeEmail) -> Result<bool, anyhow::Error> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM attendees WHERE email = $1)",
        )
        .bind(email.as_ref())
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            e
        })
        .context("Failed to check whether the email is already registered")?;
        Ok(exists)
    }

    #[tracing::instrument(
        name = "Saving new attendee details in the database",
        skip(self, record),
        fields(attendee_email = %record.email)
    )]
    async fn create(&self, record: &AttendeeRecord) -> Result<(), anyhow::Error> {
        sqlx::query(
            r#"
            INSERT INTO attendees
                (id, first_name, last_name, email, address, address_verified, registered_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&record.first_name)
        .bind(&record.last_name)
        .bind(&record.email)
        .bind(record.address.as_deref())
        .bind(record.address_verified)
        .bind(Utc::now())
        .execute(&self.db)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            e
        })
        .context("Failed to insert the attendee record")?;
        Ok(())
    }
}
