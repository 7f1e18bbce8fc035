use crate::config::DatabaseConfig;
use crate::error::ApiError;
use crate::models::proposal::SharedProposal;
use deadpool_postgres::{Config, Object, Pool, Runtime};
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use tracing::{error, info, warn};

/// Repository layer over the hosted PostgreSQL datastore. Holds a deadpool
/// `Pool` and exposes the handful of queries the handlers need.
#[derive(Clone)]
pub struct Database {
    pool: Pool,
}

impl Database {
    /// Builds the connection pool. Connections are established lazily, so
    /// this succeeds even when the datastore is unreachable; call
    /// [`Database::test_connection`] to probe connectivity.
    pub fn new(config: DatabaseConfig) -> Result<Self, ApiError> {
        info!("Creating PostgreSQL connection pool for host: {}:{}", config.host, config.port);

        let pool = Self::create_pool(config)?;
        Ok(Database { pool })
    }

    fn create_pool(config: DatabaseConfig) -> Result<Pool, ApiError> {
        let mut pg_config = Config::new();

        pg_config.host = Some(config.host);
        pg_config.port = Some(config.port);
        pg_config.dbname = Some(config.database);
        pg_config.user = Some(config.username);
        pg_config.password = Some(config.password);

        match config.ssl_mode.as_str() {
            "disable" => {
                pg_config.ssl_mode = Some(deadpool_postgres::SslMode::Disable);
            }
            "prefer" | "allow" => {
                pg_config.ssl_mode = Some(deadpool_postgres::SslMode::Prefer);
            }
            "require" | "verify-ca" | "verify-full" => {
                pg_config.ssl_mode = Some(deadpool_postgres::SslMode::Require);
            }
            _ => {
                warn!("Unknown SSL mode '{}', defaulting to 'require'", config.ssl_mode);
                pg_config.ssl_mode = Some(deadpool_postgres::SslMode::Require);
            }
        }

        pg_config.manager = Some(deadpool_postgres::ManagerConfig {
            recycling_method: deadpool_postgres::RecyclingMethod::Fast,
        });

        pg_config.pool = Some(deadpool_postgres::PoolConfig::new(config.max_connections as usize));

        // Hosted Postgres providers require TLS
        let tls_connector = TlsConnector::builder()
            .build()
            .map_err(|e| {
                error!("Failed to create TLS connector: {}", e);
                ApiError::Database(format!("TLS connector creation failed: {}", e))
            })?;
        let tls = MakeTlsConnector::new(tls_connector);

        pg_config.create_pool(Some(Runtime::Tokio1), tls)
            .map_err(|e| {
                error!("Failed to create connection pool: {}", e);
                ApiError::Database(format!("Connection pool creation failed: {}", e))
            })
    }

    async fn get_connection(&self) -> Result<Object, ApiError> {
        self.pool.get().await.map_err(ApiError::from)
    }

    /// `SELECT 1` probe used by the health endpoint.
    pub async fn health_check(&self) -> Result<(), ApiError> {
        let client = self.get_connection().await?;

        client.execute("SELECT 1", &[])
            .await
            .map_err(|e| {
                error!("Database health check failed: {}", e);
                ApiError::Database(format!("Health check failed: {}", e))
            })?;

        Ok(())
    }

    /// Startup connectivity probe. Same query as the health check, but logged
    /// loudly so a misconfigured deployment is visible immediately.
    pub async fn test_connection(&self) -> Result<(), ApiError> {
        let client = self.get_connection().await?;

        client.execute("SELECT 1", &[])
            .await
            .map_err(|e| {
                error!("Database connection test failed: {}", e);
                ApiError::Database(format!("Connection test failed: {}", e))
            })?;

        info!("Database connection test successful");
        Ok(())
    }

    /// Creates the tables this service reads and mutates. The schema is owned
    /// by the external datastore in production; this exists for local
    /// development only.
    pub async fn migrate(&self) -> Result<(), ApiError> {
        info!("Running database migrations");

        let client = self.get_connection().await?;

        let enable_uuid = "CREATE EXTENSION IF NOT EXISTS \"uuid-ossp\"";
        client.execute(enable_uuid, &[])
            .await
            .map_err(|e| {
                error!("Failed to enable UUID extension: {}", e);
                ApiError::Database(format!("UUID extension error: {}", e))
            })?;

        let leads_table = r#"
            CREATE TABLE IF NOT EXISTS leads (
                id TEXT PRIMARY KEY,
                prep_status TEXT NOT NULL DEFAULT 'pending',
                enrichment_status TEXT NOT NULL DEFAULT 'pending',
                prep_summary TEXT,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#;

        client.execute(leads_table, &[])
            .await
            .map_err(|e| {
                error!("Failed to create leads table: {}", e);
                ApiError::Database(format!("Leads table creation failed: {}", e))
            })?;

        let notes_table = r#"
            CREATE TABLE IF NOT EXISTS lead_prep_notes (
                id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
                lead_id TEXT NOT NULL REFERENCES leads(id) ON DELETE CASCADE,
                is_auto_generated BOOLEAN NOT NULL DEFAULT FALSE,
                content TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#;

        client.execute(notes_table, &[])
            .await
            .map_err(|e| {
                error!("Failed to create lead_prep_notes table: {}", e);
                ApiError::Database(format!("Notes table creation failed: {}", e))
            })?;

        let notes_lead_index =
            "CREATE INDEX IF NOT EXISTS idx_lead_prep_notes_lead_id ON lead_prep_notes(lead_id)";
        client.execute(notes_lead_index, &[])
            .await
            .map_err(|e| {
                error!("Failed to create lead_prep_notes lead_id index: {}", e);
                ApiError::Database(format!("Notes lead_id index creation failed: {}", e))
            })?;

        let proposals_table = r#"
            CREATE TABLE IF NOT EXISTS shared_proposals (
                id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
                share_token TEXT UNIQUE NOT NULL,
                is_public BOOLEAN NOT NULL DEFAULT FALSE,
                password_hash TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#;

        client.execute(proposals_table, &[])
            .await
            .map_err(|e| {
                error!("Failed to create shared_proposals table: {}", e);
                ApiError::Database(format!("Proposals table creation failed: {}", e))
            })?;

        let proposals_token_index =
            "CREATE INDEX IF NOT EXISTS idx_shared_proposals_share_token ON shared_proposals(share_token)";
        client.execute(proposals_token_index, &[])
            .await
            .map_err(|e| {
                error!("Failed to create shared_proposals share_token index: {}", e);
                ApiError::Database(format!("Proposals share_token index creation failed: {}", e))
            })?;

        info!("Database migrations completed successfully");
        Ok(())
    }

    // Lead preparation reset operations

    /// Deletes auto-generated preparation notes, scoped to one lead when a
    /// `lead_id` is given and unscoped otherwise. Manually authored notes
    /// (`is_auto_generated = false`) are never touched.
    pub async fn delete_auto_generated_notes(&self, lead_id: Option<&str>) -> Result<u64, ApiError> {
        let client = self.get_connection().await?;

        let deleted = match lead_id {
            Some(lead_id) => {
                let query =
                    "DELETE FROM lead_prep_notes WHERE is_auto_generated = TRUE AND lead_id = $1";
                client.execute(query, &[&lead_id]).await.map_err(ApiError::from)?
            }
            None => {
                let query = "DELETE FROM lead_prep_notes WHERE is_auto_generated = TRUE";
                client.execute(query, &[]).await.map_err(ApiError::from)?
            }
        };

        info!(
            deleted,
            lead_id = lead_id.unwrap_or("<all>"),
            "Deleted auto-generated prep notes"
        );
        Ok(deleted)
    }

    /// Resets matching leads for reprocessing: both status fields back to
    /// `pending`, summary cleared, `updated_at` refreshed in the same UPDATE.
    /// Returns the affected ids so the caller can report a count. Without a
    /// `lead_id` this touches every lead; that blast radius is deliberate.
    pub async fn reset_lead_prep(&self, lead_id: Option<&str>) -> Result<Vec<String>, ApiError> {
        let client = self.get_connection().await?;

        let rows = match lead_id {
            Some(lead_id) => {
                let query = r#"
                    UPDATE leads
                    SET prep_status = 'pending',
                        enrichment_status = 'pending',
                        prep_summary = NULL,
                        updated_at = NOW()
                    WHERE id = $1
                    RETURNING id
                "#;
                client.query(query, &[&lead_id]).await.map_err(ApiError::from)?
            }
            None => {
                let query = r#"
                    UPDATE leads
                    SET prep_status = 'pending',
                        enrichment_status = 'pending',
                        prep_summary = NULL,
                        updated_at = NOW()
                    RETURNING id
                "#;
                client.query(query, &[]).await.map_err(ApiError::from)?
            }
        };

        let ids: Vec<String> = rows.iter().map(|row| row.get(0)).collect();

        info!(reset_count = ids.len(), "Reset lead preparation status");
        Ok(ids)
    }

    // Shared proposal operations

    /// Resolves a proposal by share token, gated on `is_public`. Returns
    /// `None` when zero or more than one row matches, so private, missing,
    /// and ambiguous tokens are indistinguishable to the caller.
    pub async fn find_public_proposal(&self, share_token: &str) -> Result<Option<SharedProposal>, ApiError> {
        let client = self.get_connection().await?;
        let query = r#"
            SELECT id, share_token, is_public, password_hash, created_at
            FROM shared_proposals
            WHERE share_token = $1 AND is_public = TRUE
        "#;

        let rows = client.query(query, &[&share_token])
            .await
            .map_err(ApiError::from)?;

        if rows.len() != 1 {
            return Ok(None);
        }

        let row = &rows[0];
        Ok(Some(SharedProposal {
            id: row.get(0),
            share_token: row.get(1),
            is_public: row.get(2),
            password_hash: row.get(3),
            created_at: row.get(4),
        }))
    }
}
