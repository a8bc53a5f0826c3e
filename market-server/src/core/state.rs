use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::services::SmsService;
use crate::utils::{AppError, AppResult};

/// Server state — shared handles for every request handler
///
/// Cloning is cheap: the pool and services are reference-counted internally.
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | config | Config | Immutable configuration |
/// | pool | SqlitePool | SQLite connection pool |
/// | jwt_service | Arc<JwtService> | Bearer token validation |
/// | sms | SmsService | Outbound buyer notifications |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub jwt_service: Arc<JwtService>,
    pub sms: SmsService,
}

impl ServerState {
    pub fn new(
        config: Config,
        pool: SqlitePool,
        jwt_service: Arc<JwtService>,
        sms: SmsService,
    ) -> Self {
        Self {
            config,
            pool,
            jwt_service,
            sms,
        }
    }

    /// Initialize server state
    ///
    /// 1. Ensure the work directory structure exists
    /// 2. Open the database (work_dir/database/market.db) and run migrations
    /// 3. Construct services (JWT, SMS)
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| AppError::internal(format!("Failed to create work directory: {e}")))?;

        let db_path = config.database_dir().join("market.db");
        let db_service = DbService::new(&db_path.to_string_lossy()).await?;

        let jwt_service = Arc::new(JwtService::new(config.jwt.clone()));
        let sms = SmsService::new(config.sms_gateway_url.clone());

        Ok(Self::new(config.clone(), db_service.pool, jwt_service, sms))
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
