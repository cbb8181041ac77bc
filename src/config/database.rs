use crate::config::parameter;
use async_trait::async_trait;
use sqlx::{pool::PoolOptions, Error, Pool, Postgres};
use tracing::info;

pub struct Database {
    pool: Pool<Postgres>,
}

#[async_trait]
pub trait DatabaseTrait {
    async fn init() -> Result<Self, Error>
    where
        Self: Sized;
    fn get_pool(&self) -> &Pool<Postgres>;
}

#[async_trait]
impl DatabaseTrait for Database {
    async fn init() -> Result<Self, Error> {
        let database_url = parameter::get("DATABASE_URL");

        let max_connections = parameter::get_u32("DB_MAX_CONNECTIONS");
        let acquire_timeout_seconds = parameter::get_i64("DB_ACQUIRE_TIMEOUT_SECONDS") as u64;

        let pool = PoolOptions::<Postgres>::new()
            .max_connections(max_connections)
            .acquire_timeout(std::time::Duration::from_secs(acquire_timeout_seconds))
            .connect(&database_url)
            .await?;

        // The uniqueness constraints on users/sessions must exist before the
        // service takes traffic; signup correctness relies on them.
        sqlx::migrate!("./migrations").run(&pool).await?;

        info!(
            "Database pool configured: max={}, acquire_timeout={}s",
            max_connections, acquire_timeout_seconds
        );

        Ok(Self { pool })
    }

    fn get_pool(&self) -> &Pool<Postgres> {
        &self.pool
    }
}
