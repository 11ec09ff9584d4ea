use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};

use super::{StoreResult, TodoStore};
use crate::config::DatabaseConfig;
use crate::todo::Todo;

const COLUMNS: &str = "id, title, done, created_at, updated_at";

/// Idempotent schema setup, run in order at startup.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS todos (
        id BIGSERIAL PRIMARY KEY,
        title TEXT NOT NULL,
        done BOOLEAN NOT NULL DEFAULT FALSE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "ALTER TABLE todos ADD COLUMN IF NOT EXISTS title TEXT NOT NULL DEFAULT ''",
    "ALTER TABLE todos ADD COLUMN IF NOT EXISTS done BOOLEAN NOT NULL DEFAULT FALSE",
    "ALTER TABLE todos ADD COLUMN IF NOT EXISTS created_at TIMESTAMPTZ NOT NULL DEFAULT now()",
    "ALTER TABLE todos ADD COLUMN IF NOT EXISTS updated_at TIMESTAMPTZ NOT NULL DEFAULT now()",
    "CREATE INDEX IF NOT EXISTS todos_created_at_idx ON todos (created_at DESC, id DESC)",
];

/// PostgreSQL-backed store over a shared connection pool.
#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Open a pool against the configured database. Fails if no connection
    /// can be established within the configured timeout.
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.name)
            .ssl_mode(PgSslMode::Disable);
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout)
            .connect_with(options)
            .await?;
        tracing::info!(host = %config.host, database = %config.name, "connected to database");
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Ensure the `todos` table and all of its columns exist.
    pub async fn migrate(&self) -> StoreResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        tracing::info!("database schema is up to date");
        Ok(())
    }
}

impl TodoStore for PgStore {
    async fn insert(&self, title: String) -> StoreResult<Todo> {
        let sql = format!(
            "INSERT INTO todos (title, done, created_at, updated_at) \
             VALUES ($1, FALSE, now(), now()) RETURNING {COLUMNS}"
        );
        let todo = sqlx::query_as::<_, Todo>(&sql)
            .bind(title)
            .fetch_one(&self.pool)
            .await?;
        Ok(todo)
    }

    async fn find(&self, id: i64) -> StoreResult<Option<Todo>> {
        let sql = format!("SELECT {COLUMNS} FROM todos WHERE id = $1");
        let todo = sqlx::query_as::<_, Todo>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(todo)
    }

    async fn save(&self, todo: &Todo) -> StoreResult<Option<Todo>> {
        // now() is per transaction; bumping by one microsecond keeps
        // updated_at strictly increasing for back-to-back saves.
        let sql = format!(
            "UPDATE todos SET title = $2, done = $3, \
             updated_at = GREATEST(now(), updated_at + INTERVAL '1 microsecond') \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        let saved = sqlx::query_as::<_, Todo>(&sql)
            .bind(todo.id)
            .bind(&todo.title)
            .bind(todo.done)
            .fetch_optional(&self.pool)
            .await?;
        Ok(saved)
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> StoreResult<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM todos")
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(total).unwrap_or_default())
    }

    async fn range(&self, offset: u64, limit: u64) -> StoreResult<Vec<Todo>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM todos ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        );
        let todos = sqlx::query_as::<_, Todo>(&sql)
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .bind(i64::try_from(offset).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;
        Ok(todos)
    }
}

/// These run against a disposable database named by `DATABASE_URL`:
/// `cargo test -p todo-server -- --ignored`.
#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> PgStore {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let pool = PgPool::connect(&url).await.unwrap();
        let store = PgStore::from_pool(pool);
        store.migrate().await.unwrap();
        sqlx::query("TRUNCATE todos RESTART IDENTITY")
            .execute(&store.pool)
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    #[ignore]
    async fn crud_round_trip() {
        let store = store().await;

        let created = store.insert("Buy milk".to_string()).await.unwrap();
        assert!(!created.done);
        assert_eq!(created.created_at, created.updated_at);

        let mut fetched = store.find(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);

        fetched.done = true;
        let saved = store.save(&fetched).await.unwrap().unwrap();
        assert!(saved.done);
        assert_eq!(saved.created_at, created.created_at);
        assert!(saved.updated_at > created.updated_at);

        assert_eq!(store.count().await.unwrap(), 1);
        assert!(store.delete(created.id).await.unwrap());
        assert!(!store.delete(created.id).await.unwrap());
        assert!(store.find(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore]
    async fn migrate_is_idempotent() {
        let store = store().await;
        store.migrate().await.unwrap();
        store.migrate().await.unwrap();
    }

    #[tokio::test]
    #[ignore]
    async fn range_pages_newest_first() {
        let store = store().await;
        for i in 1..=25 {
            store.insert(format!("todo {i}")).await.unwrap();
        }
        let page = store.range(10, 10).await.unwrap();
        let titles: Vec<String> = page.into_iter().map(|t| t.title).collect();
        let expected: Vec<String> = (6..=15).rev().map(|i| format!("todo {i}")).collect();
        assert_eq!(titles, expected);
    }
}
