//! Relational store for the todo service.
//!
//! Todos and users live in SQLite behind a `sqlx` pool. Handlers never touch
//! the pool directly: they take a [`DbSession`], which holds one pooled
//! connection for the lifetime of the request and hands it back when dropped.

use std::str::FromStr;

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use log::{debug, info};
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqliteConnection, SqlitePool};

use crate::error::AppError;

const MAX_CONNECTIONS: u32 = 5;

/// Opens the pool and brings the schema up to date.
///
/// An in-memory URL gets a single connection that never expires, otherwise
/// every new connection would see its own empty database.
pub async fn connect(database_url: &str) -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let in_memory = database_url.contains(":memory:");
    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(MAX_CONNECTIONS)
    };

    let pool = pool_options.connect_with(options).await?;
    info!("Connected to SQLite database at {}", database_url);

    sqlx::migrate!("./migrations").run(&pool).await?;
    debug!("Migrations applied");

    Ok(pool)
}

/// One pooled connection, scoped to a single request.
///
/// Extracted from the `web::Data<SqlitePool>` registered on the app. The
/// connection goes back to the pool when the session is dropped, whether the
/// handler returned a response, an error, or unwound.
pub struct DbSession {
    conn: PoolConnection<Sqlite>,
}

impl DbSession {
    pub async fn acquire(pool: &SqlitePool) -> Result<Self, AppError> {
        let conn = pool.acquire().await?;
        debug!("db session acquired");
        Ok(Self { conn })
    }

    pub fn conn(&mut self) -> &mut SqliteConnection {
        &mut self.conn
    }
}

impl Drop for DbSession {
    fn drop(&mut self) {
        debug!("db session released");
    }
}

impl FromRequest for DbSession {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let pool = req.app_data::<web::Data<SqlitePool>>().cloned();
        Box::pin(async move {
            match pool {
                Some(pool) => DbSession::acquire(pool.get_ref()).await,
                None => Err(AppError::InternalServerError(
                    "Database pool is not registered on the app".into(),
                )),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test;

    #[actix_rt::test]
    async fn test_memory_database_survives_across_sessions() {
        let pool = connect("sqlite::memory:").await.unwrap();

        {
            let mut session = DbSession::acquire(&pool).await.unwrap();
            sqlx::query(
                "INSERT INTO todos (title, description, priority, complete) VALUES ('a', 'b', 1, 0)",
            )
            .execute(session.conn())
            .await
            .unwrap();
        }

        let mut session = DbSession::acquire(&pool).await.unwrap();
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM todos")
            .fetch_one(session.conn())
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[actix_rt::test]
    async fn test_session_released_on_drop() {
        let pool = connect("sqlite::memory:").await.unwrap();

        let session = DbSession::acquire(&pool).await.unwrap();
        assert_eq!(pool.num_idle(), 0);
        drop(session);

        // The single connection is usable again once the guard is gone.
        let reacquired = DbSession::acquire(&pool).await;
        assert!(reacquired.is_ok());
    }

    #[actix_rt::test]
    async fn test_extractor_without_pool_is_internal_error() {
        let req = test::TestRequest::default().to_http_request();
        let result = DbSession::extract(&req).await;
        assert!(matches!(result, Err(AppError::InternalServerError(_))));
    }

    #[actix_rt::test]
    async fn test_extractor_uses_registered_pool() {
        let pool = connect("sqlite::memory:").await.unwrap();
        let req = test::TestRequest::default()
            .app_data(web::Data::new(pool))
            .to_http_request();

        let mut session = DbSession::extract(&req).await.unwrap();
        let (one,): (i64,) = sqlx::query_as("SELECT 1")
            .fetch_one(session.conn())
            .await
            .unwrap();
        assert_eq!(one, 1);
    }
}
