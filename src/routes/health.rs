use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

use crate::db::DbSession;
use crate::error::AppError;

/// Which service answered; registered by each service's route config.
#[derive(Debug, Clone, Copy)]
pub struct ServiceName(pub &'static str);

/// Health check endpoint
///
/// Returns the service name and the current timestamp.
#[get("/health")]
pub async fn health(service: Option<web::Data<ServiceName>>) -> impl Responder {
    let name = service.map(|s| s.0).unwrap_or(env!("CARGO_PKG_NAME"));
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": name,
        "timestamp": Utc::now()
    }))
}

/// Database check for the todo service: a round trip through one session.
#[get("/health/db")]
pub async fn database(mut session: DbSession) -> Result<impl Responder, AppError> {
    let (one,): (i64,) = sqlx::query_as("SELECT 1").fetch_one(session.conn()).await?;
    let status = if one == 1 { "ok" } else { "degraded" };
    Ok(HttpResponse::Ok().json(json!({
        "status": status,
        "timestamp": Utc::now()
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test;

    #[actix_web::test]
    async fn test_health_endpoint() {
        let app = test::init_service(
            actix_web::App::new()
                .app_data(web::Data::new(ServiceName("catalog")))
                .service(health),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let json: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "catalog");
        assert!(json["timestamp"].is_string());
    }

    #[actix_web::test]
    async fn test_database_health() {
        let pool = crate::db::connect("sqlite::memory:").await.unwrap();
        let app = test::init_service(
            actix_web::App::new()
                .app_data(web::Data::new(pool))
                .service(database),
        )
        .await;

        let req = test::TestRequest::get().uri("/health/db").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }
}
