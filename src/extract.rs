use std::ops::Deref;

use actix_web::dev::Payload;
use actix_web::{web, Error as ActixError, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use validator::Validate;

use crate::error::AppError;

/// Runs `validator` rules on an extracted value before the handler sees it.
///
/// Wraps any extractor that derefs to a `Validate` type, e.g.
/// `Validated<web::Json<BookRequest>>` or `Validated<web::Path<BookIdPath>>`.
/// Deserialization failures keep the inner extractor's status; constraint
/// violations become `AppError::ValidationError` (422).
#[derive(Debug)]
pub struct Validated<E>(pub E);

impl<E> Validated<E> {
    pub fn into_inner(self) -> E {
        self.0
    }
}

impl<E> Deref for Validated<E> {
    type Target = E;

    fn deref(&self) -> &E {
        &self.0
    }
}

impl<E> FromRequest for Validated<E>
where
    E: FromRequest + Deref + 'static,
    E::Target: Validate,
    E::Future: 'static,
{
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let extract = E::from_request(req, payload);
        Box::pin(async move {
            let value = extract.await.map_err(Into::<ActixError>::into)?;
            value.deref().validate().map_err(AppError::from)?;
            Ok::<_, ActixError>(Validated(value))
        })
    }
}

/// Registers error handlers so that a body, path, query or form which fails to
/// deserialize is answered with 422, the same as a constraint violation.
pub fn unprocessable_input(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| unprocessable(err)))
        .app_data(web::PathConfig::default().error_handler(|err, _req| unprocessable(err)))
        .app_data(web::QueryConfig::default().error_handler(|err, _req| unprocessable(err)))
        .app_data(web::FormConfig::default().error_handler(|err, _req| unprocessable(err)));
}

fn unprocessable(err: impl std::fmt::Display) -> ActixError {
    AppError::ValidationError(err.to_string()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookIdPath, RatingQuery, TodoIdPath, TodoRequest};
    use actix_web::http::StatusCode;
    use actix_web::{test, web};
    use serde_json::json;

    #[actix_rt::test]
    async fn test_valid_body_is_extracted() {
        let (req, mut payload) = test::TestRequest::post()
            .set_json(json!({
                "title": "Water plants",
                "description": "All of them",
                "priority": 2,
                "complete": false
            }))
            .to_http_parts();

        let extracted = Validated::<web::Json<TodoRequest>>::from_request(&req, &mut payload)
            .await
            .unwrap();
        assert_eq!(extracted.title, "Water plants");
    }

    #[actix_rt::test]
    async fn test_constraint_violation_is_unprocessable() {
        let (req, mut payload) = test::TestRequest::post()
            .set_json(json!({
                "title": "Water plants",
                "description": "All of them",
                "priority": 9,
                "complete": false
            }))
            .to_http_parts();

        let err = Validated::<web::Json<TodoRequest>>::from_request(&req, &mut payload)
            .await
            .unwrap_err();
        assert_eq!(err.as_response_error().status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[actix_rt::test]
    async fn test_malformed_body_is_unprocessable() {
        let app = test::init_service(
            actix_web::App::new()
                .configure(unprocessable_input)
                .route(
                    "/todos/{todo_id}",
                    web::put().to(
                        |path: Validated<web::Path<TodoIdPath>>, body: Validated<web::Json<TodoRequest>>| async move {
                            format!("{}:{}", path.todo_id, body.title)
                        },
                    ),
                )
                .route(
                    "/search",
                    web::get().to(|query: web::Query<RatingQuery>| async move { query.book_rating.to_string() }),
                ),
        )
        .await;

        let cases = [
            test::TestRequest::put()
                .uri("/todos/1")
                .set_json(json!({ "title": "Missing the rest" }))
                .to_request(),
            test::TestRequest::put()
                .uri("/todos/1")
                .set_json(json!({ "title": "Wrong type", "description": "ok", "priority": "high", "complete": false }))
                .to_request(),
            test::TestRequest::put()
                .uri("/todos/abc")
                .set_json(json!({ "title": "Bad id", "description": "ok", "priority": 1, "complete": false }))
                .to_request(),
            test::TestRequest::get().uri("/search?book_rating=x").to_request(),
            test::TestRequest::get().uri("/search").to_request(),
        ];
        for req in cases {
            let uri = req.uri().to_string();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY, "{}", uri);
        }

        let req = test::TestRequest::put()
            .uri("/todos/3")
            .set_json(json!({ "title": "Fine", "description": "ok!", "priority": 1, "complete": false }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(test::read_body(resp).await, "3:Fine");
    }

    #[actix_rt::test]
    async fn test_path_params_are_validated() {
        let req = test::TestRequest::default()
            .param("book_id", "0")
            .to_http_request();

        let err = Validated::<web::Path<BookIdPath>>::extract(&req).await.unwrap_err();
        assert_eq!(err.as_response_error().status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
