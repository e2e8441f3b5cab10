use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use log::info;

use crate::error::AppError;
use crate::extract::Validated;
use crate::models::{BookIdPath, BookRequest, PublishedDatePath, RatingQuery};
use crate::store::Catalog;

fn item_not_found() -> AppError {
    AppError::NotFound("Item not found".into())
}

#[get("/books")]
pub async fn read_all_books(catalog: web::Data<Catalog>) -> impl Responder {
    HttpResponse::Ok().json(catalog.all())
}

/// Retrieves one book by id.
///
/// ## Responses:
/// - `200 OK`: the book.
/// - `404 Not Found`: no book has that id.
/// - `422 Unprocessable Entity`: `book_id` is below 1.
#[get("/books/{book_id}")]
pub async fn read_book(
    catalog: web::Data<Catalog>,
    path: Validated<web::Path<BookIdPath>>,
) -> Result<impl Responder, AppError> {
    let book = catalog.get(path.book_id).ok_or_else(item_not_found)?;
    Ok(HttpResponse::Ok().json(book))
}

/// `GET /books/?book_rating=`, rating between 1 and 5.
#[get("/books/")]
pub async fn read_books_by_rating(
    catalog: web::Data<Catalog>,
    query: Validated<web::Query<RatingQuery>>,
) -> impl Responder {
    HttpResponse::Ok().json(catalog.by_rating(query.book_rating))
}

#[get("/books_date/{published_date}")]
pub async fn read_books_by_published_date(
    catalog: web::Data<Catalog>,
    path: Validated<web::Path<PublishedDatePath>>,
) -> impl Responder {
    HttpResponse::Ok().json(catalog.by_published_date(path.published_date))
}

/// Creates a book under the next free id.
///
/// Any `id` in the body is ignored. Responds `201 Created` with the stored
/// book so the caller learns its id.
#[post("/create_book")]
pub async fn create_book(
    catalog: web::Data<Catalog>,
    book_request: Validated<web::Json<BookRequest>>,
) -> impl Responder {
    let book = catalog.create(book_request.into_inner().into_inner());
    info!("catalogued book {} ({:?})", book.id, book.title);
    HttpResponse::Created().json(book)
}

/// Replaces the book whose id is given in the body.
///
/// ## Responses:
/// - `204 No Content`: replaced.
/// - `404 Not Found`: the body has no `id`, or no book has it.
/// - `422 Unprocessable Entity`: a field breaks its constraint.
#[put("/books/update_book")]
pub async fn update_book(
    catalog: web::Data<Catalog>,
    book_request: Validated<web::Json<BookRequest>>,
) -> Result<impl Responder, AppError> {
    let request = book_request.into_inner().into_inner();
    let id = request.id.ok_or_else(item_not_found)?;
    catalog.update(id, request).ok_or_else(item_not_found)?;
    info!("updated book {}", id);
    Ok(HttpResponse::NoContent().finish())
}

#[delete("/books/{book_id}")]
pub async fn delete_book(
    catalog: web::Data<Catalog>,
    path: Validated<web::Path<BookIdPath>>,
) -> Result<impl Responder, AppError> {
    let removed = catalog.delete(path.book_id).ok_or_else(item_not_found)?;
    info!("deleted book {} ({:?})", removed.id, removed.title);
    Ok(HttpResponse::NoContent().finish())
}
