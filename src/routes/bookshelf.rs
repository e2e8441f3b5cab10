//! Bookshelf routes: title-keyed books with case-insensitive lookups.
//!
//! Misses are never errors here. A title lookup that finds nothing answers
//! `null`, filters answer `[]`, and update/delete of an unknown title do
//! nothing.

use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use log::info;

use crate::models::{AuthorQuery, Book, CategoryQuery};
use crate::store::Bookshelf;

#[get("/books")]
pub async fn read_all_books(shelf: web::Data<Bookshelf>) -> impl Responder {
    HttpResponse::Ok().json(shelf.all())
}

/// `GET /books/?category=`
#[get("/books/")]
pub async fn read_category_by_query(
    shelf: web::Data<Bookshelf>,
    query: web::Query<CategoryQuery>,
) -> impl Responder {
    HttpResponse::Ok().json(shelf.by_category(&query.category))
}

#[get("/books/authors/query/")]
pub async fn read_books_by_author_query(
    shelf: web::Data<Bookshelf>,
    query: web::Query<AuthorQuery>,
) -> impl Responder {
    HttpResponse::Ok().json(shelf.by_author(&query.author_name))
}

#[get("/books/authors/{author_name}")]
pub async fn read_books_by_author(
    shelf: web::Data<Bookshelf>,
    author_name: web::Path<String>,
) -> impl Responder {
    HttpResponse::Ok().json(shelf.by_author(&author_name))
}

/// `GET /books/{author_name}/?category=`
#[get("/books/{author_name}/")]
pub async fn read_author_category_by_query(
    shelf: web::Data<Bookshelf>,
    author_name: web::Path<String>,
    query: web::Query<CategoryQuery>,
) -> impl Responder {
    HttpResponse::Ok().json(shelf.by_author_and_category(&author_name, &query.category))
}

/// Answers with the first matching book, or `null`.
#[get("/books/{book_title}")]
pub async fn read_book(shelf: web::Data<Bookshelf>, book_title: web::Path<String>) -> impl Responder {
    HttpResponse::Ok().json(shelf.find_by_title(&book_title))
}

#[post("/books/create_book")]
pub async fn create_book(shelf: web::Data<Bookshelf>, new_book: web::Json<Book>) -> impl Responder {
    let book = new_book.into_inner();
    info!("shelving {:?}", book.title);
    shelf.add(book.clone());
    HttpResponse::Created().json(book)
}

#[put("/books/update_book")]
pub async fn update_book(shelf: web::Data<Bookshelf>, updated_book: web::Json<Book>) -> impl Responder {
    let book = updated_book.into_inner();
    let title = book.title.clone();
    let replaced = shelf.update(book);
    info!("updated {} book(s) titled {:?}", replaced, title);
    HttpResponse::NoContent().finish()
}

#[delete("/books/delete_book/{book_title}")]
pub async fn delete_book(shelf: web::Data<Bookshelf>, book_title: web::Path<String>) -> impl Responder {
    if shelf.remove(&book_title).is_some() {
        info!("removed book titled {:?}", book_title.as_str());
    }
    HttpResponse::NoContent().finish()
}
