pub mod auth;
pub mod bookshelf;
pub mod catalog;
pub mod health;
pub mod todos;

use actix_cors::Cors;
use actix_web::middleware::Condition;
use actix_web::web;

use crate::auth::AuthMiddleware;
use crate::extract;
use health::ServiceName;

/// Permissive CORS shared by all three services.
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600)
}

/// Bookshelf service. Expects `web::Data<Bookshelf>` on the app.
pub fn bookshelf_config(cfg: &mut web::ServiceConfig) {
    extract::unprocessable_input(cfg);
    cfg.app_data(web::Data::new(ServiceName("bookshelf")))
        .service(health::health)
        .service(bookshelf::read_all_books)
        .service(bookshelf::read_category_by_query)
        .service(bookshelf::read_books_by_author_query)
        .service(bookshelf::read_books_by_author)
        .service(bookshelf::read_author_category_by_query)
        .service(bookshelf::create_book)
        .service(bookshelf::update_book)
        .service(bookshelf::delete_book)
        .service(bookshelf::read_book);
}

/// Catalog service. Expects `web::Data<Catalog>` on the app.
pub fn catalog_config(cfg: &mut web::ServiceConfig) {
    extract::unprocessable_input(cfg);
    cfg.app_data(web::Data::new(ServiceName("catalog")))
        .service(health::health)
        .service(catalog::read_all_books)
        .service(catalog::read_books_by_rating)
        .service(catalog::read_books_by_published_date)
        .service(catalog::create_book)
        .service(catalog::update_book)
        .service(catalog::read_book)
        .service(catalog::delete_book);
}

/// Todo service. Expects `web::Data` for the `SqlitePool`, `TokenKeys` and
/// `PasswordHasher` on the app.
///
/// With `require_auth` the todo routes sit behind the bearer-token gate; the
/// auth and health routes never do.
pub fn todo_config(require_auth: bool) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        extract::unprocessable_input(cfg);
        cfg.app_data(web::Data::new(ServiceName("todos")))
            .service(health::health)
            .service(health::database)
            .service(
                web::scope("/auth")
                    .service(auth::create_user)
                    .service(auth::login_for_access_token),
            )
            .service(
                web::scope("/todos")
                    .wrap(Condition::new(require_auth, AuthMiddleware))
                    .service(todos::read_all)
                    .service(todos::create_todo)
                    .service(todos::read_todo)
                    .service(todos::update_todo)
                    .service(todos::delete_todo),
            );
    }
}
