//! In-memory stores backing the two catalog services.
//!
//! Each store owns its collection behind a single lock and is shared across
//! actix workers through `web::Data`.

pub mod bookshelf;
pub mod catalog;

pub use bookshelf::Bookshelf;
pub use catalog::Catalog;
