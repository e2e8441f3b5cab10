pub mod book;
pub mod catalog;
pub mod todo;
pub mod user;

pub use book::{AuthorQuery, Book, CategoryQuery};
pub use catalog::{BookIdPath, BookRequest, CatalogBook, PublishedDatePath, RatingQuery};
pub use todo::{Todo, TodoIdPath, TodoRequest};
pub use user::{CreateUserRequest, User, UserResponse};
