#![doc = "The `libris` library crate."]
#![doc = ""]
#![doc = "Domain models, in-memory stores, the SQLite-backed todo store, token"]
#![doc = "authentication, routing and error handling for the three `libris` services:"]
#![doc = "`bookshelf`, `catalog` and `todos`. Each binary under `src/bin` builds its"]
#![doc = "actix `App` from the route config exported by [`routes`]."]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod models;
pub mod routes;
pub mod store;

pub use crate::config::Config;
pub use crate::error::AppError;
