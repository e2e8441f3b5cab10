use std::io;

use actix_web::{middleware::Logger, web, App, HttpServer};
use libris::{routes, store::Catalog, Config};
use log::info;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let catalog = web::Data::new(Catalog::seeded());

    info!("Starting catalog service at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(catalog.clone())
            .wrap(routes::cors())
            .wrap(Logger::default())
            .configure(routes::catalog_config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
