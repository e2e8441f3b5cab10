use std::io;

use actix_web::{middleware::Logger, web, App, HttpServer};
use chrono::Duration;
use libris::{
    auth::{PasswordHasher, TokenKeys},
    db, routes, Config,
};
use log::{info, warn};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let secret = config
        .jwt_secret()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let keys = web::Data::new(TokenKeys::new(secret, Duration::minutes(config.token_ttl_minutes)));
    let hasher = web::Data::new(PasswordHasher::new(config.bcrypt_cost));
    let pool = db::connect(&config.database_url)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    let pool = web::Data::new(pool);

    let require_auth = config.require_auth;
    if !require_auth {
        warn!("REQUIRE_AUTH is off: todo routes accept anonymous requests");
    }

    info!("Starting todo service at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(pool.clone())
            .app_data(keys.clone())
            .app_data(hasher.clone())
            .wrap(routes::cors())
            .wrap(Logger::default())
            .configure(routes::todo_config(require_auth))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
