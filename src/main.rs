use std::{io, path::PathBuf, sync::Arc, time::Duration};
use actix_web::{middleware::Logger, web, App, HttpServer};
use segreto_backend::{
    builtins::{media::LocalMediaStorage, mongo::MongoDB},
    config::{Config, DatabaseBackend},
    routes,
    service,
    store::{MemoryStore, MongoStore, Store},
    AppState,
};

fn startup_error<E: std::fmt::Display>(error: E) -> io::Error {
    log::error!("{}", error);
    io::Error::new(io::ErrorKind::Other, error.to_string())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::load().map_err(startup_error)?;

    let store: Arc<dyn Store> = match config.database_backend {
        DatabaseBackend::MongoDB => {
            let mongo = MongoDB::init(&config.mongodb_uri, &config.mongodb_database)
                .await
                .map_err(startup_error)?;
            Arc::new(MongoStore::new(mongo).await.map_err(startup_error)?)
        },
        DatabaseBackend::Memory => {
            log::warn!("Using the in-memory store, data will not survive a restart");
            Arc::new(MemoryStore::new())
        },
    };

    let media = Arc::new(LocalMediaStorage::new(PathBuf::from(&config.upload_dir)));
    let state = web::Data::new(AppState::new(store.clone(), media, &config.jwt_secret));

    let period = Duration::from_secs(config.poll_close_interval_secs.max(1));
    tokio::spawn(service::poll::run_scheduler(store, period));
    log::info!("Poll closer scheduled every {} seconds", period.as_secs());

    log::info!("Server running on http://0.0.0.0:{}", config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(routes::configure)
    })
    .bind(("0.0.0.0", config.port))?
    .run()
    .await
}
