use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use bventy_backend::activity::ActivityLog;
use bventy_backend::auth::middleware::JwtSecret;
use bventy_backend::clock::SystemClock;
use bventy_backend::config::Config;
use bventy_backend::create_pool;
use bventy_backend::handlers;
use bventy_backend::services::QuoteService;
use bventy_backend::storage::SupabaseStorage;
use dotenv::dotenv;
use migration::{Migrator, MigratorTrait};
use std::io;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = Config::from_env().map_err(io::Error::other)?;

    let db = create_pool(&config.database_url)
        .await
        .map_err(io::Error::other)?;
    tracing::info!("Connected to database");

    if config.run_migrations {
        Migrator::up(&db, None).await.map_err(io::Error::other)?;
        tracing::info!("Migrations applied");
    }

    // Activity entries are written by a background task so requests never wait on them.
    let (activity_log, _activity_writer) = ActivityLog::spawn(db.clone());

    let storage = SupabaseStorage::new(
        &config.supabase_url,
        &config.supabase_service_key,
        &config.storage_bucket,
        config.signed_url_ttl,
    );

    let quote_service = web::Data::new(QuoteService::new(
        db.clone(),
        Arc::new(activity_log),
        Arc::new(storage),
        Arc::new(SystemClock),
    ));
    let db_data = web::Data::new(db);
    let jwt_secret = web::Data::new(JwtSecret(config.jwt_secret.clone()));

    let bind_addr = config.bind_addr();
    tracing::info!("Server running at http://{bind_addr}");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(db_data.clone())
            .app_data(jwt_secret.clone())
            .app_data(quote_service.clone())
            .app_data(handlers::json_config())
            .app_data(handlers::path_config())
            .app_data(handlers::query_config())
            .service(web::scope("/api").configure(handlers::init_routes))
    })
    .bind(&bind_addr)?
    .run()
    .await
}
