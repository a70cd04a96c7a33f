use std::sync::Arc;

use actix_web::{App, HttpServer, middleware::from_fn, web};
use tracing::info;

use feedbacker::classify::{ClassifyMiddleware, MobileClassifier};
use feedbacker::config::StaticConfig;
use feedbacker::services::{AppStartTime, FeedbackService, HealthService};
use feedbacker::storage::{self, OpinionStore, SeaOrmStore};
use feedbacker::system;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = StaticConfig::load();
    let _log_guard = system::init_logging(&config.logging);

    let db = storage::connect(&config.database).await?;
    storage::run_migrations(&db).await?;

    let store: Arc<dyn OpinionStore> = Arc::new(SeaOrmStore::new(db));
    let classifier = web::Data::new(MobileClassifier::new(
        config.feedback.mobile_cookie.clone(),
    ));
    let start_time = web::Data::new(AppStartTime {
        start_datetime: chrono::Utc::now(),
    });

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting server at http://{}", bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(store.clone()))
            .app_data(classifier.clone())
            .app_data(start_time.clone())
            .wrap(from_fn(ClassifyMiddleware::classify))
            .route("/feedback", web::get().to(FeedbackService::show_form))
            .route("/feedback", web::post().to(FeedbackService::submit))
            .route(
                "/feedback/{formname}",
                web::get().to(FeedbackService::show_form),
            )
            .route(
                "/feedback/{formname}",
                web::post().to(FeedbackService::submit),
            )
            .route("/thanks", web::get().to(FeedbackService::thanks))
            .route("/health", web::get().to(HealthService::health_check))
    })
    .bind(bind_address)?
    .run()
    .await?;

    Ok(())
}
