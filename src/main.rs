use actix_web::{App, HttpServer, middleware::from_fn, web};
use std::sync::Arc;
use tokio::time::Duration;
use tracing::info;

use smartlink::config::Config;
use smartlink::middleware::AuthMiddleware;
use smartlink::services::{AppStartTime, HealthService, LinkService, RedirectService};
use smartlink::storages::StorageFactory;
use smartlink::storages::click::global::{get_click_manager, set_global_click_manager};
use smartlink::storages::click::{ClickManager, StorageSink};
use smartlink::system;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    dotenvy::dotenv().ok();
    let config = Config::from_env();
    let _log_guard = system::init_logging(&config);

    let storage = match StorageFactory::create(&config) {
        Ok(storage) => storage,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            return Err(std::io::Error::other(e.format_simple()));
        }
    };
    info!(
        "Using storage backend: {}",
        storage.get_backend_name().await
    );

    // click accounting: buffered in memory, flushed periodically
    let sink = Arc::new(StorageSink::new(storage.clone()));
    let click_manager = Arc::new(ClickManager::new(
        sink,
        Duration::from_secs(config.click_flush_interval),
    ));
    set_global_click_manager(click_manager.clone());
    {
        let manager = click_manager.clone();
        tokio::spawn(async move {
            manager.start_background_task().await;
        });
    }

    if config.api_token.is_empty() {
        info!("Link API is open (API_TOKEN not set)");
    } else {
        info!("Link API requires bearer token authentication");
    }

    let bind_address = config.bind_address();
    info!("Starting server at http://{}", bind_address);
    info!("Fallback redirect target: {}", config.default_url);

    let app_config = config.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(app_config.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .service(
                web::scope("/api")
                    .wrap(from_fn(AuthMiddleware::api_auth))
                    .route("/links", web::get().to(LinkService::get_all_links))
                    .route("/links", web::post().to(LinkService::post_link))
                    .route("/links/{code}", web::get().to(LinkService::get_link))
                    .route("/links/{code}", web::put().to(LinkService::update_link))
                    .route("/links/{code}", web::delete().to(LinkService::delete_link))
                    .route(
                        "/links/{code}/analytics",
                        web::get().to(LinkService::get_analytics),
                    )
                    .route(
                        "/links/{code}/preview",
                        web::get().to(RedirectService::preview),
                    ),
            )
            .service(
                web::scope("/health")
                    .route("", web::get().to(HealthService::health_check))
                    .route("", web::head().to(HealthService::health_check))
                    .route("/ready", web::get().to(HealthService::readiness_check))
                    .route("/live", web::get().to(HealthService::liveness_check)),
            )
            .route("/{path}*", web::get().to(RedirectService::handle_redirect))
            .route("/{path}*", web::head().to(RedirectService::handle_redirect))
    })
    .bind(bind_address)?
    .run()
    .await?;

    // drain the click buffer before exiting
    if let Some(manager) = get_click_manager() {
        manager.flush().await;
    }

    Ok(())
}
