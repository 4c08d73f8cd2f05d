//! Auth middleware tests

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::middleware::from_fn;
use actix_web::{App, test as actix_test, web};

use smartlink::config::Config;
use smartlink::middleware::AuthMiddleware;
use smartlink::services::LinkService;
use smartlink::storages::Storage;
use smartlink::storages::memory::MemoryStorage;

macro_rules! guarded_app {
    ($config:expr) => {{
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        actix_test::init_service(
            App::new()
                .app_data(web::Data::new(storage))
                .app_data(web::Data::new($config))
                .service(
                    web::scope("/api")
                        .wrap(from_fn(AuthMiddleware::api_auth))
                        .route("/links", web::get().to(LinkService::get_all_links)),
                ),
        )
        .await
    }};
}

fn config_with_token(token: &str) -> Config {
    let mut config = Config::from_env();
    config.api_token = token.to_string();
    config
}

#[actix_web::test]
async fn open_api_without_token() {
    let app = guarded_app!(config_with_token(""));

    let req = actix_test::TestRequest::get().uri("/api/links").to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn missing_token_is_rejected() {
    let app = guarded_app!(config_with_token("sekrit"));

    let req = actix_test::TestRequest::get().uri("/api/links").to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn wrong_token_is_rejected() {
    let app = guarded_app!(config_with_token("sekrit"));

    let req = actix_test::TestRequest::get()
        .uri("/api/links")
        .insert_header(("Authorization", "Bearer wrong"))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn correct_token_passes() {
    let app = guarded_app!(config_with_token("sekrit"));

    let req = actix_test::TestRequest::get()
        .uri("/api/links")
        .insert_header(("Authorization", "Bearer sekrit"))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn options_preflight_short_circuits() {
    let app = guarded_app!(config_with_token("sekrit"));

    let req = actix_test::TestRequest::with_uri("/api/links")
        .method(actix_web::http::Method::OPTIONS)
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}
