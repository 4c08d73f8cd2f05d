//! Link management API
//!
//! JSON CRUD surface under `/api/links`. Creation does the interesting
//! work: URL (or free-form text) in, platform detection, deep-link
//! derivation, and a collision-checked random short code out.

use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::platform::{self, Platform};
use crate::storages::{Link, LinkAnalytics, Storage};
use crate::utils::{generate_random_code, url_validator::validate_url};

const MAX_CODE_ATTEMPTS: usize = 10;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub data: T,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LinkPayload {
    pub code: String,
    pub short_url: String,
    pub original_url: String,
    pub ios_url: Option<String>,
    pub android_url: Option<String>,
    pub platform: Platform,
    pub title: Option<String>,
    pub description: Option<String>,
    pub analytics: LinkAnalytics,
    pub created_at: String,
    pub last_clicked_at: Option<String>,
    pub is_active: bool,
}

impl LinkPayload {
    fn from_link(link: &Link, config: &Config) -> Self {
        LinkPayload {
            code: link.code.clone(),
            short_url: config.short_url(&link.code),
            original_url: link.original_url.clone(),
            ios_url: link.ios_url.clone(),
            android_url: link.android_url.clone(),
            platform: link.platform,
            title: link.title.clone(),
            description: link.description.clone(),
            analytics: link.analytics.clone(),
            created_at: link.created_at.to_rfc3339(),
            last_clicked_at: link.last_clicked_at.map(|dt| dt.to_rfc3339()),
            is_active: link.is_active,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PostNewLink {
    /// Product URL; alternatively supply `text` and let the URL be extracted
    pub url: Option<String>,
    /// Free-form shared text ("title https://... more words")
    pub text: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct UpdateLink {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct GetLinksQuery {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PaginatedResponse<T> {
    pub code: i32,
    pub data: T,
    pub pagination: PaginationInfo,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PaginationInfo {
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
}

fn error_response(status: actix_web::http::StatusCode, message: String) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(json!({
            "code": status.as_u16(),
            "data": { "error": message }
        }))
}

fn not_found(code: &str) -> HttpResponse {
    error_response(
        actix_web::http::StatusCode::NOT_FOUND,
        format!("Link not found: {}", code),
    )
}

pub struct LinkService;

impl LinkService {
    /// `GET /api/links` - active links, newest first, paginated
    pub async fn get_all_links(
        query: web::Query<GetLinksQuery>,
        storage: web::Data<Arc<dyn Storage>>,
        config: web::Data<Config>,
    ) -> impl Responder {
        let all_links = storage.load_all().await;
        debug!("Link API: retrieved {} total links", all_links.len());

        let mut active: Vec<Link> = all_links
            .into_values()
            .filter(|link| link.is_active)
            .collect();
        active.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = active.len();
        let page = query.page.unwrap_or(1).max(1);
        let page_size = query.page_size.unwrap_or(20).clamp(1, 100);
        let total_pages = total.div_ceil(page_size);

        let start = (page - 1) * page_size;
        let end = (start + page_size).min(total);
        let payloads: Vec<LinkPayload> = if start < total {
            active[start..end]
                .iter()
                .map(|link| LinkPayload::from_link(link, &config))
                .collect()
        } else {
            vec![]
        };

        info!(
            "Link API: returning {} links (page {} of {}, total: {})",
            payloads.len(),
            page,
            total_pages,
            total
        );

        HttpResponse::Ok()
            .append_header(("Content-Type", "application/json; charset=utf-8"))
            .json(PaginatedResponse {
                code: 0,
                data: payloads,
                pagination: PaginationInfo {
                    page,
                    page_size,
                    total,
                    total_pages,
                },
            })
    }

    /// `POST /api/links` - create a link and derive its deep links
    pub async fn post_link(
        payload: web::Json<PostNewLink>,
        storage: web::Data<Arc<dyn Storage>>,
        config: web::Data<Config>,
    ) -> impl Responder {
        let payload = payload.into_inner();

        // URL directly, or extracted out of shared text
        let (original_url, extracted_title) = match (&payload.url, &payload.text) {
            (Some(url), _) if !url.trim().is_empty() => (url.trim().to_string(), None),
            (_, Some(text)) => match platform::extract_url_from_text(text) {
                Some(url) => {
                    let title = platform::extract_title_from_text(text);
                    (url, if title.is_empty() { None } else { Some(title) })
                }
                None => {
                    return error_response(
                        actix_web::http::StatusCode::BAD_REQUEST,
                        "No URL found in the provided text".to_string(),
                    );
                }
            },
            _ => {
                return error_response(
                    actix_web::http::StatusCode::BAD_REQUEST,
                    "Either url or text must be provided".to_string(),
                );
            }
        };

        if let Err(e) = validate_url(&original_url) {
            info!("Link API: rejected URL: {}", e);
            return error_response(actix_web::http::StatusCode::BAD_REQUEST, e.message().to_string());
        }

        let detected = platform::detect_platform(&original_url);
        let deep_links = platform::generate_deep_links(&original_url, detected);

        // collision-checked random code
        let mut code = None;
        for _ in 0..MAX_CODE_ATTEMPTS {
            let candidate = generate_random_code(config.random_code_length);
            if storage.get(&candidate).await.is_none() {
                code = Some(candidate);
                break;
            }
        }
        let Some(code) = code else {
            error!(
                "Link API: failed to generate a unique code after {} attempts",
                MAX_CODE_ATTEMPTS
            );
            return error_response(
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "Could not generate a unique short code".to_string(),
            );
        };

        let link = Link::new(
            code,
            original_url,
            detected,
            deep_links,
            payload.title.or(extracted_title),
            payload.description,
        );

        match storage.set(link.clone()).await {
            Ok(()) => {
                info!(
                    "Link API: created {} -> {} (platform: {})",
                    link.code, link.original_url, link.platform
                );
                HttpResponse::Created()
                    .append_header(("Content-Type", "application/json; charset=utf-8"))
                    .json(ApiResponse {
                        code: 0,
                        data: LinkPayload::from_link(&link, &config),
                    })
            }
            Err(e) => {
                error!("Link API: failed to store link: {}", e);
                error_response(
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to store link".to_string(),
                )
            }
        }
    }

    /// `GET /api/links/{code}`
    pub async fn get_link(
        path: web::Path<String>,
        storage: web::Data<Arc<dyn Storage>>,
        config: web::Data<Config>,
    ) -> impl Responder {
        let code = path.into_inner();

        match storage.get(&code).await {
            Some(link) => HttpResponse::Ok()
                .append_header(("Content-Type", "application/json; charset=utf-8"))
                .json(ApiResponse {
                    code: 0,
                    data: LinkPayload::from_link(&link, &config),
                }),
            None => not_found(&code),
        }
    }

    /// `PUT /api/links/{code}` - only title/description/is_active are mutable
    pub async fn update_link(
        path: web::Path<String>,
        payload: web::Json<UpdateLink>,
        storage: web::Data<Arc<dyn Storage>>,
        config: web::Data<Config>,
    ) -> impl Responder {
        let code = path.into_inner();

        let Some(mut link) = storage.get(&code).await else {
            return not_found(&code);
        };

        if let Some(title) = &payload.title {
            link.title = Some(title.clone());
        }
        if let Some(description) = &payload.description {
            link.description = Some(description.clone());
        }
        if let Some(is_active) = payload.is_active {
            link.is_active = is_active;
        }

        match storage.set(link.clone()).await {
            Ok(()) => {
                info!("Link API: updated {}", code);
                HttpResponse::Ok()
                    .append_header(("Content-Type", "application/json; charset=utf-8"))
                    .json(ApiResponse {
                        code: 0,
                        data: LinkPayload::from_link(&link, &config),
                    })
            }
            Err(e) => {
                error!("Link API: failed to update {}: {}", code, e);
                error_response(
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to update link".to_string(),
                )
            }
        }
    }

    /// `DELETE /api/links/{code}` - soft delete
    pub async fn delete_link(
        path: web::Path<String>,
        storage: web::Data<Arc<dyn Storage>>,
    ) -> impl Responder {
        let code = path.into_inner();

        match storage.remove(&code).await {
            Ok(()) => {
                info!("Link API: deactivated {}", code);
                HttpResponse::Ok()
                    .append_header(("Content-Type", "application/json; charset=utf-8"))
                    .json(json!({ "code": 0, "data": { "deleted": code } }))
            }
            Err(e) => {
                debug!("Link API: delete failed for {}: {}", code, e);
                not_found(&code)
            }
        }
    }

    /// `GET /api/links/{code}/analytics`
    pub async fn get_analytics(
        path: web::Path<String>,
        storage: web::Data<Arc<dyn Storage>>,
    ) -> impl Responder {
        let code = path.into_inner();

        match storage.get(&code).await {
            Some(link) => HttpResponse::Ok()
                .append_header(("Content-Type", "application/json; charset=utf-8"))
                .json(json!({
                    "code": 0,
                    "data": {
                        "code": link.code,
                        "analytics": link.analytics,
                        "created_at": link.created_at.to_rfc3339(),
                        "last_clicked_at": link.last_clicked_at.map(|dt| dt.to_rfc3339()),
                    }
                })),
            None => not_found(&code),
        }
    }
}
