//! Short-code resolution and device-aware redirection
//!
//! The hot path: look the code up, classify the client, pick between the
//! web URL and the app deep links, count the click, answer `302 Found`.
//! Unknown and deactivated codes fall back to the configured default URL
//! instead of surfacing a 404 to a person who just tapped a shared link.

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::config::Config;
use crate::services::device::DeviceInfo;
use crate::storages::click::global::get_click_manager;
use crate::storages::{Link, Storage};

pub struct RedirectService;

impl RedirectService {
    #[instrument(skip(req, storage, config), fields(path = %path))]
    pub async fn handle_redirect(
        req: HttpRequest,
        path: web::Path<String>,
        storage: web::Data<Arc<dyn Storage>>,
        config: web::Data<Config>,
    ) -> impl Responder {
        let code = path.into_inner();

        if code.is_empty() {
            return Self::fallback_redirect(&config);
        }

        let link = match storage.get(&code).await {
            Some(link) if link.is_active => link,
            Some(_) => {
                debug!("Link is deactivated: {}", code);
                return Self::fallback_redirect(&config);
            }
            None => {
                debug!("Link not found: {}", code);
                return Self::fallback_redirect(&config);
            }
        };

        let user_agent = req
            .headers()
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        let device = DeviceInfo::from_user_agent(user_agent);

        Self::record_click(&link, &device);

        let target = choose_redirect_target(&link, &device);
        debug!(
            "Redirecting {} -> {} (device: {}, browser: {}, in_app: {})",
            code,
            target,
            device.device_type.as_str(),
            device.browser.as_str(),
            device.is_in_app
        );

        HttpResponse::Found()
            .insert_header((header::LOCATION, target))
            .finish()
    }

    /// `GET /api/links/{code}/preview`
    ///
    /// The redirect decision as JSON, without redirecting and without
    /// counting a click.
    pub async fn preview(
        req: HttpRequest,
        path: web::Path<String>,
        storage: web::Data<Arc<dyn Storage>>,
    ) -> impl Responder {
        let code = path.into_inner();

        let link = match storage.get(&code).await {
            Some(link) if link.is_active => link,
            _ => {
                return HttpResponse::NotFound()
                    .append_header(("Content-Type", "application/json; charset=utf-8"))
                    .json(json!({
                        "code": 404,
                        "data": { "error": format!("Link not found: {}", code) }
                    }));
            }
        };

        let user_agent = req
            .headers()
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        let device = DeviceInfo::from_user_agent(user_agent);
        let redirect_url = choose_redirect_target(&link, &device);

        HttpResponse::Ok()
            .append_header(("Content-Type", "application/json; charset=utf-8"))
            .json(json!({
                "code": 0,
                "data": {
                    "code": link.code,
                    "title": link.title,
                    "description": link.description,
                    "original_url": link.original_url,
                    "redirect_url": redirect_url,
                    "platform": link.platform,
                    "device": {
                        "type": device.device_type.as_str(),
                        "browser": device.browser.as_str(),
                        "is_in_app": device.is_in_app,
                    },
                    "total_clicks": link.analytics.total_clicks,
                    "created_at": link.created_at.to_rfc3339(),
                }
            }))
    }

    fn record_click(link: &Link, device: &DeviceInfo) {
        match get_click_manager() {
            Some(manager) => {
                manager.increment(&link.code, device.device_type, device.browser);
            }
            None => {
                debug!(
                    "Click manager not initialized, skipping increment for code: {}",
                    link.code
                );
            }
        }
    }

    fn fallback_redirect(config: &Config) -> HttpResponse {
        HttpResponse::Found()
            .insert_header((header::LOCATION, config.default_url.clone()))
            .finish()
    }
}

/// Pick the redirect target for a link and client
///
/// In-app browsers cannot open scheme/intent URIs reliably, so they stay on
/// the web URL. iOS and Android get their deep link when one was derived;
/// everything else gets the original URL.
pub fn choose_redirect_target(link: &Link, device: &DeviceInfo) -> String {
    use crate::services::device::DeviceType;

    if device.is_in_app {
        return link.original_url.clone();
    }

    match device.device_type {
        DeviceType::Ios => link
            .ios_url
            .clone()
            .unwrap_or_else(|| link.original_url.clone()),
        DeviceType::Android => link
            .android_url
            .clone()
            .unwrap_or_else(|| link.original_url.clone()),
        _ => link.original_url.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{DeepLinks, Platform};
    use crate::services::device::{BrowserType, DeviceType};

    fn sample_link() -> Link {
        Link::new(
            "abc123".to_string(),
            "https://www.coupang.com/vp/products/7654321".to_string(),
            Platform::Coupang,
            DeepLinks {
                ios_url: Some("coupang://products/7654321".to_string()),
                android_url: Some(
                    "intent://products/7654321#Intent;scheme=coupang;package=com.coupang.mobile;end"
                        .to_string(),
                ),
            },
            None,
            None,
        )
    }

    fn device(device_type: DeviceType, is_in_app: bool) -> DeviceInfo {
        DeviceInfo {
            device_type,
            browser: BrowserType::Other,
            is_in_app,
        }
    }

    #[test]
    fn ios_gets_deep_link() {
        let target = choose_redirect_target(&sample_link(), &device(DeviceType::Ios, false));
        assert_eq!(target, "coupang://products/7654321");
    }

    #[test]
    fn android_gets_intent_uri() {
        let target = choose_redirect_target(&sample_link(), &device(DeviceType::Android, false));
        assert!(target.starts_with("intent://products/7654321"));
    }

    #[test]
    fn in_app_browser_stays_on_web() {
        let target = choose_redirect_target(&sample_link(), &device(DeviceType::Ios, true));
        assert_eq!(target, "https://www.coupang.com/vp/products/7654321");
    }

    #[test]
    fn desktop_gets_web_url() {
        let target = choose_redirect_target(&sample_link(), &device(DeviceType::Desktop, false));
        assert_eq!(target, "https://www.coupang.com/vp/products/7654321");
    }

    #[test]
    fn missing_deep_link_falls_back_to_web() {
        let mut link = sample_link();
        link.ios_url = None;
        let target = choose_redirect_target(&link, &device(DeviceType::Ios, false));
        assert_eq!(target, "https://www.coupang.com/vp/products/7654321");
    }
}
