use actix_web::middleware::Next;
use actix_web::{
    Error, HttpResponse,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web,
};
use tracing::{debug, info};

use crate::config::Config;

pub struct AuthMiddleware;

impl AuthMiddleware {
    /// Bearer-token guard for the management API
    ///
    /// An empty `API_TOKEN` leaves the API open, which is the development
    /// default; with a token set, every `/api` request needs
    /// `Authorization: Bearer <token>`.
    pub async fn api_auth(
        req: ServiceRequest,
        next: Next<BoxBody>,
    ) -> Result<ServiceResponse<BoxBody>, Error> {
        if req.method() == actix_web::http::Method::OPTIONS {
            return Ok(req.into_response(HttpResponse::NoContent().finish()));
        }

        let api_token = req
            .app_data::<web::Data<Config>>()
            .map(|config| config.api_token.clone())
            .unwrap_or_default();

        if api_token.is_empty() {
            return next.call(req).await;
        }

        if let Some(auth_header) = req.headers().get("Authorization") {
            if let Some(auth_bytes) = auth_header.as_bytes().strip_prefix(b"Bearer ") {
                if auth_bytes == api_token.as_bytes() {
                    debug!("API authentication succeeded");
                    return next.call(req).await;
                }
            }
        }

        info!("API authentication failed: token mismatch or missing Authorization header");
        Ok(req.into_response(
            HttpResponse::Unauthorized()
                .append_header(("Content-Type", "application/json; charset=utf-8"))
                .json(serde_json::json!({
                    "code": 401,
                    "data": { "error": "Unauthorized: Invalid or missing token" }
                })),
        ))
    }
}
