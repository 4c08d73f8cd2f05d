//! URL validation for submitted product links
//!
//! Blocks dangerous schemes and anything that is not plain http(s).

use url::Url;

use crate::errors::{Result, SmartlinkError};

const DANGEROUS_PROTOCOLS: &[&str] = &[
    "javascript:",
    "data:",
    "file:",
    "vbscript:",
    "about:",
    "blob:",
];

/// Validate a URL before a short code is issued
///
/// Rejects empty input, dangerous schemes (`javascript:`, `data:`, ...),
/// non-http(s) schemes, and anything the `url` crate cannot parse.
pub fn validate_url(url: &str) -> Result<()> {
    let url = url.trim();

    if url.is_empty() {
        return Err(SmartlinkError::validation("URL cannot be empty"));
    }

    let url_lower = url.to_lowercase();

    for proto in DANGEROUS_PROTOCOLS {
        if url_lower.starts_with(proto) {
            return Err(SmartlinkError::validation(format!(
                "Dangerous protocol blocked: {}",
                proto
            )));
        }
    }

    if !url_lower.starts_with("http://") && !url_lower.starts_with("https://") {
        return Err(SmartlinkError::validation(
            "URL must start with http:// or https://",
        ));
    }

    Url::parse(url)
        .map_err(|e| SmartlinkError::validation(format!("Invalid URL format: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_urls() {
        assert!(validate_url("http://example.com").is_ok());
        assert!(validate_url("https://www.coupang.com/vp/products/123").is_ok());
        assert!(validate_url("https://example.com/path?query=1").is_ok());
        assert!(validate_url("http://localhost:8080").is_ok());
    }

    #[test]
    fn test_dangerous_protocols() {
        assert!(validate_url("javascript:alert(1)").is_err());
        assert!(validate_url("data:text/html,<script>alert(1)</script>").is_err());
        assert!(validate_url("file:///etc/passwd").is_err());
        assert!(validate_url("vbscript:msgbox(1)").is_err());
    }

    #[test]
    fn test_invalid_protocols() {
        assert!(validate_url("ftp://example.com").is_err());
        assert!(validate_url("mailto:test@example.com").is_err());
        assert!(validate_url("coupang://products/123").is_err());
    }

    #[test]
    fn test_empty_url() {
        assert!(validate_url("").is_err());
        assert!(validate_url("   ").is_err());
    }

    #[test]
    fn test_case_insensitive() {
        assert!(validate_url("JAVASCRIPT:alert(1)").is_err());
        assert!(validate_url("HTTP://example.com").is_ok());
        assert!(validate_url("HTTPS://example.com").is_ok());
    }
}
