//! Merchant platform detection and deep-link derivation
//!
//! A product URL is matched against a fixed table of supported shopping
//! platforms: the host decides the platform, a per-platform regex pulls the
//! product ID out of the path or query string, and scheme/intent templates
//! turn that ID into iOS and Android deep links.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Coupang,
    Naver,
    #[serde(rename = "11st")]
    ElevenSt,
    Gmarket,
    Auction,
    Other,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Coupang => "coupang",
            Platform::Naver => "naver",
            Platform::ElevenSt => "11st",
            Platform::Gmarket => "gmarket",
            Platform::Auction => "auction",
            Platform::Other => "other",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived app deep links for a product URL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeepLinks {
    pub ios_url: Option<String>,
    pub android_url: Option<String>,
}

struct PlatformPattern {
    platform: Platform,
    domains: &'static [&'static str],
    product_regexes: Vec<Regex>,
    ios_template: &'static str,
    android_template: &'static str,
}

static PLATFORM_PATTERNS: Lazy<Vec<PlatformPattern>> = Lazy::new(|| {
    vec![
        PlatformPattern {
            platform: Platform::Coupang,
            domains: &["coupang.com", "link.coupang.com"],
            product_regexes: vec![
                Regex::new(r"(?:products/|a/)([A-Za-z0-9]+)").unwrap(),
                Regex::new(r"(?i)itemId=(\d+)").unwrap(),
            ],
            ios_template: "coupang://products/{productId}",
            android_template:
                "intent://products/{productId}#Intent;scheme=coupang;package=com.coupang.mobile;end",
        },
        PlatformPattern {
            platform: Platform::Naver,
            domains: &["shopping.naver.com", "smartstore.naver.com"],
            product_regexes: vec![
                Regex::new(r"products/(\d+)").unwrap(),
                Regex::new(r"(?i)nvMid=(\d+)").unwrap(),
            ],
            ios_template: "navershopping://products/{productId}",
            android_template:
                "intent://products/{productId}#Intent;scheme=navershopping;package=com.nhn.android.search;end",
        },
        PlatformPattern {
            platform: Platform::ElevenSt,
            domains: &["11st.co.kr"],
            product_regexes: vec![Regex::new(r"products/(\d+)").unwrap()],
            ios_template: "11st://products/{productId}",
            android_template:
                "intent://products/{productId}#Intent;scheme=11st;package=com.elevenst;end",
        },
        PlatformPattern {
            platform: Platform::Gmarket,
            domains: &["gmarket.co.kr"],
            product_regexes: vec![Regex::new(r"(?i)goodscode=(\w+)").unwrap()],
            ios_template: "gmarket://products/{productId}",
            android_template:
                "intent://products/{productId}#Intent;scheme=gmarket;package=com.gmarket.mobile;end",
        },
        PlatformPattern {
            platform: Platform::Auction,
            domains: &["auction.co.kr"],
            product_regexes: vec![Regex::new(r"(?i)itemNo=(\w+)").unwrap()],
            ios_template: "auction://products/{productId}",
            android_template:
                "intent://products/{productId}#Intent;scheme=auction;package=com.auction.mobile;end",
        },
    ]
});

static URL_IN_TEXT: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+").unwrap());

fn pattern_for(platform: Platform) -> Option<&'static PlatformPattern> {
    PLATFORM_PATTERNS.iter().find(|p| p.platform == platform)
}

/// Detect the merchant platform from a product URL's host
///
/// Unparseable URLs and unknown hosts map to `Platform::Other`.
pub fn detect_platform(url: &str) -> Platform {
    let host = match Url::parse(url) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) => host.to_lowercase(),
            None => return Platform::Other,
        },
        Err(_) => return Platform::Other,
    };

    for pattern in PLATFORM_PATTERNS.iter() {
        if pattern.domains.iter().any(|d| host.contains(d)) {
            return pattern.platform;
        }
    }

    Platform::Other
}

/// Extract the product ID from a URL, per-platform
pub fn extract_product_id(url: &str, platform: Platform) -> Option<String> {
    let pattern = pattern_for(platform)?;

    pattern
        .product_regexes
        .iter()
        .find_map(|re| re.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Derive iOS/Android deep links for a product URL
///
/// Both sides are `None` when the platform is unsupported or no product ID
/// can be extracted; the redirect then falls back to the web URL.
pub fn generate_deep_links(url: &str, platform: Platform) -> DeepLinks {
    let Some(pattern) = pattern_for(platform) else {
        return DeepLinks::default();
    };

    let Some(product_id) = extract_product_id(url, platform) else {
        return DeepLinks::default();
    };

    DeepLinks {
        ios_url: Some(pattern.ios_template.replace("{productId}", &product_id)),
        android_url: Some(pattern.android_template.replace("{productId}", &product_id)),
    }
}

/// Pull a URL out of free-form text, preferring supported merchant domains
///
/// Shared product links usually arrive as "title text https://... more text";
/// when several URLs are present the first one on a supported domain wins.
pub fn extract_url_from_text(text: &str) -> Option<String> {
    let urls: Vec<&str> = URL_IN_TEXT.find_iter(text).map(|m| m.as_str()).collect();

    if urls.is_empty() {
        return None;
    }

    for url in &urls {
        let lowered = url.to_lowercase();
        let supported = PLATFORM_PATTERNS
            .iter()
            .flat_map(|p| p.domains.iter())
            .any(|d| lowered.contains(d));
        if supported {
            return Some(url.trim().to_string());
        }
    }

    Some(urls[0].trim().to_string())
}

/// Derive a title from shared text by stripping URLs and noise
pub fn extract_title_from_text(text: &str) -> String {
    let clean = URL_IN_TEXT.replace_all(text, "");

    let title = clean
        .trim()
        .trim_end_matches(['!', '?', '.'])
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    if title.chars().count() > 100 {
        let truncated: String = title.chars().take(100).collect();
        format!("{}...", truncated)
    } else {
        title
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_coupang() {
        assert_eq!(
            detect_platform("https://www.coupang.com/vp/products/7654321"),
            Platform::Coupang
        );
        assert_eq!(
            detect_platform("https://link.coupang.com/a/xYz123"),
            Platform::Coupang
        );
    }

    #[test]
    fn detects_naver_variants() {
        assert_eq!(
            detect_platform("https://shopping.naver.com/products/123"),
            Platform::Naver
        );
        assert_eq!(
            detect_platform("https://smartstore.naver.com/store/products/456"),
            Platform::Naver
        );
    }

    #[test]
    fn detects_remaining_platforms() {
        assert_eq!(
            detect_platform("https://www.11st.co.kr/products/123"),
            Platform::ElevenSt
        );
        assert_eq!(
            detect_platform("http://item.gmarket.co.kr/Item?goodscode=999"),
            Platform::Gmarket
        );
        assert_eq!(
            detect_platform("http://itempage3.auction.co.kr/DetailView.aspx?ItemNo=B123"),
            Platform::Auction
        );
    }

    #[test]
    fn unknown_hosts_and_garbage_map_to_other() {
        assert_eq!(detect_platform("https://example.com/products/1"), Platform::Other);
        assert_eq!(detect_platform("not a url"), Platform::Other);
        assert_eq!(detect_platform(""), Platform::Other);
    }

    #[test]
    fn extracts_product_ids() {
        assert_eq!(
            extract_product_id("https://www.coupang.com/vp/products/7654321", Platform::Coupang),
            Some("7654321".to_string())
        );
        assert_eq!(
            extract_product_id("https://link.coupang.com/a/xYz123", Platform::Coupang),
            Some("xYz123".to_string())
        );
        assert_eq!(
            extract_product_id(
                "https://smartstore.naver.com/shop?nvMid=112233",
                Platform::Naver
            ),
            Some("112233".to_string())
        );
        assert_eq!(
            extract_product_id(
                "http://item.gmarket.co.kr/Item?goodscode=ABC999",
                Platform::Gmarket
            ),
            Some("ABC999".to_string())
        );
        assert_eq!(
            extract_product_id(
                "http://itempage3.auction.co.kr/DetailView.aspx?itemno=B123",
                Platform::Auction
            ),
            Some("B123".to_string())
        );
    }

    #[test]
    fn no_product_id_when_absent() {
        assert_eq!(
            extract_product_id("https://www.coupang.com/", Platform::Coupang),
            None
        );
        assert_eq!(
            extract_product_id("https://example.com/products/1", Platform::Other),
            None
        );
    }

    #[test]
    fn deep_links_for_coupang() {
        let links = generate_deep_links(
            "https://www.coupang.com/vp/products/7654321",
            Platform::Coupang,
        );
        assert_eq!(
            links.ios_url.as_deref(),
            Some("coupang://products/7654321")
        );
        assert_eq!(
            links.android_url.as_deref(),
            Some("intent://products/7654321#Intent;scheme=coupang;package=com.coupang.mobile;end")
        );
    }

    #[test]
    fn deep_links_empty_without_product_id() {
        let links = generate_deep_links("https://www.coupang.com/", Platform::Coupang);
        assert_eq!(links, DeepLinks::default());

        let links = generate_deep_links("https://example.com/x", Platform::Other);
        assert_eq!(links, DeepLinks::default());
    }

    #[test]
    fn url_extraction_prefers_supported_domains() {
        let text = "봐봐 https://example.com/a 그리고 https://www.coupang.com/vp/products/1";
        assert_eq!(
            extract_url_from_text(text).as_deref(),
            Some("https://www.coupang.com/vp/products/1")
        );

        let text = "only https://example.com/a here";
        assert_eq!(
            extract_url_from_text(text).as_deref(),
            Some("https://example.com/a")
        );

        assert_eq!(extract_url_from_text("no links at all"), None);
    }

    #[test]
    fn title_extraction_strips_urls_and_noise() {
        assert_eq!(
            extract_title_from_text("대박 할인! https://www.coupang.com/vp/products/1"),
            "대박 할인"
        );
        assert_eq!(extract_title_from_text("https://example.com/a"), "");

        let long = format!("{} https://example.com", "가".repeat(150));
        let title = extract_title_from_text(&long);
        assert!(title.ends_with("..."));
        assert_eq!(title.chars().count(), 103);
    }

    #[test]
    fn platform_serde_names_match_api() {
        assert_eq!(serde_json::to_string(&Platform::ElevenSt).unwrap(), "\"11st\"");
        assert_eq!(serde_json::to_string(&Platform::Coupang).unwrap(), "\"coupang\"");
        let p: Platform = serde_json::from_str("\"gmarket\"").unwrap();
        assert_eq!(p, Platform::Gmarket);
    }
}
