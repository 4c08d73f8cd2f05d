//! User-agent classification for redirect decisions
//!
//! woothee supplies the browser family; OS and in-app detection stay plain
//! substring tests, which is what the deep-link fallback chain actually
//! needs. In-app browsers (Instagram, KakaoTalk, ...) cannot open `intent://`
//! or custom-scheme URIs reliably, so they are flagged and kept on the web
//! URL.

use serde::{Deserialize, Serialize};
use woothee::parser::Parser;

/// UA substrings that mark embedded in-app browsers
const IN_APP_MARKERS: &[&str] = &[
    "instagram",
    "fban",
    "fbav",
    "facebook",
    "twitter",
    "line/",
    "kakaotalk",
    "naver(inapp",
    "micromessenger",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Ios,
    Android,
    Mobile,
    Desktop,
}

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Ios => "ios",
            DeviceType::Android => "android",
            DeviceType::Mobile => "mobile",
            DeviceType::Desktop => "desktop",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserType {
    Chrome,
    Safari,
    Firefox,
    Edge,
    Other,
}

impl BrowserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserType::Chrome => "chrome",
            BrowserType::Safari => "safari",
            BrowserType::Firefox => "firefox",
            BrowserType::Edge => "edge",
            BrowserType::Other => "other",
        }
    }
}

/// Classified client, derived once per redirect request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceInfo {
    pub device_type: DeviceType,
    pub browser: BrowserType,
    pub is_in_app: bool,
}

impl DeviceInfo {
    pub fn from_user_agent(user_agent: &str) -> Self {
        let ua = user_agent.to_lowercase();

        let device_type = if ua.contains("iphone") || ua.contains("ipod") || ua.contains("ipad") {
            DeviceType::Ios
        } else if ua.contains("android") {
            DeviceType::Android
        } else if ua.contains("mobile") || ua.contains("phone") {
            DeviceType::Mobile
        } else {
            DeviceType::Desktop
        };

        let browser = classify_browser(user_agent, &ua);
        let is_in_app = IN_APP_MARKERS.iter().any(|marker| ua.contains(marker));

        DeviceInfo {
            device_type,
            browser,
            is_in_app,
        }
    }

    pub fn is_mobile(&self) -> bool {
        matches!(
            self.device_type,
            DeviceType::Ios | DeviceType::Android | DeviceType::Mobile
        )
    }
}

fn classify_browser(user_agent: &str, ua_lower: &str) -> BrowserType {
    let parser = Parser::new();

    // woothee first; substring fallback covers in-app and unusual UAs it
    // reports as UNKNOWN
    let family = match parser.parse(user_agent) {
        Some(result) if result.name != "UNKNOWN" => result.name.to_lowercase(),
        _ => ua_lower.to_string(),
    };

    if family.contains("edge") || ua_lower.contains("edg/") {
        BrowserType::Edge
    } else if family.contains("firefox") {
        BrowserType::Firefox
    } else if family.contains("chrome") || family.contains("crios") {
        BrowserType::Chrome
    } else if family.contains("safari") {
        BrowserType::Safari
    } else {
        BrowserType::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IPHONE_SAFARI: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) \
        AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
    const ANDROID_CHROME: &str = "Mozilla/5.0 (Linux; Android 14; SM-S918N) \
        AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36";
    const DESKTOP_CHROME: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
        AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
    const DESKTOP_FIREFOX: &str =
        "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0";
    const INSTAGRAM_IOS: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) \
        AppleWebKit/605.1.15 (KHTML, like Gecko) Mobile/15E148 Instagram 320.0.0.0.0";
    const KAKAOTALK_ANDROID: &str = "Mozilla/5.0 (Linux; Android 14; SM-S918N) \
        AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36 KAKAOTALK";

    #[test]
    fn classifies_ios() {
        let info = DeviceInfo::from_user_agent(IPHONE_SAFARI);
        assert_eq!(info.device_type, DeviceType::Ios);
        assert_eq!(info.browser, BrowserType::Safari);
        assert!(!info.is_in_app);
        assert!(info.is_mobile());
    }

    #[test]
    fn classifies_android() {
        let info = DeviceInfo::from_user_agent(ANDROID_CHROME);
        assert_eq!(info.device_type, DeviceType::Android);
        assert_eq!(info.browser, BrowserType::Chrome);
        assert!(!info.is_in_app);
    }

    #[test]
    fn classifies_desktop() {
        let info = DeviceInfo::from_user_agent(DESKTOP_CHROME);
        assert_eq!(info.device_type, DeviceType::Desktop);
        assert_eq!(info.browser, BrowserType::Chrome);
        assert!(!info.is_mobile());

        let info = DeviceInfo::from_user_agent(DESKTOP_FIREFOX);
        assert_eq!(info.browser, BrowserType::Firefox);
    }

    #[test]
    fn flags_in_app_browsers() {
        let info = DeviceInfo::from_user_agent(INSTAGRAM_IOS);
        assert_eq!(info.device_type, DeviceType::Ios);
        assert!(info.is_in_app);

        let info = DeviceInfo::from_user_agent(KAKAOTALK_ANDROID);
        assert_eq!(info.device_type, DeviceType::Android);
        assert!(info.is_in_app);
    }

    #[test]
    fn empty_ua_is_desktop_other() {
        let info = DeviceInfo::from_user_agent("");
        assert_eq!(info.device_type, DeviceType::Desktop);
        assert_eq!(info.browser, BrowserType::Other);
        assert!(!info.is_in_app);
    }

    #[test]
    fn ipad_counts_as_ios() {
        let ua = "Mozilla/5.0 (iPad; CPU OS 17_0 like Mac OS X) AppleWebKit/605.1.15 \
            (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
        assert_eq!(
            DeviceInfo::from_user_agent(ua).device_type,
            DeviceType::Ios
        );
    }
}
