use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::platform::{DeepLinks, Platform};
use crate::services::device::{BrowserType, DeviceType};

/// Per-device click counters
///
/// Counters are monotonic: nothing ever decrements them. Clicks from
/// unclassified mobile devices land in `other`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceClicks {
    #[serde(default)]
    pub ios: u64,
    #[serde(default)]
    pub android: u64,
    #[serde(default)]
    pub desktop: u64,
    #[serde(default)]
    pub other: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserClicks {
    #[serde(default)]
    pub chrome: u64,
    #[serde(default)]
    pub safari: u64,
    #[serde(default)]
    pub firefox: u64,
    #[serde(default)]
    pub edge: u64,
    #[serde(default)]
    pub other: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkAnalytics {
    #[serde(default)]
    pub total_clicks: u64,
    #[serde(default)]
    pub device_clicks: DeviceClicks,
    #[serde(default)]
    pub browser_clicks: BrowserClicks,
}

impl LinkAnalytics {
    pub fn record(&mut self, device: DeviceType, browser: BrowserType, count: u64) {
        self.total_clicks += count;

        match device {
            DeviceType::Ios => self.device_clicks.ios += count,
            DeviceType::Android => self.device_clicks.android += count,
            DeviceType::Desktop => self.device_clicks.desktop += count,
            DeviceType::Mobile => self.device_clicks.other += count,
        }

        match browser {
            BrowserType::Chrome => self.browser_clicks.chrome += count,
            BrowserType::Safari => self.browser_clicks.safari += count,
            BrowserType::Firefox => self.browser_clicks.firefox += count,
            BrowserType::Edge => self.browser_clicks.edge += count,
            BrowserType::Other => self.browser_clicks.other += count,
        }
    }
}

/// A stored short link
///
/// `code` is unique and immutable once assigned. Deletion is soft: records
/// are deactivated, never removed from the backing store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub code: String,
    pub original_url: String,
    pub ios_url: Option<String>,
    pub android_url: Option<String>,
    pub platform: Platform,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub analytics: LinkAnalytics,
    pub created_at: DateTime<Utc>,
    pub last_clicked_at: Option<DateTime<Utc>>,
    #[serde(default = "default_is_active")]
    pub is_active: bool,
}

fn default_is_active() -> bool {
    true
}

impl Link {
    pub fn new(
        code: String,
        original_url: String,
        platform: Platform,
        deep_links: DeepLinks,
        title: Option<String>,
        description: Option<String>,
    ) -> Self {
        Link {
            code,
            original_url,
            ios_url: deep_links.ios_url,
            android_url: deep_links.android_url,
            platform,
            title,
            description,
            analytics: LinkAnalytics::default(),
            created_at: Utc::now(),
            last_clicked_at: None,
            is_active: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_updates_all_counters() {
        let mut analytics = LinkAnalytics::default();
        analytics.record(DeviceType::Ios, BrowserType::Safari, 1);
        analytics.record(DeviceType::Ios, BrowserType::Safari, 2);
        analytics.record(DeviceType::Mobile, BrowserType::Other, 1);

        assert_eq!(analytics.total_clicks, 4);
        assert_eq!(analytics.device_clicks.ios, 3);
        assert_eq!(analytics.device_clicks.other, 1);
        assert_eq!(analytics.browser_clicks.safari, 3);
        assert_eq!(analytics.browser_clicks.other, 1);
    }

    #[test]
    fn link_json_defaults_old_records_to_active() {
        // records written before the soft-delete flag existed
        let json = r#"{
            "code": "abc123",
            "original_url": "https://www.coupang.com/vp/products/1",
            "ios_url": null,
            "android_url": null,
            "platform": "coupang",
            "title": null,
            "description": null,
            "created_at": "2026-01-01T00:00:00Z",
            "last_clicked_at": null
        }"#;

        let link: Link = serde_json::from_str(json).unwrap();
        assert!(link.is_active);
        assert_eq!(link.analytics.total_clicks, 0);
    }
}
