//! User-Agent parsing
//!
//! Wraps woothee and normalizes its output into the [`BrowserInfo`] facts the
//! rest of the pipeline consumes. Detection failure degrades to absent
//! fields; nothing downstream may treat absence as an error.

use actix_web::{HttpMessage, HttpRequest};
use woothee::parser::Parser;

/// Structured facts parsed from a User-Agent string.
///
/// Any field may be `None` when detection fails, and absence propagates to
/// the consumers as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowserInfo {
    /// Browser name, e.g. "Firefox"
    pub browser: Option<String>,
    /// Browser version, e.g. "115.0"
    pub browser_version: Option<String>,
    /// Platform name, e.g. "Windows", "Android", "FirefoxOS"
    pub platform: Option<String>,
    /// Platform version, e.g. "10" for Windows 10
    pub platform_version: Option<String>,
    /// Whether the client is a mobile device, when the parser can tell
    pub mobile: Option<bool>,
}

/// Parse a raw User-Agent string into [`BrowserInfo`].
pub fn parse_ua(ua: &str) -> BrowserInfo {
    let parser = Parser::new();
    let Some(result) = parser.parse(ua) else {
        return BrowserInfo::default();
    };

    let browser = known(result.name);
    let browser_version = known(&result.version);
    let os_version = known(&result.os_version);

    let (platform, platform_version) = match result.os {
        "" | "UNKNOWN" => (None, None),
        os if os.starts_with("Windows") => {
            // woothee reports the version inside the os label ("Windows 10")
            let version = os
                .strip_prefix("Windows")
                .map(str::trim)
                .filter(|v| !v.is_empty() && !v.starts_with("UNKNOWN"))
                .map(String::from);
            (Some("Windows".to_string()), version)
        }
        "Firefox OS" => (Some("FirefoxOS".to_string()), os_version),
        "Mac OSX" => (Some("OS X".to_string()), os_version),
        os => (Some(os.to_string()), os_version),
    };

    let mobile = match result.category {
        "smartphone" | "mobilephone" => Some(true),
        "pc" | "crawler" | "appliance" | "misc" => Some(false),
        _ => None,
    };

    BrowserInfo {
        browser,
        browser_version,
        platform,
        platform_version,
        mobile,
    }
}

fn known(value: &str) -> Option<String> {
    if value.is_empty() || value == "UNKNOWN" {
        None
    } else {
        Some(value.to_string())
    }
}

/// Read the [`BrowserInfo`] the classify middleware attached to the request.
pub fn browser_info(req: &HttpRequest) -> BrowserInfo {
    req.extensions()
        .get::<BrowserInfo>()
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_firefox_on_windows() {
        let ua = "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/115.0";
        let info = parse_ua(ua);

        assert_eq!(info.browser.as_deref(), Some("Firefox"));
        assert_eq!(info.browser_version.as_deref(), Some("115.0"));
        assert_eq!(info.platform.as_deref(), Some("Windows"));
        assert_eq!(info.platform_version.as_deref(), Some("10"));
        assert_eq!(info.mobile, Some(false));
    }

    #[test]
    fn test_parse_firefox_on_android() {
        let ua = "Mozilla/5.0 (Android 13; Mobile; rv:109.0) Gecko/115.0 Firefox/115.0";
        let info = parse_ua(ua);

        assert_eq!(info.browser.as_deref(), Some("Firefox"));
        assert_eq!(info.platform.as_deref(), Some("Android"));
        assert_eq!(info.mobile, Some(true));
    }

    #[test]
    fn test_parse_chrome_on_windows() {
        let ua = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
        let info = parse_ua(ua);

        assert_eq!(info.browser.as_deref(), Some("Chrome"));
        assert_eq!(info.platform.as_deref(), Some("Windows"));
        assert_eq!(info.mobile, Some(false));
    }

    #[test]
    fn test_parse_safari_on_iphone() {
        let ua = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
        let info = parse_ua(ua);

        assert_eq!(info.browser.as_deref(), Some("Safari"));
        assert_eq!(info.mobile, Some(true));
    }

    #[test]
    fn test_parse_unknown_ua_degrades_to_absent() {
        let info = parse_ua("definitely not a browser");
        assert_eq!(info.browser, None);
        assert_eq!(info.platform, None);
        assert_eq!(info.mobile, None);

        let info = parse_ua("");
        assert_eq!(info, BrowserInfo::default());
    }
}
