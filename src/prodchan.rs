//! Product-channel resolution
//!
//! Derives the `product.platform.channel` identifier stored on every opinion
//! from the browser facts of the submitting request.

use std::fmt;

use crate::browsers::BrowserInfo;

/// The only derivable channel today.
pub const CHANNEL_STABLE: &str = "stable";

const UNKNOWN: &str = "unknown";

/// A `product.platform.channel` identifier, e.g. `firefox.android.stable`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProdChan {
    pub product: String,
    pub platform: String,
    pub channel: String,
}

impl fmt::Display for ProdChan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.product, self.platform, self.channel)
    }
}

/// Resolve the prodchan for a request's browser facts.
///
/// Always yields a well-formed three-part identifier; unresolvable parts
/// come out as "unknown".
pub fn resolve(browser: &BrowserInfo) -> ProdChan {
    let product = if browser.browser.as_deref() == Some("Firefox") {
        "firefox"
    } else {
        UNKNOWN
    };

    // "firefoxos" is the canonical spelling for the Firefox OS platform tag.
    let platform = match browser.platform.as_deref() {
        Some("Android") => "android",
        Some("FirefoxOS") => "firefoxos",
        _ if product == "firefox" => "desktop",
        _ => UNKNOWN,
    };

    ProdChan {
        product: product.to_string(),
        platform: platform.to_string(),
        channel: CHANNEL_STABLE.to_string(),
    }
}
