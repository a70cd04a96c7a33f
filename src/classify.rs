//! Mobile classification
//!
//! Decides once per request whether the client is mobile, and refreshes the
//! mobile-state cookie on every response so later requests can short-circuit
//! through the cookie.
//!
//! The decision is an explicit ordered pipeline over [`RequestFacts`]; no
//! stage mutates the request behind the others' backs. Precedence, first
//! decided stage wins:
//!
//! 1. query-string override (`mobile=1` / `mobile=0`)
//! 2. a decision attached by an earlier stage
//! 3. the mobile cookie (`"yes"` means mobile, any other value means not)
//! 4. the parsed [`BrowserInfo`] mobile fact
//! 5. case-sensitive `"mobile"` substring of the raw User-Agent

use std::collections::HashMap;

use actix_web::body::BoxBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::middleware::Next;
use actix_web::{Error, HttpMessage, HttpRequest, web};
use tracing::{debug, warn};

use crate::browsers::{self, BrowserInfo};

pub const MOBILE_COOKIE_YES: &str = "yes";
pub const MOBILE_COOKIE_NO: &str = "no";

/// Default cookie name, used when no classifier is registered in app data.
pub const DEFAULT_MOBILE_COOKIE: &str = "mobile";

/// The per-request mobile decision, carried in request extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MobileDecision(pub bool);

impl MobileDecision {
    pub fn is_mobile(self) -> bool {
        self.0
    }

    pub fn cookie_value(self) -> &'static str {
        if self.0 {
            MOBILE_COOKIE_YES
        } else {
            MOBILE_COOKIE_NO
        }
    }
}

/// Everything the classifier is allowed to look at for one request.
#[derive(Debug, Default)]
pub struct RequestFacts<'a> {
    pub query_mobile: Option<&'a str>,
    pub cookie: Option<&'a str>,
    pub browser: Option<&'a BrowserInfo>,
    pub user_agent: &'a str,
}

/// Mobile classifier with an explicitly configured cookie name.
#[derive(Debug, Clone)]
pub struct MobileClassifier {
    cookie_name: String,
}

impl MobileClassifier {
    pub fn new(cookie_name: impl Into<String>) -> Self {
        Self {
            cookie_name: cookie_name.into(),
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Run the classification pipeline. The override stage runs strictly
    /// first, so its decision is what every later stage sees.
    pub fn classify(&self, facts: &RequestFacts<'_>) -> MobileDecision {
        let decision = Self::stage_query_override(facts, None);
        let decision = Self::stage_cookie(facts, decision);
        let decision = Self::stage_browser(facts, decision);
        MobileDecision(Self::stage_ua_fallback(facts, decision))
    }

    fn stage_query_override(facts: &RequestFacts<'_>, prior: Option<bool>) -> Option<bool> {
        if prior.is_some() {
            return prior;
        }
        match facts.query_mobile {
            Some("1") => Some(true),
            Some("0") => Some(false),
            _ => None,
        }
    }

    fn stage_cookie(facts: &RequestFacts<'_>, prior: Option<bool>) -> Option<bool> {
        if prior.is_some() {
            return prior;
        }
        facts.cookie.map(|value| value == MOBILE_COOKIE_YES)
    }

    fn stage_browser(facts: &RequestFacts<'_>, prior: Option<bool>) -> Option<bool> {
        if prior.is_some() {
            return prior;
        }
        facts.browser.and_then(|browser| browser.mobile)
    }

    fn stage_ua_fallback(facts: &RequestFacts<'_>, prior: Option<bool>) -> bool {
        prior.unwrap_or_else(|| facts.user_agent.contains("mobile"))
    }
}

/// Read the decision the middleware attached to the request.
pub fn mobile_decision(req: &HttpRequest) -> MobileDecision {
    req.extensions()
        .get::<MobileDecision>()
        .copied()
        .unwrap_or(MobileDecision(false))
}

pub struct ClassifyMiddleware;

impl ClassifyMiddleware {
    /// Parse the User-Agent, decide mobile-ness, attach both to the request,
    /// and refresh the mobile cookie on the response.
    pub async fn classify(
        req: ServiceRequest,
        next: Next<BoxBody>,
    ) -> Result<ServiceResponse<BoxBody>, Error> {
        let classifier = req
            .app_data::<web::Data<MobileClassifier>>()
            .map(|data| data.get_ref().clone())
            .unwrap_or_else(|| MobileClassifier::new(DEFAULT_MOBILE_COOKIE));

        let user_agent = req
            .headers()
            .get(header::USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
            .to_string();

        let query = web::Query::<HashMap<String, String>>::from_query(req.query_string())
            .map(|q| q.into_inner())
            .unwrap_or_default();
        let cookie_value = req
            .cookie(classifier.cookie_name())
            .map(|c| c.value().to_string());

        let browser = browsers::parse_ua(&user_agent);
        let decision = classifier.classify(&RequestFacts {
            query_mobile: query.get("mobile").map(String::as_str),
            cookie: cookie_value.as_deref(),
            browser: Some(&browser),
            user_agent: &user_agent,
        });
        debug!(
            "Classified request: mobile={} browser={:?}",
            decision.is_mobile(),
            browser.browser
        );

        {
            let mut extensions = req.extensions_mut();
            extensions.insert(browser);
            extensions.insert(decision);
        }

        let mut res = next.call(req).await?;

        let mut cookie = Cookie::new(
            classifier.cookie_name().to_string(),
            decision.cookie_value(),
        );
        cookie.set_path("/");
        if let Err(e) = res.response_mut().add_cookie(&cookie) {
            warn!("Failed to set mobile cookie: {}", e);
        }

        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> MobileClassifier {
        MobileClassifier::new(DEFAULT_MOBILE_COOKIE)
    }

    fn mobile_browser() -> BrowserInfo {
        BrowserInfo {
            mobile: Some(true),
            ..BrowserInfo::default()
        }
    }

    #[test]
    fn test_query_override_wins_over_everything() {
        let browser = BrowserInfo {
            mobile: Some(false),
            ..BrowserInfo::default()
        };
        let facts = RequestFacts {
            query_mobile: Some("1"),
            cookie: Some("no"),
            browser: Some(&browser),
            user_agent: "Desktop/1.0",
        };
        assert!(classifier().classify(&facts).is_mobile());

        let browser = mobile_browser();
        let facts = RequestFacts {
            query_mobile: Some("0"),
            cookie: Some("yes"),
            browser: Some(&browser),
            user_agent: "something mobile",
        };
        assert!(!classifier().classify(&facts).is_mobile());
    }

    #[test]
    fn test_unrecognized_query_value_is_ignored() {
        let facts = RequestFacts {
            query_mobile: Some("maybe"),
            cookie: Some("yes"),
            ..RequestFacts::default()
        };
        assert!(classifier().classify(&facts).is_mobile());
    }

    #[test]
    fn test_cookie_beats_browser_facts() {
        let browser = mobile_browser();
        let facts = RequestFacts {
            cookie: Some("no"),
            browser: Some(&browser),
            user_agent: "mobile",
            ..RequestFacts::default()
        };
        assert!(!classifier().classify(&facts).is_mobile());
    }

    #[test]
    fn test_cookie_yes_means_mobile_anything_else_means_not() {
        let facts = RequestFacts {
            cookie: Some("yes"),
            ..RequestFacts::default()
        };
        assert!(classifier().classify(&facts).is_mobile());

        let facts = RequestFacts {
            cookie: Some("true"),
            ..RequestFacts::default()
        };
        assert!(!classifier().classify(&facts).is_mobile());
    }

    #[test]
    fn test_browser_facts_beat_ua_fallback() {
        let browser = BrowserInfo {
            mobile: Some(false),
            ..BrowserInfo::default()
        };
        let facts = RequestFacts {
            browser: Some(&browser),
            user_agent: "some mobile thing",
            ..RequestFacts::default()
        };
        assert!(!classifier().classify(&facts).is_mobile());
    }

    #[test]
    fn test_absent_browser_mobile_falls_through_to_ua() {
        // mobile: None must not decide anything
        let browser = BrowserInfo::default();
        let facts = RequestFacts {
            browser: Some(&browser),
            user_agent: "some mobile thing",
            ..RequestFacts::default()
        };
        assert!(classifier().classify(&facts).is_mobile());
    }

    #[test]
    fn test_ua_substring_fallback_is_case_sensitive() {
        let facts = RequestFacts {
            user_agent: "Mozilla/5.0 Mobile",
            ..RequestFacts::default()
        };
        assert!(!classifier().classify(&facts).is_mobile());

        let facts = RequestFacts {
            user_agent: "Mozilla/5.0 mobile",
            ..RequestFacts::default()
        };
        assert!(classifier().classify(&facts).is_mobile());
    }

    #[test]
    fn test_nothing_known_means_not_mobile() {
        let facts = RequestFacts::default();
        assert!(!classifier().classify(&facts).is_mobile());
    }
}
