//! Classify middleware tests
//!
//! Verifies the mobile decision precedence end to end over HTTP, and that
//! the mobile cookie is refreshed on every response.

use actix_web::cookie::Cookie;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::middleware::from_fn;
use actix_web::test::{self, TestRequest};
use actix_web::{App, Error, HttpRequest, HttpResponse, web};

use feedbacker::classify::{ClassifyMiddleware, MobileClassifier, mobile_decision};

const FIREFOX_ANDROID_UA: &str =
    "Mozilla/5.0 (Android 13; Mobile; rv:109.0) Gecko/115.0 Firefox/115.0";
const FIREFOX_WINDOWS_UA: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/115.0";

/// Echoes the decision the middleware attached to the request.
async fn probe(req: HttpRequest) -> HttpResponse {
    HttpResponse::Ok().body(if mobile_decision(&req).is_mobile() {
        "mobile"
    } else {
        "desktop"
    })
}

fn probe_app(
    cookie_name: &str,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(MobileClassifier::new(cookie_name)))
        .wrap(from_fn(ClassifyMiddleware::classify))
        .route("/probe", web::get().to(probe))
}

fn mobile_cookie_value(resp: &ServiceResponse, name: &str) -> String {
    resp.response()
        .cookies()
        .find(|c| c.name() == name)
        .map(|c| c.value().to_string())
        .expect("mobile cookie should be set on every response")
}

#[tokio::test]
async fn test_query_override_forces_mobile_regardless_of_ua() {
    let app = test::init_service(probe_app("mobile")).await;

    let req = TestRequest::get()
        .uri("/probe?mobile=1")
        .insert_header((header::USER_AGENT, FIREFOX_WINDOWS_UA))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(mobile_cookie_value(&resp, "mobile"), "yes");
    let body = test::read_body(resp).await;
    assert_eq!(body, "mobile");
}

#[tokio::test]
async fn test_query_override_forces_desktop_regardless_of_ua() {
    let app = test::init_service(probe_app("mobile")).await;

    let req = TestRequest::get()
        .uri("/probe?mobile=0")
        .insert_header((header::USER_AGENT, FIREFOX_ANDROID_UA))
        .cookie(Cookie::new("mobile", "yes"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(mobile_cookie_value(&resp, "mobile"), "no");
    let body = test::read_body(resp).await;
    assert_eq!(body, "desktop");
}

#[tokio::test]
async fn test_cookie_short_circuits_ua_detection() {
    let app = test::init_service(probe_app("mobile")).await;

    let req = TestRequest::get()
        .uri("/probe")
        .insert_header((header::USER_AGENT, FIREFOX_WINDOWS_UA))
        .cookie(Cookie::new("mobile", "yes"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(mobile_cookie_value(&resp, "mobile"), "yes");
    let body = test::read_body(resp).await;
    assert_eq!(body, "mobile");
}

#[tokio::test]
async fn test_ua_detection_decides_when_nothing_else_does() {
    let app = test::init_service(probe_app("mobile")).await;

    let req = TestRequest::get()
        .uri("/probe")
        .insert_header((header::USER_AGENT, FIREFOX_ANDROID_UA))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(mobile_cookie_value(&resp, "mobile"), "yes");

    let req = TestRequest::get()
        .uri("/probe")
        .insert_header((header::USER_AGENT, FIREFOX_WINDOWS_UA))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(mobile_cookie_value(&resp, "mobile"), "no");
}

#[tokio::test]
async fn test_substring_fallback_for_unparseable_ua() {
    let app = test::init_service(probe_app("mobile")).await;

    let req = TestRequest::get()
        .uri("/probe")
        .insert_header((header::USER_AGENT, "some strange mobile thing"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(mobile_cookie_value(&resp, "mobile"), "yes");

    let req = TestRequest::get()
        .uri("/probe")
        .insert_header((header::USER_AGENT, "some strange desktop thing"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(mobile_cookie_value(&resp, "mobile"), "no");
}

#[tokio::test]
async fn test_missing_ua_treated_as_empty() {
    let app = test::init_service(probe_app("mobile")).await;

    let req = TestRequest::get().uri("/probe").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(mobile_cookie_value(&resp, "mobile"), "no");
    let body = test::read_body(resp).await;
    assert_eq!(body, "desktop");
}

#[tokio::test]
async fn test_configured_cookie_name_is_honored() {
    let app = test::init_service(probe_app("m0bile")).await;

    // The configured name is read and written; the default name is ignored
    let req = TestRequest::get()
        .uri("/probe")
        .insert_header((header::USER_AGENT, FIREFOX_WINDOWS_UA))
        .cookie(Cookie::new("m0bile", "yes"))
        .cookie(Cookie::new("mobile", "no"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(mobile_cookie_value(&resp, "m0bile"), "yes");
    let body = test::read_body(resp).await;
    assert_eq!(body, "mobile");
}
