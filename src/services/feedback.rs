//! Feedback routing and submission handling
//!
//! One router selects exactly one handler per request: the
//! legacy-compatibility handler when the legacy marker is present, the
//! handler a known `formname` maps to, or the mobile/desktop default from the
//! classifier's decision.

use std::collections::HashMap;
use std::sync::Arc;

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, web};
use once_cell::sync::Lazy;
use tracing::{debug, info};

use crate::browsers;
use crate::classify;
use crate::errors::Result;
use crate::forms::{FeedbackForm, FormErrors};
use crate::prodchan;
use crate::services::render::{escape_html, render_template};
use crate::storage::{NewOpinion, OpinionStore};

/// Fixed destination after a successful submission.
pub const THANKS_URL: &str = "/thanks";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackRoute {
    DesktopStable,
    MobileStable,
    LegacyCompat,
}

/// Route table from prodchan-shaped names to handlers, built once at startup.
static FEEDBACK_ROUTES: Lazy<HashMap<&'static str, FeedbackRoute>> = Lazy::new(|| {
    HashMap::from([
        ("firefox.desktop.stable", FeedbackRoute::DesktopStable),
        ("firefox.android.stable", FeedbackRoute::MobileStable),
        ("firefox.firefoxos.stable", FeedbackRoute::MobileStable),
    ])
});

/// Select the handler for a request. The legacy marker overrides every other
/// signal; unknown form names are treated as absent, never as an error.
pub fn select_route(
    formname: Option<&str>,
    has_legacy_marker: bool,
    mobile: bool,
) -> FeedbackRoute {
    if has_legacy_marker {
        return FeedbackRoute::LegacyCompat;
    }
    if let Some(route) = formname.and_then(|name| FEEDBACK_ROUTES.get(name)) {
        return *route;
    }
    if mobile {
        FeedbackRoute::MobileStable
    } else {
        FeedbackRoute::DesktopStable
    }
}

enum SubmissionOutcome {
    Saved(HttpResponse),
    Invalid(FormErrors),
}

pub struct FeedbackService;

impl FeedbackService {
    /// GET handler for `/feedback` and `/feedback/{formname}`.
    pub async fn show_form(req: HttpRequest) -> Result<HttpResponse> {
        let formname = req.match_info().get("formname");
        let mobile = classify::mobile_decision(&req).is_mobile();

        match select_route(formname, false, mobile) {
            FeedbackRoute::MobileStable => Self::render_mobile_form(&FeedbackForm::default(), None),
            _ => Self::render_desktop_forms(&FeedbackForm::default(), None),
        }
    }

    /// POST handler for `/feedback` and `/feedback/{formname}`.
    pub async fn submit(
        req: HttpRequest,
        form: web::Form<FeedbackForm>,
        store: web::Data<Arc<dyn OpinionStore>>,
    ) -> Result<HttpResponse> {
        let form = form.into_inner();
        let formname = req.match_info().get("formname");
        let mobile = classify::mobile_decision(&req).is_mobile();
        let route = select_route(formname, form.has_legacy_marker(), mobile);
        debug!("Dispatching feedback submission to {:?}", route);

        let store = store.get_ref().as_ref();
        match route {
            FeedbackRoute::DesktopStable => Self::desktop_stable_feedback(&req, form, store).await,
            FeedbackRoute::MobileStable => Self::mobile_stable_feedback(&req, form, store).await,
            FeedbackRoute::LegacyCompat => Self::legacy_feedback(&req, form, store).await,
        }
    }

    /// GET handler for the thanks page, mobile variant when applicable.
    pub async fn thanks(req: HttpRequest) -> Result<HttpResponse> {
        let template = if classify::mobile_decision(&req).is_mobile() {
            "mobile/thanks.html"
        } else {
            "thanks.html"
        };
        let body = render_template(template, &[])?;
        Ok(HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body))
    }

    async fn desktop_stable_feedback(
        req: &HttpRequest,
        form: FeedbackForm,
        store: &dyn OpinionStore,
    ) -> Result<HttpResponse> {
        match Self::save_submission(req, &form, store).await? {
            SubmissionOutcome::Saved(response) => Ok(response),
            SubmissionOutcome::Invalid(errors) => Self::render_desktop_forms(&form, Some(errors)),
        }
    }

    async fn mobile_stable_feedback(
        req: &HttpRequest,
        form: FeedbackForm,
        store: &dyn OpinionStore,
    ) -> Result<HttpResponse> {
        match Self::save_submission(req, &form, store).await? {
            SubmissionOutcome::Saved(response) => Ok(response),
            SubmissionOutcome::Invalid(errors) => Self::render_mobile_form(&form, Some(errors)),
        }
    }

    /// Entry point for legacy clients that cannot follow the current
    /// protocol. They only ever mean "sad", whatever their wire format says,
    /// and they render no HTML, so validation failure is a bare 400.
    async fn legacy_feedback(
        req: &HttpRequest,
        mut form: FeedbackForm,
        store: &dyn OpinionStore,
    ) -> Result<HttpResponse> {
        form.happy = Some("0".to_string());

        match Self::save_submission(req, &form, store).await? {
            SubmissionOutcome::Saved(response) => Ok(response),
            SubmissionOutcome::Invalid(_) => {
                debug!("Legacy feedback submission failed validation");
                Ok(HttpResponse::BadRequest().finish())
            }
        }
    }

    /// Validate and persist one submission. Validation failure is returned
    /// to the caller with the form errors intact; persistence failure
    /// propagates.
    async fn save_submission(
        req: &HttpRequest,
        form: &FeedbackForm,
        store: &dyn OpinionStore,
    ) -> Result<SubmissionOutcome> {
        let valid = match form.validate() {
            Ok(valid) => valid,
            Err(errors) => return Ok(SubmissionOutcome::Invalid(errors)),
        };

        let browser = browsers::browser_info(req);

        // Most platforms are not different enough between versions to care.
        // Windows is.
        let platform = match (
            browser.platform.as_deref(),
            browser.platform_version.as_deref(),
        ) {
            (Some("Windows"), Some(version)) => Some(format!("Windows {}", version)),
            (platform, _) => platform.map(String::from),
        };

        let user_agent = req
            .headers()
            .get(header::USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
            .to_string();

        let opinion = NewOpinion {
            happy: valid.happy,
            description: valid.description.clone(),
            url: valid.url.clone(),
            prodchan: prodchan::resolve(&browser).to_string(),
            user_agent,
            browser: browser.browser.clone(),
            browser_version: browser.browser_version.clone(),
            platform,
            locale: request_locale(req),
            manufacturer: valid.manufacturer.clone(),
            device: valid.device.clone(),
        };

        let opinion_id = store.insert_opinion(opinion).await?;
        if valid.wants_email_contact()
            && let Some(email) = valid.email.as_deref()
        {
            store.insert_email(opinion_id, email).await?;
        }
        info!("Saved feedback opinion id={}", opinion_id);

        Ok(SubmissionOutcome::Saved(
            HttpResponse::Found()
                .insert_header((header::LOCATION, THANKS_URL))
                .finish(),
        ))
    }

    /// Desktop page carries two variants of the same form because the copy
    /// changes with the happy value; a failed submission lands back in the
    /// slot matching its happy hint.
    fn render_desktop_forms(
        form: &FeedbackForm,
        errors: Option<FormErrors>,
    ) -> Result<HttpResponse> {
        let pristine = FeedbackForm::default();
        let (happy_form, happy_errors, sad_form, sad_errors) = if form.happy_hint() {
            (form, errors, &pristine, None)
        } else {
            (&pristine, None, form, errors)
        };

        let body = render_template(
            "feedback.html",
            &[
                ("HAPPY_FORM", form_fragment(true, happy_form, happy_errors)),
                ("SAD_FORM", form_fragment(false, sad_form, sad_errors)),
            ],
        )?;
        Ok(HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body))
    }

    fn render_mobile_form(form: &FeedbackForm, errors: Option<FormErrors>) -> Result<HttpResponse> {
        let body = render_template(
            "mobile/feedback.html",
            &[("FORM", form_fragment(form.happy_hint(), form, errors))],
        )?;
        Ok(HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body))
    }
}

/// First tag of the Accept-Language header, if any.
fn request_locale(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(header::ACCEPT_LANGUAGE)?
        .to_str()
        .ok()?
        .split(',')
        .next()?
        .split(';')
        .next()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
}

/// Build one form's HTML with submitted values echoed back and field-level
/// error indicators inline.
fn form_fragment(initial_happy: bool, form: &FeedbackForm, errors: Option<FormErrors>) -> String {
    let happy_value = match form.happy.as_deref() {
        Some(value) => escape_html(value),
        None if initial_happy => "1".to_string(),
        None => "0".to_string(),
    };

    let mut html = String::new();
    html.push_str("<form method=\"post\" action=\"/feedback\">\n");
    html.push_str(&format!(
        "  <input type=\"hidden\" name=\"happy\" value=\"{}\">\n",
        happy_value
    ));
    if let Some(message) = errors.and_then(|e| e.happy) {
        html.push_str(&format!("  <span class=\"error\">{}</span>\n", message));
    }
    html.push_str(&format!(
        "  <textarea name=\"description\" placeholder=\"Tell us what happened\">{}</textarea>\n",
        escape_html(form.description.as_deref().unwrap_or(""))
    ));
    if let Some(message) = errors.and_then(|e| e.description) {
        html.push_str(&format!("  <span class=\"error\">{}</span>\n", message));
    }
    html.push_str(&format!(
        "  <input type=\"url\" name=\"url\" placeholder=\"http://\" value=\"{}\">\n",
        escape_html(form.url.as_deref().unwrap_or(""))
    ));
    html.push_str(&format!(
        "  <input type=\"email\" name=\"email\" value=\"{}\">\n",
        escape_html(form.email.as_deref().unwrap_or(""))
    ));
    html.push_str(
        "  <label><input type=\"checkbox\" name=\"email_ok\" value=\"1\"> \
         You may contact me about this feedback</label>\n",
    );
    html.push_str("  <button type=\"submit\">Send feedback</button>\n</form>");
    html
}
