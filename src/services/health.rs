use actix_web::{HttpResponse, Responder, web};
use chrono::{DateTime, Utc};

/// Program start time, recorded once in main and shared as app data.
#[derive(Clone)]
pub struct AppStartTime {
    pub start_datetime: DateTime<Utc>,
}

pub struct HealthService;

impl HealthService {
    pub async fn health_check(start_time: web::Data<AppStartTime>) -> impl Responder {
        let uptime = (Utc::now() - start_time.start_datetime).num_seconds();
        HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "uptime_seconds": uptime,
        }))
    }
}
