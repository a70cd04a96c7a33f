use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use std::fmt;

#[derive(Debug, Clone)]
pub enum FeedbackerError {
    DatabaseConnection(String),
    DatabaseOperation(String),
    Template(String),
    Validation(String),
    Config(String),
    FileOperation(String),
}

impl FeedbackerError {
    /// Stable error code, used in logs
    pub fn code(&self) -> &'static str {
        match self {
            FeedbackerError::DatabaseConnection(_) => "E001",
            FeedbackerError::DatabaseOperation(_) => "E002",
            FeedbackerError::Template(_) => "E003",
            FeedbackerError::Validation(_) => "E004",
            FeedbackerError::Config(_) => "E005",
            FeedbackerError::FileOperation(_) => "E006",
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            FeedbackerError::DatabaseConnection(_) => "Database Connection Error",
            FeedbackerError::DatabaseOperation(_) => "Database Operation Error",
            FeedbackerError::Template(_) => "Template Error",
            FeedbackerError::Validation(_) => "Validation Error",
            FeedbackerError::Config(_) => "Configuration Error",
            FeedbackerError::FileOperation(_) => "File Operation Error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            FeedbackerError::DatabaseConnection(msg) => msg,
            FeedbackerError::DatabaseOperation(msg) => msg,
            FeedbackerError::Template(msg) => msg,
            FeedbackerError::Validation(msg) => msg,
            FeedbackerError::Config(msg) => msg,
            FeedbackerError::FileOperation(msg) => msg,
        }
    }
}

impl fmt::Display for FeedbackerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_type(), self.message())
    }
}

impl std::error::Error for FeedbackerError {}

// Convenience constructors
impl FeedbackerError {
    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        FeedbackerError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        FeedbackerError::DatabaseOperation(msg.into())
    }

    pub fn template<T: Into<String>>(msg: T) -> Self {
        FeedbackerError::Template(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        FeedbackerError::Validation(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        FeedbackerError::Config(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        FeedbackerError::FileOperation(msg.into())
    }
}

impl From<sea_orm::DbErr> for FeedbackerError {
    fn from(err: sea_orm::DbErr) -> Self {
        FeedbackerError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for FeedbackerError {
    fn from(err: std::io::Error) -> Self {
        FeedbackerError::FileOperation(err.to_string())
    }
}

// Persistence and rendering failures have no local recovery path; they
// surface as plain 500s through the framework.
impl ResponseError for FeedbackerError {
    fn status_code(&self) -> StatusCode {
        match self {
            FeedbackerError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(("Content-Type", "text/plain; charset=utf-8"))
            .body(self.error_type().to_string())
    }
}

pub type Result<T> = std::result::Result<T, FeedbackerError>;
