pub mod feedback;
pub mod health;
pub mod render;

pub use feedback::FeedbackService;
pub use health::{AppStartTime, HealthService};
