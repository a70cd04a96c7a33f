pub mod opinion;
pub mod opinion_email;

pub use opinion::Entity as OpinionEntity;
pub use opinion_email::Entity as OpinionEmailEntity;
