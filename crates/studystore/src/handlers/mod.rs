pub mod activities;
pub mod error;
pub mod health;
pub mod oauth;
pub mod paged;
pub mod reports;
pub mod uploads;

pub use error::AppError;
