pub mod app;
pub mod config;
pub mod server;

pub use app::{App, AssessmentView, SubmitError};
pub use config::AppConfig;
