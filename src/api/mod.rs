mod auth;
mod client;
mod dashboard;
mod ml;
mod terrain;

pub use auth::{SignInRequest, SignUpRequest};
pub use client::ApiClient;
pub use ml::{DEFAULT_MODEL_ID, EstimateRequest};
