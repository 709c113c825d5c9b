//! HTTP surface of the predictor.

pub mod dto;
mod error;
mod routes;

pub use error::ApiError;
pub use routes::{router, AppState, PIPELINE_ACK, WELCOME_MESSAGE};
