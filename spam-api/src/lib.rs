//! spam-api: HTTP front end for the spam classifier
//!
//! Serves a frozen model produced by `spam-train`.
//!
//! # Endpoints
//!
//! - `GET /`: liveness message
//! - `GET /health`: service and model details
//! - `POST /predict?threshold=0.5`: body `{"message": "..."}`, answers
//!   `{"result": "spam"|"ham", "confidence": f64, "threshold_used": f64}`
//!
//! Invalid input is answered with 422 and internal failures with 500, both
//! as `{"detail": "..."}`.

pub mod config;
pub mod error;
pub mod handlers;
pub mod server;

pub use config::ApiConfig;
pub use error::{ApiError, ConfigError};
pub use handlers::AppState;
pub use server::{cors_layer, router};
