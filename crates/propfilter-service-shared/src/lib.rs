//! Shared infrastructure for the property filter HTTP service.
//!
//! This crate provides the HTTP glue around `propfilter-lib`:
//!
//! - [`build_router`]: The `POST /` route, the not-found fallback and the middleware stack
//! - [`filter_properties`]: The filter handler
//! - [`ApiError`]: Classified request failures
//! - [`ErrorChain`]: Ordered error-to-response translation
//! - [`ServiceConfig`]: Environment-driven configuration
//! - [`logging`]: Structured JSON logging setup
//! - [`middleware`]: Request ID propagation, request spans and panic capture
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  axum Handler                                               │
//! │  - Parse request JSON                                       │
//! │  - Validate the payload                                     │
//! │  - Run the propfilter-lib filter step                       │
//! │  - Reshape the surviving records                            │
//! └──────────────────────────┬──────────────────────────────────┘
//!                            │ Err(ApiError)
//! ┌──────────────────────────▼──────────────────────────────────┐
//! │  translate_errors middleware → ErrorChain                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Testing Support
//!
//! The [`test_utils`] module provides fixtures and ready-made routers. Enable
//! the `test-utils` feature to access it from dependent crates.

mod chain;
pub mod config;
mod error;
mod handler;
pub mod logging;
pub mod middleware;
mod request;
mod response;
mod router;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use chain::{
    classify_malformed_body, not_found, respond_terse, respond_verbose, translate_errors,
    Disposition, ErrorChain, Stage,
};
pub use config::{load_dotenv, ConfigError, Environment, ServiceConfig};
pub use error::{
    ApiError, ErrorKind, MALFORMED_BODY_MESSAGE, MISSING_PAYLOAD_MESSAGE, NOT_FOUND_MESSAGE,
};
pub use handler::filter_properties;
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use middleware::{extract_or_generate_request_id, RequestId, RequestSpanLayer};
pub use request::{FilterRequest, Validate};
pub use response::FilterResponse;
pub use router::build_router;
pub use state::AppState;
