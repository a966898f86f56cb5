//! HTTP API module for the commission engine.
//!
//! This module provides the REST endpoint that turns period packets and an
//! agent configuration into a commission report.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{DownlineRequest, PacketRequest, ReportRequest, ResolvedRequest};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
