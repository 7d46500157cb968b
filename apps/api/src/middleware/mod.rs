pub mod account_ownership;
pub mod cors;
pub mod request_trace;
pub mod structured_logger;
pub mod trace_span;

pub use account_ownership::AccountOwnership;
pub use cors::cors_middleware;
pub use request_trace::{RequestTrace, TraceId, TRACE_ID_HEADER};
pub use structured_logger::StructuredLogger;
pub use trace_span::TraceSpan;
