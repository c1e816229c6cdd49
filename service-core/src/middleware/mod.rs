pub mod tracing;

pub use self::tracing::{http_request_span, request_id_middleware};
