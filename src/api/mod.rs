mod handlers;
mod routes;

pub use handlers::{AppState, ErrorResponse, IngestResponse, SuccessResponse, TrafficResponse};
pub use routes::create_api_router;
