mod handlers;
mod metrics;
mod request_id;
mod routes;

pub use handlers::AppError;
pub use routes::*;
