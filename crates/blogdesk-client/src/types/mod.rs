pub mod payload;
pub mod request;
pub mod response;

pub use payload::Payload;
pub use request::{ApiRequest, WireRequest};
pub use response::ApiResponse;
