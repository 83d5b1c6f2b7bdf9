pub mod json_body;
pub mod response;

pub use json_body::JsonObject;
pub use response::{ApiResponse, ApiResult};
