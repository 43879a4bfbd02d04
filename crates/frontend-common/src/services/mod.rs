pub mod api_wrapper;

pub use api_wrapper::{fetch_json, with_error_handling};
