//! Request error handling shared by every route

pub mod error;

pub use error::{
    domain_error_response, internal_error_response, json_error_handler, query_error_handler,
    ApiError, ApiResult,
};
