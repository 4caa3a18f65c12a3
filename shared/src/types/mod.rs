//! Type definitions shared by the API and the core
//!
//! - `pagination` - Pagination for list endpoints
//! - `response` - API response wrappers

pub mod pagination;
pub mod response;

pub use pagination::{PaginatedResponse, Pagination, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use response::{HealthResponse, MessageResponse};
