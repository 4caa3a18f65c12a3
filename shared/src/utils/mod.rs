//! Common utility functions

pub mod phone;
pub mod validation;

pub use phone::{is_valid_phone_number, mask_phone_number};
pub use validation::*;
