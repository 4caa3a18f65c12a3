pub mod user;

pub use user::{UserField, UserQuery, UserRepository};

#[cfg(any(test, feature = "mock-services"))]
pub use user::MockUserRepository;
