pub mod r#trait {
    pub use super::trait_::*;
}
#[path = "trait.rs"]
mod trait_;

#[cfg(any(test, feature = "mock-services"))]
mod mock;

pub use r#trait::{UserField, UserQuery, UserRepository};

#[cfg(any(test, feature = "mock-services"))]
pub use mock::MockUserRepository;

#[cfg(test)]
mod tests;
