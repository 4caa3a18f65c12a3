use serde::{Deserialize, Serialize};
use validator::Validate;

use tg_core::{PasswordChange, ProfileChanges, UserQuery};
use tg_shared::types::{Pagination, DEFAULT_PAGE_SIZE};

use super::{validate_email_syntax, validate_phone_number, validate_username};

/// Partial profile update; absent fields stay unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(custom = "validate_username")]
    pub username: Option<String>,
    #[validate(custom = "validate_email_syntax")]
    pub email: Option<String>,
    #[validate(custom = "validate_phone_number")]
    pub phone_number: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileChanges {
    fn from(request: UpdateProfileRequest) -> Self {
        Self {
            username: request.username,
            email: request.email,
            phone_number: request.phone_number,
        }
    }
}

/// Password rules are enforced by the account service so its error order holds
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub old_password: String,
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub new_password: String,
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub new_password2: String,
}

impl From<ChangePasswordRequest> for PasswordChange {
    fn from(request: ChangePasswordRequest) -> Self {
        Self {
            old_password: request.old_password,
            new_password: request.new_password,
            new_password2: request.new_password2,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ListUsersQuery {
    #[validate(range(min = 1, message = "Page must be at least 1."))]
    pub page: Option<u32>,
    #[validate(range(min = 1, message = "Page size must be at least 1."))]
    pub page_size: Option<u32>,
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

impl From<ListUsersQuery> for UserQuery {
    fn from(query: ListUsersQuery) -> Self {
        Self {
            pagination: Pagination::new(
                query.page.unwrap_or(1),
                query.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            ),
            search: query
                .search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            is_active: query.is_active,
        }
    }
}
