use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use tg_shared::types::PaginatedResponse;
use tg_shared::validation::password_violations;

use crate::domain::entities::User;
use crate::domain::value_objects::{ProfileChanges, UserProfile};
use crate::errors::{AuthError, DomainError, DomainResult, ValidationError};
use crate::repositories::{UserField, UserQuery, UserRepository};
use crate::services::password::PasswordHasher;

/// Input of a password change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordChange {
    pub old_password: String,
    pub new_password: String,
    pub new_password2: String,
}

/// Superuser account to create when its username is still free
#[derive(Clone, PartialEq, Eq)]
pub struct NewSuperuser {
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
}

/// Read, update and delete accounts on behalf of an authenticated actor
///
/// The actor is the account id carried by the access token. It is reloaded on
/// every call so deactivated or deleted accounts lose access immediately.
pub struct AccountService<U: UserRepository> {
    user_repository: Arc<U>,
    passwords: PasswordHasher,
}

impl<U: UserRepository> AccountService<U> {
    pub fn new(user_repository: Arc<U>, passwords: PasswordHasher) -> Self {
        Self {
            user_repository,
            passwords,
        }
    }

    pub async fn detail(&self, actor_id: Uuid, id: Uuid) -> DomainResult<UserProfile> {
        let (_, target) = self.authorize(actor_id, id).await?;
        Ok(UserProfile::from(target))
    }

    /// Apply a partial profile update; changed unique fields are re-checked
    pub async fn update(
        &self,
        actor_id: Uuid,
        id: Uuid,
        changes: ProfileChanges,
    ) -> DomainResult<UserProfile> {
        let (_, mut target) = self.authorize(actor_id, id).await?;
        if changes.is_empty() {
            return Ok(UserProfile::from(target));
        }

        for (field, value) in [
            (UserField::Username, &changes.username),
            (UserField::Email, &changes.email),
            (UserField::PhoneNumber, &changes.phone_number),
        ] {
            let Some(value) = value else { continue };
            if field.value_of(&target).eq_ignore_ascii_case(value) {
                continue;
            }
            if self.user_repository.exists(field, value, Some(target.id)).await? {
                return Err(AuthError::DuplicateIdentity {
                    field: field.as_str().to_string(),
                }
                .into());
            }
        }

        if let Some(username) = changes.username {
            target.username = username;
        }
        if let Some(email) = changes.email {
            target.email = email;
        }
        if let Some(phone_number) = changes.phone_number {
            target.phone_number = phone_number;
        }
        target.touch();

        let updated = self.user_repository.update(target).await?;
        info!(user_id = %updated.id, actor_id = %actor_id, event = "profile_updated", "Profile updated");
        Ok(UserProfile::from(updated))
    }

    pub async fn change_password(
        &self,
        actor_id: Uuid,
        id: Uuid,
        change: PasswordChange,
    ) -> DomainResult<()> {
        let (_, mut target) = self.authorize(actor_id, id).await?;

        if change.new_password != change.new_password2 {
            return Err(ValidationError::field("new_password2", "Passwords do not match.").into());
        }
        if let Some(violation) = password_violations(&change.new_password).first() {
            return Err(ValidationError::field("new_password", *violation).into());
        }
        if !self
            .passwords
            .verify(&change.old_password, &target.password_hash)
            .await?
        {
            return Err(ValidationError::field("old_password", "Old password is incorrect.").into());
        }
        if change.new_password == change.old_password {
            return Err(ValidationError::field(
                "new_password",
                "New password must differ from the old one.",
            )
            .into());
        }

        let hash = self.passwords.hash(&change.new_password).await?;
        target.set_password_hash(hash);
        self.user_repository.update(target).await?;

        info!(user_id = %id, actor_id = %actor_id, event = "password_changed", "Password changed");
        Ok(())
    }

    /// Soft delete: the record stays but disappears from every lookup
    pub async fn delete(&self, actor_id: Uuid, id: Uuid) -> DomainResult<()> {
        let (_, mut target) = self.authorize(actor_id, id).await?;
        target.soft_delete();
        self.user_repository.update(target).await?;

        info!(user_id = %id, actor_id = %actor_id, event = "account_deleted", "Account soft-deleted");
        Ok(())
    }

    /// Staff-only listing, newest first
    pub async fn list(
        &self,
        actor_id: Uuid,
        query: UserQuery,
    ) -> DomainResult<PaginatedResponse<UserProfile>> {
        let actor = self.actor(actor_id).await?;
        if !actor.is_staff {
            return Err(DomainError::Forbidden);
        }

        let (users, total) = self.user_repository.list(&query).await?;
        let profiles = users.iter().map(UserProfile::from).collect();
        Ok(PaginatedResponse::new(profiles, query.pagination, total))
    }

    /// Create the superuser unless an account already holds its username
    ///
    /// Returns the created profile, or `None` when nothing was done.
    pub async fn ensure_superuser(&self, seed: NewSuperuser) -> DomainResult<Option<UserProfile>> {
        if self
            .user_repository
            .exists(UserField::Username, &seed.username, None)
            .await?
        {
            info!(username = %seed.username, event = "superuser_exists", "Superuser already exists");
            return Ok(None);
        }

        let hash = self.passwords.hash(&seed.password).await?;
        let user = self
            .user_repository
            .create(User::new_superuser(
                seed.username,
                seed.email,
                seed.phone_number,
                hash,
            ))
            .await?;

        info!(user_id = %user.id, event = "superuser_created", "Superuser created");
        Ok(Some(UserProfile::from(user)))
    }

    async fn actor(&self, actor_id: Uuid) -> DomainResult<User> {
        match self.user_repository.find_by_id(actor_id).await? {
            Some(actor) if actor.can_login() => Ok(actor),
            _ => Err(DomainError::Unauthorized),
        }
    }

    /// Load actor and target; only the owner or a superuser gets through
    async fn authorize(&self, actor_id: Uuid, id: Uuid) -> DomainResult<(User, User)> {
        let actor = self.actor(actor_id).await?;
        if !actor.can_manage(id) {
            return Err(DomainError::Forbidden);
        }
        let target = self
            .user_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User"))?;
        Ok((actor, target))
    }
}
