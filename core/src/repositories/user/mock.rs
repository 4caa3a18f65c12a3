//! In-memory UserRepository for tests

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::User;
use crate::errors::{AuthError, DomainError};

use super::trait_::{UserField, UserQuery, UserRepository};

const UNIQUE_FIELDS: [UserField; 3] = [UserField::Username, UserField::Email, UserField::PhoneNumber];

/// Mock user repository keeping accounts in a map
#[derive(Clone, Default)]
pub struct MockUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account, bypassing uniqueness checks
    pub async fn insert(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }

    /// Raw lookup that also returns soft-deleted accounts
    pub async fn get_raw(&self, id: Uuid) -> Option<User> {
        self.users.read().await.get(&id).cloned()
    }

    pub async fn count(&self) -> usize {
        self.users.read().await.len()
    }

    fn conflicting_field(users: &HashMap<Uuid, User>, candidate: &User) -> Option<UserField> {
        UNIQUE_FIELDS.into_iter().find(|field| {
            users.values().any(|existing| {
                existing.id != candidate.id
                    && !existing.is_deleted
                    && field
                        .value_of(existing)
                        .eq_ignore_ascii_case(field.value_of(candidate))
            })
        })
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;
        if let Some(field) = Self::conflicting_field(&users, &user) {
            return Err(AuthError::DuplicateIdentity {
                field: field.as_str().to_string(),
            }
            .into());
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(&id).filter(|u| !u.is_deleted).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| !u.is_deleted && u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn exists(
        &self,
        field: UserField,
        value: &str,
        excluding: Option<Uuid>,
    ) -> Result<bool, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().any(|u| {
            !u.is_deleted
                && Some(u.id) != excluding
                && field.value_of(u).eq_ignore_ascii_case(value)
        }))
    }

    async fn update(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(DomainError::not_found("User"));
        }
        if !user.is_deleted {
            if let Some(field) = Self::conflicting_field(&users, &user) {
                return Err(AuthError::DuplicateIdentity {
                    field: field.as_str().to_string(),
                }
                .into());
            }
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn list(&self, query: &UserQuery) -> Result<(Vec<User>, u64), DomainError> {
        let users = self.users.read().await;
        let needle = query.search.as_ref().map(|s| s.to_lowercase());

        let mut matches: Vec<User> = users
            .values()
            .filter(|u| !u.is_deleted)
            .filter(|u| query.is_active.map_or(true, |active| u.is_active == active))
            .filter(|u| match &needle {
                Some(needle) => UNIQUE_FIELDS
                    .iter()
                    .any(|field| field.value_of(u).to_lowercase().contains(needle.as_str())),
                None => true,
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matches.len() as u64;
        let page = matches
            .into_iter()
            .skip(query.pagination.offset() as usize)
            .take(query.pagination.limit() as usize)
            .collect();
        Ok((page, total))
    }
}
