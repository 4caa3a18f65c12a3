//! In-memory collaborators for tests and local runs
//!
//! Expiry follows `tokio::time`, so tests can move the clock with
//! `tokio::time::advance` under a paused runtime.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::errors::{DomainError, DomainResult};

use super::traits::{EphemeralStore, Mailer};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| now < at)
    }
}

/// Ephemeral store backed by a map with lazy expiry
#[derive(Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation fail as if the store were unreachable
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Live keys, sorted
    pub async fn keys(&self) -> Vec<String> {
        let now = Instant::now();
        let entries = self.entries.lock().await;
        let mut keys: Vec<String> = entries
            .iter()
            .filter(|(_, entry)| entry.is_live(now))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        keys
    }

    fn check_available(&self) -> DomainResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::internal("ephemeral store unavailable"));
        }
        Ok(())
    }

    fn expiry(ttl_seconds: u64) -> Option<Instant> {
        Some(Instant::now() + Duration::from_secs(ttl_seconds))
    }

    /// Drop `key` if it has expired, returning the live entry otherwise
    fn live_entry<'a>(entries: &'a mut HashMap<String, Entry>, key: &str) -> Option<&'a mut Entry> {
        let now = Instant::now();
        if entries.get(key).is_some_and(|entry| !entry.is_live(now)) {
            entries.remove(key);
        }
        entries.get_mut(key)
    }
}

#[async_trait]
impl EphemeralStore for InMemoryStore {
    async fn set_if_absent(&self, key: &str, value: &str, ttl_seconds: u64) -> DomainResult<bool> {
        self.check_available()?;
        let mut entries = self.entries.lock().await;
        if Self::live_entry(&mut entries, key).is_some() {
            return Ok(false);
        }
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Self::expiry(ttl_seconds),
            },
        );
        Ok(true)
    }

    async fn set_with_expiry(&self, key: &str, value: &str, ttl_seconds: u64) -> DomainResult<()> {
        self.check_available()?;
        self.entries.lock().await.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Self::expiry(ttl_seconds),
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> DomainResult<Option<String>> {
        self.check_available()?;
        let mut entries = self.entries.lock().await;
        Ok(Self::live_entry(&mut entries, key).map(|entry| entry.value.clone()))
    }

    async fn increment(&self, key: &str, ttl_on_create: u64) -> DomainResult<i64> {
        self.check_available()?;
        let mut entries = self.entries.lock().await;
        match Self::live_entry(&mut entries, key) {
            Some(entry) => {
                let current: i64 = entry.value.parse().map_err(|_| {
                    DomainError::internal("value is not an integer or out of range")
                })?;
                let next = current + 1;
                entry.value = next.to_string();
                Ok(next)
            }
            None => {
                entries.insert(
                    key.to_string(),
                    Entry {
                        value: "1".to_string(),
                        expires_at: Self::expiry(ttl_on_create),
                    },
                );
                Ok(1)
            }
        }
    }

    async fn exists(&self, key: &str) -> DomainResult<bool> {
        self.check_available()?;
        let mut entries = self.entries.lock().await;
        Ok(Self::live_entry(&mut entries, key).is_some())
    }

    async fn ttl(&self, key: &str) -> DomainResult<Option<i64>> {
        self.check_available()?;
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        Ok(Self::live_entry(&mut entries, key)
            .and_then(|entry| entry.expires_at)
            .map(|at| at.saturating_duration_since(now).as_secs() as i64))
    }

    async fn delete(&self, keys: &[String]) -> DomainResult<u64> {
        self.check_available()?;
        let mut entries = self.entries.lock().await;
        let mut removed = 0;
        for key in keys {
            if Self::live_entry(&mut entries, key).is_some() {
                entries.remove(key);
                removed += 1;
            }
        }
        Ok(removed)
    }
}

/// A message captured by [`RecordingMailer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Mailer that records messages instead of delivering them
#[derive(Clone, Default)]
pub struct RecordingMailer {
    sent: Arc<Mutex<Vec<SentMail>>>,
    should_fail: Arc<AtomicBool>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `send` fail after recording nothing
    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    pub async fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().await.clone()
    }

    /// The six-digit code in the latest message to `to`
    pub async fn last_code_for(&self, to: &str) -> Option<String> {
        let sent = self.sent.lock().await;
        sent.iter().rev().find(|mail| mail.to == to).and_then(|mail| {
            mail.body
                .split(|c: char| !c.is_ascii_digit())
                .find(|chunk| chunk.len() == 6)
                .map(str::to_string)
        })
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> DomainResult<()> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(DomainError::internal("mail transport unavailable"));
        }
        self.sent.lock().await.push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}
