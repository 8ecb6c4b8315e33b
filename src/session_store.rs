//! # Session Store Module
//!
//! Remembers, per chat, the image a user sent most recently. Each chat holds
//! exactly one "current image" until a newer photo replaces it.
//!
//! # Expiry
//!
//! Without a TTL entries live as long as the process. With a TTL, entries
//! older than the TTL behave as missing and are pruned lazily.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use teloxide::types::ChatId;

use crate::errors::BotError;

/// Opaque handle of a received image, resolvable by the transport
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageRef(pub String);

impl std::fmt::Display for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-chat storage of the last received image
pub trait SessionStore: Send + Sync {
    /// Remember `image` as the current image of `chat`, replacing any previous one
    fn put(&self, chat: ChatId, image: ImageRef);

    /// Current image of `chat`
    fn get(&self, chat: ChatId) -> Result<ImageRef, BotError>;

    /// Forget the current image of `chat`
    fn clear(&self, chat: ChatId);

    /// Number of chats with a live session
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone)]
struct Entry {
    image: ImageRef,
    stored_at: Instant,
}

/// Thread-safe in-memory session store
///
/// Uses `Mutex<HashMap<>>` internally so chats handled concurrently by the
/// dispatcher can read and write their sessions safely.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    entries: Mutex<HashMap<ChatId, Entry>>,
    ttl: Option<Duration>,
}

impl InMemorySessionStore {
    /// Create a store whose entries never expire
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose entries expire `ttl` after they were stored
    pub fn with_ttl(ttl: Option<Duration>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    fn is_expired(&self, entry: &Entry, now: Instant) -> bool {
        self.ttl
            .is_some_and(|ttl| now.saturating_duration_since(entry.stored_at) >= ttl)
    }

    fn prune(&self, entries: &mut HashMap<ChatId, Entry>, now: Instant) {
        if self.ttl.is_some() {
            entries.retain(|_, entry| !self.is_expired(entry, now));
        }
    }
}

impl SessionStore for InMemorySessionStore {
    fn put(&self, chat: ChatId, image: ImageRef) {
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        self.prune(&mut entries, now);
        entries.insert(
            chat,
            Entry {
                image,
                stored_at: now,
            },
        );
    }

    fn get(&self, chat: ChatId) -> Result<ImageRef, BotError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        match entries.get(&chat) {
            Some(entry) if self.is_expired(entry, now) => {
                entries.remove(&chat);
                Err(BotError::SessionNotFound)
            }
            Some(entry) => Ok(entry.image.clone()),
            None => Err(BotError::SessionNotFound),
        }
    }

    fn clear(&self, chat: ChatId) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&chat);
    }

    fn len(&self) -> usize {
        let now = Instant::now();
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries
            .values()
            .filter(|entry| !self.is_expired(entry, now))
            .count()
    }
}
