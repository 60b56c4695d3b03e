//! In-memory store implementations for unit tests
//!
//! `MemorySessions` carries its own clock so TTL expiry can be tested without
//! waiting: `advance()` moves time forward and expired keys simply stop
//! resolving, which is exactly the only expiry signal the real store gives.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use crate::store::{EphemeralStore, PersistentStore, User};
use crate::types::{Result, WicketError};

#[derive(Clone)]
struct StoredUser {
    id: String,
    email: String,
    digest: String,
}

/// In-memory persistent store
#[derive(Default)]
pub struct MemoryUsers {
    users: Mutex<Vec<StoredUser>>,
    next_id: AtomicU64,
    nb_files: AtomicU64,
    alive: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryUsers {
    pub fn new() -> Self {
        let store = Self::default();
        store.alive.store(true, Ordering::SeqCst);
        store
    }

    pub fn set_alive(&self, alive: bool) {
        self.alive.store(alive, Ordering::SeqCst);
    }

    pub fn set_nb_files(&self, n: u64) {
        self.nb_files.store(n, Ordering::SeqCst);
    }

    /// Refuse inserts while still answering reads
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Simulate losing the user record behind a live session
    pub fn remove_user(&self, id: &str) {
        self.users.lock().unwrap().retain(|u| u.id != id);
    }

    fn check_alive(&self) -> Result<()> {
        if self.alive.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(WicketError::StoreUnavailable("memory store down".into()))
        }
    }
}

#[async_trait]
impl PersistentStore for MemoryUsers {
    async fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    async fn nb_users(&self) -> Result<u64> {
        self.check_alive()?;
        Ok(self.users.lock().unwrap().len() as u64)
    }

    async fn nb_files(&self) -> Result<u64> {
        self.check_alive()?;
        Ok(self.nb_files.load(Ordering::SeqCst))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.check_alive()?;
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .map(|u| User {
                id: u.id.clone(),
                email: u.email.clone(),
            }))
    }

    async fn find_by_credentials(&self, email: &str, digest: &str) -> Result<Option<User>> {
        self.check_alive()?;
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email && u.digest == digest)
            .map(|u| User {
                id: u.id.clone(),
                email: u.email.clone(),
            }))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        self.check_alive()?;
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .map(|u| User {
                id: u.id.clone(),
                email: u.email.clone(),
            }))
    }

    async fn insert_user(&self, email: &str, digest: &str) -> Result<User> {
        self.check_alive()?;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(WicketError::StoreUnavailable("memory store down".into()));
        }
        let id = format!("{:024x}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.users.lock().unwrap().push(StoredUser {
            id: id.clone(),
            email: email.to_string(),
            digest: digest.to_string(),
        });
        Ok(User {
            id,
            email: email.to_string(),
        })
    }
}

/// In-memory ephemeral store with a simulated clock
#[derive(Default)]
pub struct MemorySessions {
    // key -> (value, expiry in simulated seconds)
    entries: Mutex<HashMap<String, (String, u64)>>,
    now_secs: AtomicU64,
    alive: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemorySessions {
    pub fn new() -> Self {
        let store = Self::default();
        store.alive.store(true, Ordering::SeqCst);
        store
    }

    pub fn set_alive(&self, alive: bool) {
        self.alive.store(alive, Ordering::SeqCst);
    }

    /// Refuse writes while still answering reads, to exercise the
    /// sign-in-time store failure path
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Move the simulated clock forward
    pub fn advance(&self, secs: u64) {
        self.now_secs.fetch_add(secs, Ordering::SeqCst);
    }

    fn check_alive(&self) -> Result<()> {
        if self.alive.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(WicketError::StoreUnavailable("memory store down".into()))
        }
    }
}

#[async_trait]
impl EphemeralStore for MemorySessions {
    async fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.check_alive()?;
        let now = self.now_secs.load(Ordering::SeqCst);
        Ok(self
            .entries
            .lock()
            .unwrap()
            .get(key)
            .filter(|(_, expiry)| now < *expiry)
            .map(|(value, _)| value.clone()))
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()> {
        self.check_alive()?;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(WicketError::StoreUnavailable("memory store down".into()));
        }
        let now = self.now_secs.load(Ordering::SeqCst);
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value.to_string(), now + ttl_secs));
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<()> {
        self.check_alive()?;
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}
