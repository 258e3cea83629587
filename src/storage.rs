//! On-device persistence.
//!
//! Everything is stored as strings under fixed keys. Writes are best effort:
//! a failed write is logged and dropped, and the in-memory profile stays the
//! source of truth until the page reloads.

use std::collections::HashMap;

use crate::catalog::GameId;
use crate::error::StorageError;
use crate::profile::PlayerProfile;

/// Key/value string store (`localStorage` in the browser).
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-process storage for native builds and tests. An optional byte quota
/// makes writes fail the way a full `localStorage` does.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota: Some(bytes),
        }
    }

    fn used_without(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota {
            let needed = self.used_without(key) + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::Quota(format!("{needed} bytes exceeds {quota}")));
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Typed access to the arcade's keys on top of a [`Storage`] backend.
pub struct ProfileStore<S: Storage> {
    backend: S,
    prefix: String,
    tutorial_cooldown_ms: u64,
}

impl<S: Storage> ProfileStore<S> {
    pub fn new(backend: S, prefix: impl Into<String>, tutorial_cooldown_ms: u64) -> Self {
        Self {
            backend,
            prefix: prefix.into(),
            tutorial_cooldown_ms,
        }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    fn key(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    /// Stored profile, or `None` when missing, unreadable or corrupt.
    pub fn load_profile(&self) -> Option<PlayerProfile> {
        let raw = match self.backend.get(&self.key("profile")) {
            Ok(raw) => raw?,
            Err(e) => {
                log::warn!("profile load failed: {e}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(p) => Some(p),
            Err(e) => {
                log::warn!("discarding corrupt profile: {e}");
                None
            }
        }
    }

    pub fn try_save_profile(&mut self, profile: &PlayerProfile) -> Result<(), StorageError> {
        let json = serde_json::to_string(profile)?;
        let key = self.key("profile");
        self.backend.set(&key, &json)
    }

    /// Overwrite the stored profile; failures are logged and dropped.
    pub fn save_profile(&mut self, profile: &PlayerProfile) {
        if let Err(e) = self.try_save_profile(profile) {
            log::warn!("profile not saved: {e}");
        }
    }

    /// Drop the stored profile and the welcome-back name.
    pub fn forget_player(&mut self) {
        for name in ["profile", "lastPlayer"] {
            let key = self.key(name);
            if let Err(e) = self.backend.remove(&key) {
                log::warn!("{key} not cleared: {e}");
            }
        }
    }

    /// Most recently named player, for the welcome-back prompt.
    pub fn last_player(&self) -> Option<String> {
        self.backend
            .get(&self.key("lastPlayer"))
            .unwrap_or_else(|e| {
                log::warn!("last player lookup failed: {e}");
                None
            })
            .filter(|name| !name.is_empty())
    }

    pub fn set_last_player(&mut self, name: &str) {
        let key = self.key("lastPlayer");
        if let Err(e) = self.backend.set(&key, name) {
            log::warn!("last player not saved: {e}");
        }
    }

    /// Show the tutorial when never seen, or seen at least one cooldown ago.
    pub fn should_show_tutorial(&self, game: GameId, now_ms: u64) -> bool {
        let seen = self
            .backend
            .get(&self.key(&format!("tutorial:{game}")))
            .ok()
            .flatten()
            .and_then(|s| s.parse::<u64>().ok());
        match seen {
            Some(at) => now_ms.saturating_sub(at) >= self.tutorial_cooldown_ms,
            None => true,
        }
    }

    pub fn mark_tutorial_seen(&mut self, game: GameId, now_ms: u64) {
        let key = self.key(&format!("tutorial:{game}"));
        if let Err(e) = self.backend.set(&key, &now_ms.to_string()) {
            log::warn!("tutorial marker for {game} not saved: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: u64 = 24 * 60 * 60 * 1000;

    fn store() -> ProfileStore<MemoryStorage> {
        ProfileStore::new(MemoryStorage::default(), "test:", 7 * DAY)
    }

    #[test]
    fn test_profile_round_trip() {
        let mut s = store();
        assert!(s.load_profile().is_none());
        let mut p = PlayerProfile::new("Ava", Some(4));
        p.points = 12;
        s.save_profile(&p);
        assert_eq!(s.load_profile(), Some(p));
        assert!(s.backend().get("test:profile").unwrap().is_some());
    }

    #[test]
    fn test_corrupt_profile_loads_as_none() {
        let mut backend = MemoryStorage::default();
        backend.set("test:profile", "{not json").unwrap();
        let s = ProfileStore::new(backend, "test:", DAY);
        assert!(s.load_profile().is_none());
    }

    #[test]
    fn test_quota_failure_is_swallowed() {
        let mut s = ProfileStore::new(MemoryStorage::with_quota(16), "test:", DAY);
        let p = PlayerProfile::new("A very long name indeed", None);
        assert!(matches!(s.try_save_profile(&p), Err(StorageError::Quota(_))));
        s.save_profile(&p);
        assert!(s.load_profile().is_none());
    }

    #[test]
    fn test_forget_player_keeps_tutorials() {
        let mut s = store();
        s.save_profile(&PlayerProfile::new("Ava", None));
        s.set_last_player("Ava");
        s.mark_tutorial_seen(GameId::Boots, 0);
        s.forget_player();
        assert!(s.load_profile().is_none());
        assert_eq!(s.last_player(), None);
        assert!(!s.should_show_tutorial(GameId::Boots, DAY));
    }

    #[test]
    fn test_last_player() {
        let mut s = store();
        assert_eq!(s.last_player(), None);
        s.set_last_player("Ava");
        assert_eq!(s.last_player().as_deref(), Some("Ava"));
    }

    #[test]
    fn test_tutorial_cooldown() {
        let mut s = store();
        assert!(s.should_show_tutorial(GameId::Boots, 1_000));
        s.mark_tutorial_seen(GameId::Boots, 1_000);
        assert!(!s.should_show_tutorial(GameId::Boots, 1_000 + DAY));
        assert!(s.should_show_tutorial(GameId::Memory, 1_000 + DAY));
        assert!(s.should_show_tutorial(GameId::Boots, 1_000 + 7 * DAY));
    }
}
