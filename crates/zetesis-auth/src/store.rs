//! File-backed cookie profile storage.
//!
//! Profiles live in one JSON document mapping profile name to its cookies,
//! save time, and active flag. A missing or corrupt file reads as empty so
//! a fresh install and a damaged store behave the same.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zetesis_types::Result;

/// Cookie names a usable session is expected to carry.
const ESSENTIAL_COOKIES: &[&str] = &["__Secure-next-auth.session-token"];

/// One saved cookie profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookieProfile {
    pub cookies: HashMap<String, String>,
    pub timestamp: DateTime<Utc>,
    pub active: bool,
}

/// Persistent store of named cookie profiles.
#[derive(Debug, Clone)]
pub struct CookieStore {
    path: PathBuf,
}

impl CookieStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Save cookies under a profile name, replacing any existing profile.
    pub fn save(&self, cookies: &HashMap<String, String>, profile: &str) -> Result<()> {
        let mut storage = self.read_all();
        storage.insert(
            profile.to_string(),
            CookieProfile {
                cookies: cookies.clone(),
                timestamp: Utc::now(),
                active: true,
            },
        );
        self.write_all(&storage)
    }

    /// Load a profile's cookies, or `None` if the profile does not exist.
    pub fn load(&self, profile: &str) -> Option<HashMap<String, String>> {
        self.read_all().remove(profile).map(|p| p.cookies)
    }

    /// Names of all saved profiles, sorted.
    pub fn list(&self) -> Vec<String> {
        self.read_all().into_keys().collect()
    }

    /// Delete a profile. Returns whether it existed.
    pub fn delete(&self, profile: &str) -> Result<bool> {
        let mut storage = self.read_all();
        if storage.remove(profile).is_none() {
            return Ok(false);
        }
        self.write_all(&storage)?;
        Ok(true)
    }

    fn read_all(&self) -> BTreeMap<String, CookieProfile> {
        std::fs::read_to_string(&self.path)
            .ok()
            .and_then(|contents| serde_json::from_str(&contents).ok())
            .unwrap_or_default()
    }

    fn write_all(&self, storage: &BTreeMap<String, CookieProfile>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(storage)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

/// Whether the cookie set carries every essential session cookie.
pub fn validate_cookies(cookies: &HashMap<String, String>) -> bool {
    ESSENTIAL_COOKIES
        .iter()
        .all(|name| cookies.contains_key(*name))
}
