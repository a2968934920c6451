//! Process-wide, TTL-bounded memo of merged profiles keyed by slug.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use kickroster_core::MergedProfile;
use tokio::sync::RwLock;
use tokio::time::Instant;

/// Upper bound used when `now + ttl` would overflow the clock.
const MAX_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 365);

#[derive(Debug, Clone)]
struct CacheEntry {
    profile: MergedProfile,
    expires_at: Instant,
}

/// Shared profile cache.
///
/// Cloning is cheap and every clone sees the same entries. Expired entries
/// are never purged; they are ignored on read and overwritten by the next
/// resolution of the same slug.
#[derive(Debug, Clone, Default)]
pub struct ProfileCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl ProfileCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached profile for `slug` if its entry has not expired.
    pub async fn get(&self, slug: &str) -> Option<MergedProfile> {
        let entries = self.entries.read().await;
        entries
            .get(slug)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.profile.clone())
    }

    /// Stores `profile` under `slug` for `ttl`, replacing any prior entry.
    pub async fn insert(&self, slug: &str, profile: MergedProfile, ttl: Duration) {
        let now = Instant::now();
        let expires_at = now
            .checked_add(ttl)
            .unwrap_or_else(|| now + MAX_TTL);
        self.entries.write().await.insert(
            slug.to_owned(),
            CacheEntry {
                profile,
                expires_at,
            },
        );
    }

    /// Number of stored entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use kickroster_core::{SourceTag, Sources};

    use super::*;

    fn merged(slug: &str, followers: Option<u64>) -> MergedProfile {
        MergedProfile {
            slug: slug.to_string(),
            display_name: slug.to_string(),
            followers,
            profile_pic: None,
            sources: Sources {
                kick: SourceTag::Primary,
                piloterr: None,
            },
            followers_available: followers.is_some(),
            error: None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn entry_is_served_until_expiry() {
        let cache = ProfileCache::new();
        cache
            .insert("tedereu", merged("tedereu", Some(5)), Duration::from_secs(60))
            .await;

        tokio::time::advance(Duration::from_secs(59)).await;
        assert_eq!(cache.get("tedereu").await.and_then(|p| p.followers), Some(5));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(cache.get("tedereu").await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn expired_entries_are_kept_until_overwritten() {
        let cache = ProfileCache::new();
        cache
            .insert("kopee", merged("kopee", Some(1)), Duration::from_secs(1))
            .await;
        tokio::time::advance(Duration::from_secs(5)).await;

        assert!(cache.get("kopee").await.is_none());
        assert_eq!(cache.len().await, 1);

        cache
            .insert("kopee", merged("kopee", Some(2)), Duration::from_secs(1))
            .await;
        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get("kopee").await.and_then(|p| p.followers), Some(2));
    }

    #[tokio::test]
    async fn clones_share_entries() {
        let cache = ProfileCache::new();
        let other = cache.clone();
        assert!(other.is_empty().await);
        cache
            .insert("zasami", merged("zasami", None), Duration::from_secs(60))
            .await;
        assert!(other.get("zasami").await.is_some());
    }

    #[tokio::test]
    async fn zero_ttl_is_never_served() {
        let cache = ProfileCache::new();
        cache
            .insert("potrix", merged("potrix", None), Duration::ZERO)
            .await;
        assert!(cache.get("potrix").await.is_none());
    }

    #[tokio::test]
    async fn huge_ttl_does_not_overflow() {
        let cache = ProfileCache::new();
        cache
            .insert("bvcovia", merged("bvcovia", None), Duration::MAX)
            .await;
        assert!(cache.get("bvcovia").await.is_some());
    }
}
