//! Resolution pipeline: cache lookup, primary + secondary fetch, merge, store.

use std::sync::Arc;
use std::time::Duration;

use kickroster_core::{normalize_slug, AppConfig, MergedProfile, Profile, Sources};

use crate::cache::ProfileCache;
use crate::error::{FetchError, ResolveError};
use crate::fetch::{FetchOptions, JsonFetcher};
use crate::sources::{KickSource, PiloterrSource, ProfileSource};

/// How long resolved profiles stay cached.
///
/// `degraded_ttl` applies to records built after the primary source failed.
/// It defaults to the same window as healthy records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub ttl: Duration,
    pub degraded_ttl: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            degraded_ttl: Duration::from_secs(60),
        }
    }
}

impl CachePolicy {
    fn ttl_for(&self, profile: &MergedProfile) -> Duration {
        if profile.is_degraded() {
            self.degraded_ttl
        } else {
            self.ttl
        }
    }
}

/// Per-input result of [`ProfileResolver::resolve_batch`].
#[derive(Debug)]
pub struct BatchOutcome {
    pub slug: String,
    pub result: Result<MergedProfile, ResolveError>,
}

/// Resolves slugs to merged profiles, memoizing results in a shared cache.
///
/// Concurrent misses for the same slug are not coalesced; each performs its
/// own upstream fetches and the last write wins.
pub struct ProfileResolver {
    primary: Arc<dyn ProfileSource>,
    secondary: Arc<dyn ProfileSource>,
    cache: ProfileCache,
    policy: CachePolicy,
}

impl ProfileResolver {
    #[must_use]
    pub fn new(
        primary: Arc<dyn ProfileSource>,
        secondary: Arc<dyn ProfileSource>,
        cache: ProfileCache,
        policy: CachePolicy,
    ) -> Self {
        Self {
            primary,
            secondary,
            cache,
            policy,
        }
    }

    /// Wires the Kick and Piloterr sources from application config.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the HTTP client cannot be built, a base URL
    /// is invalid, or the API key is not a valid header value.
    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        let fetcher = JsonFetcher::new()?;
        let options = FetchOptions::new(config.request_timeout(), config.max_redirects);

        let primary = KickSource::new(fetcher.clone(), &config.primary_base_url, options.clone())?;
        let secondary = PiloterrSource::new(
            fetcher,
            &config.secondary_base_url,
            config.piloterr_api_key.as_deref(),
            options,
        )?;

        Ok(Self::new(
            Arc::new(primary),
            Arc::new(secondary),
            ProfileCache::new(),
            CachePolicy {
                ttl: config.cache_ttl(),
                degraded_ttl: config.degraded_ttl(),
            },
        ))
    }

    #[must_use]
    pub fn cache(&self) -> &ProfileCache {
        &self.cache
    }

    /// Resolves an already-normalized slug.
    ///
    /// Upstream failures never surface here: a failed primary lookup yields
    /// a degraded record and a failed secondary lookup is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::InvalidSlug`] if `slug` is empty or not in
    /// normalized form.
    pub async fn resolve(&self, slug: &str) -> Result<MergedProfile, ResolveError> {
        if slug.is_empty() || normalize_slug(slug) != slug {
            return Err(ResolveError::InvalidSlug(slug.to_owned()));
        }

        if let Some(hit) = self.cache.get(slug).await {
            tracing::debug!(slug, "profile cache hit");
            return Ok(hit);
        }
        tracing::debug!(slug, "profile cache miss");

        let primary = match self.primary.fetch_profile(slug).await {
            Ok(Some(profile)) => profile,
            Ok(None) => Profile::degraded(
                slug,
                format!("{} returned no profile", self.primary.name()),
            ),
            Err(e) => {
                tracing::warn!(
                    slug,
                    source = self.primary.name(),
                    error = %e,
                    "primary profile lookup failed"
                );
                Profile::degraded(slug, e.to_string())
            }
        };

        let secondary = match self.secondary.fetch_profile(slug).await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!(
                    slug,
                    source = self.secondary.name(),
                    error = %e,
                    "secondary profile lookup failed"
                );
                None
            }
        };

        let merged = merge_profiles(slug, &primary, secondary.as_ref());
        self.cache
            .insert(slug, merged.clone(), self.policy.ttl_for(&merged))
            .await;

        Ok(merged)
    }

    /// Normalizes raw inputs, drops the ones that normalize to nothing, and
    /// resolves the rest one after another in input order.
    pub async fn resolve_batch<I, S>(&self, inputs: I) -> Vec<BatchOutcome>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let slugs: Vec<String> = inputs
            .into_iter()
            .map(|raw| normalize_slug(raw.as_ref()))
            .filter(|slug| !slug.is_empty())
            .collect();

        let mut outcomes = Vec::with_capacity(slugs.len());
        for slug in slugs {
            let result = self.resolve(&slug).await;
            if let Err(e) = &result {
                tracing::warn!(slug = %slug, error = %e, "batch item failed");
            }
            outcomes.push(BatchOutcome { slug, result });
        }
        outcomes
    }
}

/// Combines a primary profile with an optional secondary one.
///
/// Secondary values win whenever they are present; the primary fills the
/// gaps and the slug is the last-resort display name.
#[must_use]
pub fn merge_profiles(slug: &str, primary: &Profile, secondary: Option<&Profile>) -> MergedProfile {
    let non_blank = |s: &&str| !s.trim().is_empty();

    let display_name = secondary
        .map(|s| s.display_name.as_str())
        .filter(non_blank)
        .or_else(|| Some(primary.display_name.as_str()).filter(non_blank))
        .unwrap_or(slug)
        .to_owned();

    let followers = secondary
        .and_then(|s| s.followers)
        .or(primary.followers);

    let profile_pic = secondary
        .and_then(|s| s.profile_pic.as_deref())
        .filter(non_blank)
        .or_else(|| primary.profile_pic.as_deref().filter(non_blank))
        .map(str::to_owned);

    MergedProfile {
        slug: slug.to_owned(),
        display_name,
        followers,
        profile_pic,
        sources: Sources {
            kick: primary.source,
            piloterr: secondary.map(|s| s.source),
        },
        followers_available: followers.is_some(),
        error: primary.error.clone(),
    }
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;
