//! Profile source adapters.

pub mod kick;
pub mod piloterr;

pub use kick::KickSource;
pub use piloterr::PiloterrSource;

use async_trait::async_trait;
use kickroster_core::Profile;

use crate::error::SourceError;

/// A provider of channel profiles.
///
/// `Ok(None)` means the source has nothing to contribute (for example it is
/// disabled), which is distinct from a failed lookup.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Short provider name used in logs.
    fn name(&self) -> &'static str;

    async fn fetch_profile(&self, slug: &str) -> Result<Option<Profile>, SourceError>;
}
