//! Channel profile resolution: fetch from the primary and secondary sources,
//! merge by field precedence, and memoize the result for a short window.

pub mod cache;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod resolver;
pub mod sources;

pub use cache::ProfileCache;
pub use error::{FetchError, ResolveError, SourceError};
pub use extract::{extract_profile, ProfileShape, KICK_SHAPE, PILOTERR_SHAPE};
pub use fetch::{FetchOptions, JsonFetcher};
pub use resolver::{merge_profiles, BatchOutcome, CachePolicy, ProfileResolver};
pub use sources::{KickSource, PiloterrSource, ProfileSource};
