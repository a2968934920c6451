use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::slug::normalize_slug;
use crate::ConfigError;

/// Roster served by `/api/players` when no players file is configured.
pub const DEFAULT_PLAYERS: &[&str] = &[
    "hyghman",
    "w2ge",
    "roxanne_roxx",
    "ket_14",
    "godeanu",
    "poseidonn99",
    "anduu14",
    "stezyvr",
    "tedereu",
    "cartusu",
    "nicusor7gaming",
    "markoglasslive",
    "potrix",
    "zasami",
    "therealred",
    "bvcovia",
    "kopee",
    "kasimksm23",
];

#[derive(Debug, Deserialize)]
pub struct PlayersFile {
    pub players: Vec<String>,
}

/// Load the roster from a YAML file (`players: [slug, ...]`).
///
/// Entries may be URLs or handles; each is normalized into a slug.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_players(path: &Path) -> Result<Vec<String>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::PlayersFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: PlayersFile =
        serde_yaml::from_str(&content).map_err(ConfigError::PlayersFileParse)?;

    normalize_roster(&file.players)
}

/// Roster from `path` when given, otherwise [`DEFAULT_PLAYERS`].
///
/// # Errors
///
/// Propagates [`load_players`] failures.
pub fn resolve_roster(path: Option<&Path>) -> Result<Vec<String>, ConfigError> {
    match path {
        Some(path) => load_players(path),
        None => Ok(DEFAULT_PLAYERS.iter().map(|s| (*s).to_string()).collect()),
    }
}

fn normalize_roster(entries: &[String]) -> Result<Vec<String>, ConfigError> {
    let mut seen = HashSet::new();
    let mut slugs = Vec::with_capacity(entries.len());

    for entry in entries {
        let slug = normalize_slug(entry);
        if slug.is_empty() {
            return Err(ConfigError::Validation(format!(
                "player entry '{entry}' does not contain a valid slug"
            )));
        }
        if !seen.insert(slug.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate player slug: '{slug}' (from entry '{entry}')"
            )));
        }
        slugs.push(slug);
    }

    Ok(slugs)
}
