//! Mapping loosely-structured source payloads into a [`Profile`].
//!
//! Sources disagree on where the channel owner lives in the payload and on
//! field naming. A [`ProfileShape`] lists, in priority order, the places a
//! container object may sit and the candidate paths for each field. The
//! first candidate holding a present value wins. Supporting a new payload
//! shape means adding paths, not code.

use kickroster_core::{Profile, SourceTag};
use serde_json::Value;

/// Where a candidate path is rooted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// The payload itself.
    Root,
    /// The first container object found via [`ProfileShape::containers`].
    Container,
}

#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub scope: Scope,
    pub path: &'static [&'static str],
}

const fn root(path: &'static [&'static str]) -> Candidate {
    Candidate {
        scope: Scope::Root,
        path,
    }
}

const fn container(path: &'static [&'static str]) -> Candidate {
    Candidate {
        scope: Scope::Container,
        path,
    }
}

/// Prioritized field locations for one family of payloads.
#[derive(Debug, Clone, Copy)]
pub struct ProfileShape {
    pub containers: &'static [&'static [&'static str]],
    pub display_name: &'static [Candidate],
    pub followers: &'static [Candidate],
    pub avatar: &'static [Candidate],
}

/// Kick channel payloads (v1 and v2 channel endpoints).
pub const KICK_SHAPE: ProfileShape = ProfileShape {
    containers: &[&["user"], &["channel", "user"], &["data", "user"], &["data"]],
    display_name: &[
        root(&["display_name"]),
        root(&["displayName"]),
        root(&["username"]),
        container(&["display_name"]),
        container(&["displayName"]),
        container(&["username"]),
    ],
    followers: &[
        root(&["followers_count"]),
        root(&["followersCount"]),
        root(&["followers"]),
        container(&["followers_count"]),
        container(&["followersCount"]),
        container(&["followers"]),
    ],
    avatar: &[
        root(&["profile_image", "url"]),
        root(&["profile_pic"]),
        root(&["profilePic"]),
        container(&["profile_image", "url"]),
        container(&["profile_picture", "url"]),
        container(&["profile_pic"]),
        container(&["profilePic"]),
        container(&["profile_image"]),
    ],
};

/// Piloterr `kick/user/info` payloads.
pub const PILOTERR_SHAPE: ProfileShape = ProfileShape {
    containers: &[],
    display_name: &[root(&["username"])],
    followers: &[root(&["followers_count"])],
    avatar: &[root(&["profile_image", "url"])],
};

/// Builds a [`Profile`] from `payload` using `shape`.
///
/// Never fails. A missing display name falls back to `slug`, and a missing
/// (or non-numeric) follower count is `None`. A follower count of `0` is kept.
#[must_use]
pub fn extract_profile(
    payload: &Value,
    slug: &str,
    shape: &ProfileShape,
    source: SourceTag,
) -> Profile {
    let container = shape
        .containers
        .iter()
        .find_map(|path| lookup(payload, path).filter(|v| v.is_object()));

    let pick = |candidates: &[Candidate]| {
        first_present(candidates.iter().map(|c| match c.scope {
            Scope::Root => lookup(payload, c.path),
            Scope::Container => container.and_then(|obj| lookup(obj, c.path)),
        }))
    };

    let display_name = pick(shape.display_name)
        .and_then(display_text)
        .unwrap_or_else(|| slug.to_owned());

    Profile {
        slug: slug.to_owned(),
        display_name,
        followers: pick(shape.followers).and_then(follower_count),
        profile_pic: pick(shape.avatar)
            .and_then(Value::as_str)
            .map(str::to_owned),
        source,
        error: None,
    }
}

/// Walks `path` through nested objects.
pub fn lookup<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(root, |node, key| node.get(*key))
}

/// A value counts as present unless it is `null` or an empty string.
/// `0` and `false` are present.
#[must_use]
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

pub fn first_present<'a, I>(candidates: I) -> Option<&'a Value>
where
    I: IntoIterator<Item = Option<&'a Value>>,
{
    candidates.into_iter().flatten().find(|v| is_present(v))
}

fn display_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn follower_count(value: &Value) -> Option<u64> {
    let Value::Number(number) = value else {
        return None;
    };
    number.as_u64().or_else(|| {
        number
            .as_f64()
            .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0 && *f <= 9.0e15)
            .map(|f| f as u64)
    })
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
