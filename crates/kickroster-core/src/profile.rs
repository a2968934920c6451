use serde::{Deserialize, Serialize};

/// Which adapter produced a [`Profile`], or that the primary lookup failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceTag {
    Primary,
    PrimaryError,
    Secondary,
}

impl std::fmt::Display for SourceTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceTag::Primary => write!(f, "primary"),
            SourceTag::PrimaryError => write!(f, "primary_error"),
            SourceTag::Secondary => write!(f, "secondary"),
        }
    }
}

/// A channel profile as reported by a single source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub slug: String,
    pub display_name: String,
    pub followers: Option<u64>,
    pub profile_pic: Option<String>,
    pub source: SourceTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Profile {
    /// Stand-in record used when the primary source could not be reached.
    #[must_use]
    pub fn degraded(slug: &str, error: impl Into<String>) -> Self {
        Self {
            slug: slug.to_owned(),
            display_name: slug.to_owned(),
            followers: None,
            profile_pic: None,
            source: SourceTag::PrimaryError,
            error: Some(error.into()),
        }
    }
}

/// Outcome tag of each adapter, keyed by provider name on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sources {
    pub kick: SourceTag,
    pub piloterr: Option<SourceTag>,
}

/// The record served to clients: primary and secondary data merged by
/// field precedence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedProfile {
    pub slug: String,
    pub display_name: String,
    pub followers: Option<u64>,
    pub profile_pic: Option<String>,
    pub sources: Sources,
    pub followers_available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MergedProfile {
    /// True when the primary source failed and this record is a fallback.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.sources.kick == SourceTag::PrimaryError
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degraded_profile_uses_slug_as_display_name() {
        let profile = Profile::degraded("godeanu", "HTTP 503");
        assert_eq!(profile.display_name, "godeanu");
        assert_eq!(profile.followers, None);
        assert_eq!(profile.profile_pic, None);
        assert_eq!(profile.source, SourceTag::PrimaryError);
        assert_eq!(profile.error.as_deref(), Some("HTTP 503"));
    }

    #[test]
    fn merged_profile_serializes_camel_case() {
        let merged = MergedProfile {
            slug: "cartusu".to_string(),
            display_name: "Cartusu".to_string(),
            followers: Some(0),
            profile_pic: None,
            sources: Sources {
                kick: SourceTag::Primary,
                piloterr: None,
            },
            followers_available: true,
            error: None,
        };
        let json = serde_json::to_value(&merged).expect("serialize");
        assert_eq!(json["displayName"], "Cartusu");
        assert_eq!(json["followers"], 0);
        assert!(json["profilePic"].is_null());
        assert_eq!(json["followersAvailable"], true);
        assert_eq!(json["sources"]["kick"], "primary");
        assert!(json["sources"]["piloterr"].is_null());
        assert!(json.get("error").is_none());
    }

    #[test]
    fn source_tag_display_matches_wire_format() {
        for tag in [
            SourceTag::Primary,
            SourceTag::PrimaryError,
            SourceTag::Secondary,
        ] {
            let wire = serde_json::to_value(tag).expect("serialize");
            assert_eq!(wire.as_str(), Some(tag.to_string().as_str()));
        }
    }
}
