//! `resolve` command: runs inputs through the same resolver the server uses.

use kickroster_core::{AppConfig, MergedProfile};
use kickroster_resolver::{BatchOutcome, ProfileResolver};
use serde::Serialize;

/// One line of `resolve` output.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum ResolveLine {
    Resolved {
        ok: bool,
        data: MergedProfile,
    },
    Failed {
        ok: bool,
        slug: String,
        error: String,
    },
}

impl From<BatchOutcome> for ResolveLine {
    fn from(outcome: BatchOutcome) -> Self {
        match outcome.result {
            Ok(data) => Self::Resolved { ok: true, data },
            Err(e) => Self::Failed {
                ok: false,
                slug: outcome.slug,
                error: e.to_string(),
            },
        }
    }
}

pub(crate) async fn run_resolve(
    config: &AppConfig,
    users: &[String],
    pretty: bool,
) -> anyhow::Result<()> {
    let resolver = ProfileResolver::from_config(config)?;
    tracing::debug!(count = users.len(), "resolving channels");
    let outcomes = resolver.resolve_batch(users).await;
    if outcomes.is_empty() {
        anyhow::bail!("no valid channel slugs in input: {users:?}");
    }

    for outcome in outcomes {
        println!("{}", render_line(&ResolveLine::from(outcome), pretty)?);
    }
    Ok(())
}

pub(crate) fn render_line(line: &ResolveLine, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(line)
    } else {
        serde_json::to_string(line)
    }
}
