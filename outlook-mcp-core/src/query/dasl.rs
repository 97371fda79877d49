//! DASL rendering of a compiled query.
//!
//! The expression targets the plain-text body property and is meant to be
//! wrapped by the caller as `@SQL=(<expr> AND <date clause>)`.

use serde::{Deserialize, Serialize};

use super::SearchQuery;

/// Plain-text body property.
pub const TEXT_DESCRIPTION: &str = "urn:schemas:httpmail:textdescription";

/// Comparison operator used for each term.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DaslSyntax {
    /// `LIKE '%term%'`: substring match, works on every store.
    #[default]
    Like,
    /// `ci_phrasematch 'term'`: instant-search index, word-prefix match.
    PhraseMatch,
}

fn term_condition(term: &str, syntax: DaslSyntax) -> String {
    let escaped = term.replace('\'', "''");
    match syntax {
        DaslSyntax::Like => format!("\"{TEXT_DESCRIPTION}\" LIKE '%{escaped}%'"),
        DaslSyntax::PhraseMatch => format!("\"{TEXT_DESCRIPTION}\" ci_phrasematch '{escaped}'"),
    }
}

fn join(parts: Vec<String>, op: &str) -> String {
    if parts.len() == 1 {
        parts.into_iter().next().unwrap_or_default()
    } else {
        format!("({})", parts.join(&format!(" {op} ")))
    }
}

impl SearchQuery {
    /// Renders the boolean text condition.
    #[must_use]
    pub fn to_dasl(&self, syntax: DaslSyntax) -> String {
        let groups = self
            .groups()
            .iter()
            .map(|group| {
                let terms = group.iter().map(|t| term_condition(t, syntax)).collect();
                join(terms, "OR")
            })
            .collect();
        join(groups, "AND")
    }
}
