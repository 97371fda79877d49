//! Relevance scoring and match snippets for stores that evaluate queries
//! in-process.

use chrono::NaiveDateTime;
use regex::RegexBuilder;

use crate::types::MatchSnippet;
use crate::utils::text::single_line;

const SUBJECT_WEIGHT: u32 = 3;
const SENDER_WEIGHT: u32 = 2;
const BODY_WEIGHT: u32 = 1;
const ALL_TERMS_MULTIPLIER: u32 = 3;

/// Relevance cap used to normalize before blending with recency.
const RELEVANCE_CEILING: f64 = 30.0;
const RELEVANCE_SHARE: f64 = 0.7;
const RECENCY_SHARE: f64 = 0.3;
const RECENCY_HORIZON_DAYS: f64 = 365.0;

/// Context kept on each side of a snippet match, in characters.
const SNIPPET_RADIUS: usize = 50;
const MAX_SNIPPETS: usize = 2;

/// Term-hit score across subject, sender and (when given) body.
#[must_use]
pub fn relevance(terms: &[&str], subject: &str, sender: &str, body: Option<&str>) -> u32 {
    let subject = subject.to_lowercase();
    let sender = sender.to_lowercase();
    let body = body.map(str::to_lowercase);

    let mut score = 0;
    let mut matched = 0;
    for term in terms {
        let term = term.to_lowercase();
        let mut hit = false;
        if subject.contains(&term) {
            score += SUBJECT_WEIGHT;
            hit = true;
        }
        if sender.contains(&term) {
            score += SENDER_WEIGHT;
            hit = true;
        }
        if body.as_deref().is_some_and(|b| b.contains(&term)) {
            score += BODY_WEIGHT;
            hit = true;
        }
        if hit {
            matched += 1;
        }
    }

    if terms.len() > 1 && matched == terms.len() {
        score *= ALL_TERMS_MULTIPLIER;
    }
    score
}

/// 1.0 for today, falling linearly to 0.0 at a year old. Undated items sit
/// in the middle.
#[must_use]
pub fn recency(date: Option<NaiveDateTime>, now: NaiveDateTime) -> f64 {
    let Some(date) = date else {
        return 0.5;
    };
    #[allow(clippy::cast_precision_loss)]
    let age_days = (now - date).num_seconds() as f64 / 86_400.0;
    (1.0 - age_days / RECENCY_HORIZON_DAYS).clamp(0.0, 1.0)
}

#[must_use]
pub fn combined_score(relevance: u32, recency: f64) -> f64 {
    let normalized = (f64::from(relevance) / RELEVANCE_CEILING).min(1.0);
    RELEVANCE_SHARE * normalized + RECENCY_SHARE * recency
}

/// Up to two `...context...` excerpts, taken from term occurrences in order.
#[must_use]
pub fn snippets(body: &str, terms: &[&str]) -> Vec<MatchSnippet> {
    let mut out = Vec::new();
    for term in terms {
        let Ok(re) = RegexBuilder::new(&regex::escape(term))
            .case_insensitive(true)
            .build()
        else {
            continue;
        };
        for found in re.find_iter(body) {
            if out.len() == MAX_SNIPPETS {
                return out;
            }
            let start = body[..found.start()]
                .char_indices()
                .rev()
                .nth(SNIPPET_RADIUS - 1)
                .map_or(0, |(i, _)| i);
            let end = body[found.end()..]
                .char_indices()
                .nth(SNIPPET_RADIUS)
                .map_or(body.len(), |(i, _)| found.end() + i);

            out.push(MatchSnippet {
                term: (*term).to_string(),
                context: format!("...{}...", single_line(&body[start..end])),
            });
        }
    }
    out
}
