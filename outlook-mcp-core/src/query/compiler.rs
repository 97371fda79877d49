//! Search pattern compiler.
//!
//! `&` separates AND-groups, whitespace separates OR-terms inside a group:
//! `"ZRH EWR&United"` means `(ZRH OR EWR) AND United`. The legacy `|`
//! separator is accepted as whitespace.

use crate::error::{CoreError, CoreResult};

/// Compiled search pattern: a conjunction of disjunctions of substring terms.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pattern: String,
    groups: Vec<Vec<String>>,
}

fn is_term_separator(c: char) -> bool {
    c.is_whitespace() || c == '|'
}

impl SearchQuery {
    /// Compiles a pattern. Empty groups and terms are dropped; a pattern with
    /// nothing left is rejected.
    pub fn compile(pattern: &str) -> CoreResult<Self> {
        let groups: Vec<Vec<String>> = pattern
            .split('&')
            .map(|group| {
                group
                    .split(is_term_separator)
                    .filter(|term| !term.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .filter(|group| !group.is_empty())
            .collect();

        if groups.is_empty() {
            return Err(CoreError::InvalidQuery(format!(
                "pattern '{pattern}' contains no search terms"
            )));
        }

        Ok(Self {
            pattern: pattern.to_string(),
            groups,
        })
    }

    /// The pattern as typed.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// AND-groups, each a list of OR-terms.
    #[must_use]
    pub fn groups(&self) -> &[Vec<String>] {
        &self.groups
    }

    /// Distinct terms in first-seen order.
    #[must_use]
    pub fn terms(&self) -> Vec<&str> {
        let mut terms: Vec<&str> = Vec::new();
        for term in self.groups.iter().flatten() {
            if !terms.contains(&term.as_str()) {
                terms.push(term);
            }
        }
        terms
    }

    /// Case-insensitive evaluation against a text field.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        let haystack = text.to_lowercase();
        self.groups.iter().all(|group| {
            group
                .iter()
                .any(|term| haystack.contains(&term.to_lowercase()))
        })
    }
}

// Two queries are equal when they compile to the same condition, whatever
// separators were used to write them.
impl PartialEq for SearchQuery {
    fn eq(&self, other: &Self) -> bool {
        self.groups == other.groups
    }
}

impl Eq for SearchQuery {}
