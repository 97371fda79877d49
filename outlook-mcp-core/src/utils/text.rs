//! Text shaping helpers for compact output.

use std::sync::OnceLock;

use regex::Regex;

/// Truncates to at most `max` characters.
#[must_use]
pub fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// `None` for empty strings, so empty fields drop out of JSON output.
#[must_use]
pub fn non_empty(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Removes HTML tags, leaving the text content.
#[must_use]
pub fn strip_html(html: &str) -> String {
    static TAG: OnceLock<Option<Regex>> = OnceLock::new();
    match TAG.get_or_init(|| Regex::new(r"<[^<]+?>").ok()) {
        Some(re) => re.replace_all(html, "").into_owned(),
        None => html.to_string(),
    }
}

/// Collapses CR/LF runs into single spaces.
#[must_use]
pub fn single_line(text: &str) -> String {
    text.replace("\r\n", " ").replace('\n', " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_chars_not_bytes() {
        assert_eq!(truncate("Zürich flight", 6), "Zürich");
        assert_eq!(truncate("short", 50), "short");
    }

    #[test]
    fn strip_html_keeps_text() {
        assert_eq!(strip_html("<p>Hello <b>ZRH</b></p>"), "Hello ZRH");
    }

    #[test]
    fn single_line_collapses_newlines() {
        assert_eq!(single_line("a\r\nb\nc "), "a b c");
    }
}
