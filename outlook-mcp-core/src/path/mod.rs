//! Folder addressing: `account/Inbox/Travel`.

mod resolver;

pub use resolver::{resolve, AccountNode, FolderNode, Resolved};

use serde::{Serialize, Serializer};

use crate::error::{CoreError, CoreResult};

/// Parsed folder path.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MailPath {
    /// Empty path: the account list
    #[default]
    Root,
    /// Account root
    Account { account: String },
    /// Folder below an account, one entry per level
    Folder {
        account: String,
        segments: Vec<String>,
    },
}

impl MailPath {
    /// Parses `account[/folder[/sub...]]`. A single trailing `/` is ignored;
    /// empty segments elsewhere are rejected.
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let trimmed = raw.trim();
        let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
        if trimmed.is_empty() {
            return Ok(Self::Root);
        }

        let mut parts = Vec::new();
        for part in trimmed.split('/') {
            if part.is_empty() {
                return Err(CoreError::InvalidInput(format!(
                    "path '{raw}' contains an empty segment"
                )));
            }
            parts.push(part.to_string());
        }

        let account = parts.remove(0);
        if parts.is_empty() {
            Ok(Self::Account { account })
        } else {
            Ok(Self::Folder {
                account,
                segments: parts,
            })
        }
    }

    /// Account display name, unless this is the root.
    #[must_use]
    pub fn account(&self) -> Option<&str> {
        match self {
            Self::Root => None,
            Self::Account { account } | Self::Folder { account, .. } => Some(account),
        }
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        matches!(self, Self::Root)
    }
}

impl std::fmt::Display for MailPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Root => Ok(()),
            Self::Account { account } => f.write_str(account),
            Self::Folder { account, segments } => write!(f, "{account}/{}", segments.join("/")),
        }
    }
}

impl Serialize for MailPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_path_is_root() {
        assert_eq!(MailPath::parse("").unwrap(), MailPath::Root);
        assert_eq!(MailPath::parse("  ").unwrap(), MailPath::Root);
        assert_eq!(MailPath::parse("/").unwrap(), MailPath::Root);
    }

    #[test]
    fn account_only() {
        let path = MailPath::parse("user@example.com").unwrap();
        assert_eq!(path.account(), Some("user@example.com"));
        assert!(matches!(path, MailPath::Account { .. }));
    }

    #[test]
    fn trailing_slash_is_ignored() {
        assert_eq!(
            MailPath::parse("acct/Inbox/").unwrap(),
            MailPath::parse("acct/Inbox").unwrap()
        );
    }

    #[test]
    fn nested_folder_round_trips_display() {
        let path = MailPath::parse("acct/Inbox/Travel").unwrap();
        assert_eq!(path.to_string(), "acct/Inbox/Travel");
        let MailPath::Folder { segments, .. } = path else {
            panic!("expected folder path");
        };
        assert_eq!(segments, vec!["Inbox", "Travel"]);
    }

    #[test]
    fn empty_interior_segment_is_invalid() {
        for raw in ["acct//Inbox", "/acct", "acct/Inbox//"] {
            let err = MailPath::parse(raw).unwrap_err();
            assert!(matches!(err, CoreError::InvalidInput(_)), "{raw}");
        }
    }
}
