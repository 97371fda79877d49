//! Walks a [`MailPath`] over a tree of accounts and folders.
//!
//! Matching is exact and case-sensitive at every level. Nothing is created.

use crate::error::{CoreError, CoreResult};

use super::MailPath;

/// A top-level mail store.
pub trait AccountNode {
    type Folder: FolderNode;

    fn display_name(&self) -> &str;

    fn folders(&self) -> &[Self::Folder];
}

/// A folder with nested children.
pub trait FolderNode: Sized {
    fn display_name(&self) -> &str;

    fn subfolders(&self) -> &[Self];

    /// Whether the store allows reading this folder.
    fn is_accessible(&self) -> bool {
        true
    }
}

/// What a path resolved to.
#[derive(Debug)]
pub enum Resolved<'a, A: AccountNode> {
    Accounts(&'a [A]),
    Account(&'a A),
    Folder {
        account: &'a A,
        folder: &'a A::Folder,
    },
}

/// Resolves `path` against `accounts`.
///
/// Not-found errors name the first segment that could not be located and the
/// path it was looked up under.
pub fn resolve<'a, A: AccountNode>(
    accounts: &'a [A],
    path: &MailPath,
) -> CoreResult<Resolved<'a, A>> {
    let (name, segments) = match path {
        MailPath::Root => return Ok(Resolved::Accounts(accounts)),
        MailPath::Account { account } => (account, &[][..]),
        MailPath::Folder { account, segments } => (account, segments.as_slice()),
    };

    let account = accounts
        .iter()
        .find(|a| a.display_name() == name)
        .ok_or_else(|| CoreError::AccountNotFound(name.clone()))?;

    let Some((first, rest)) = segments.split_first() else {
        return Ok(Resolved::Account(account));
    };

    let mut walked = name.clone();
    let mut folder = child(account.folders(), &walked, first)?;
    walked = format!("{walked}/{first}");
    for segment in rest {
        folder = child(folder.subfolders(), &walked, segment)?;
        walked = format!("{walked}/{segment}");
    }

    Ok(Resolved::Folder { account, folder })
}

fn child<'a, F: FolderNode>(children: &'a [F], parent: &str, segment: &str) -> CoreResult<&'a F> {
    let found = children
        .iter()
        .find(|f| f.display_name() == segment)
        .ok_or_else(|| CoreError::FolderNotFound {
            parent: parent.to_string(),
            segment: segment.to_string(),
        })?;
    if !found.is_accessible() {
        return Err(CoreError::PermissionDenied(format!("{parent}/{segment}")));
    }
    Ok(found)
}
