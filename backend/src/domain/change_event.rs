//! Row-change notifications carried by the live change feed.
//!
//! Events name the table and the kind of change only. Subscribers re-fetch
//! whatever state they display instead of applying row diffs.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Tables whose changes are broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChangeTable {
    Rounds,
    Startups,
    Selections,
}

/// Kind of row change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// A single change notification.
///
/// # Examples
/// ```
/// use pitchmatch::domain::{ChangeEvent, ChangeKind, ChangeTable};
///
/// let event = ChangeEvent::new(ChangeTable::Rounds, ChangeKind::Insert);
/// assert_eq!(event.to_string(), "rounds/insert");
/// assert!(event.affects_active_round());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct ChangeEvent {
    pub table: ChangeTable,
    pub kind: ChangeKind,
}

impl ChangeEvent {
    /// Hint that `table` changed in the given way.
    pub fn new(table: ChangeTable, kind: ChangeKind) -> Self {
        Self { table, kind }
    }

    /// True when the active round snapshot may be stale after this change.
    ///
    /// The snapshot embeds its startup, so startup edits count as well.
    pub fn affects_active_round(&self) -> bool {
        matches!(self.table, ChangeTable::Rounds | ChangeTable::Startups)
    }
}

impl fmt::Display for ChangeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Rounds => "rounds",
            Self::Startups => "startups",
            Self::Selections => "selections",
        })
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
        })
    }
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.table, self.kind)
    }
}
