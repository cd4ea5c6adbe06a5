//! Node access lifecycle states.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a node access instance.
///
/// ```text
/// NEW ──start──▶ RESOLVING ──▶ STARTED ──stop──▶ STOPPED
///  ▲                 │                              │
///  └──── failure ────┘◀──────────── start ──────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessState {
    /// Constructed, never started
    New,
    /// Identity resolution in progress
    Resolving,
    /// Identity cached, queries allowed
    Started,
    /// Stopped after a successful start
    Stopped,
}

impl AccessState {
    /// Returns true if queries are allowed in this state.
    #[must_use]
    pub const fn is_started(self) -> bool {
        matches!(self, Self::Started)
    }
}

impl fmt::Display for AccessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::New => "new",
            Self::Resolving => "resolving",
            Self::Started => "started",
            Self::Stopped => "stopped",
        };
        f.write_str(s)
    }
}
