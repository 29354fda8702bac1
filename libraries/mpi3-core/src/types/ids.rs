/// ID types for mpi3 entities
use serde::{Deserialize, Serialize};
use std::fmt;

/// Song identifier
///
/// Stable integer key into the library table. Ids are assigned by the
/// library scan and only change on a full rescan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SongId(i64);

impl SongId {
    /// Create a new song ID
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner integer
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for SongId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}
