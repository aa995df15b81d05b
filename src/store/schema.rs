use serde::{Deserialize, Serialize};

use crate::session::record::SessionRecord;

const SCHEMA_VERSION: u32 = 1;

/// On-disk wrapper for the session history. The sequence is append-only;
/// only the explicit clear operation replaces it with an empty one.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryData {
    pub schema_version: u32,
    pub sessions: Vec<SessionRecord>,
}

impl HistoryData {
    pub fn with_sessions(sessions: Vec<SessionRecord>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            sessions,
        }
    }
}

impl Default for HistoryData {
    fn default() -> Self {
        Self::with_sessions(Vec::new())
    }
}

/// What a history file may actually contain: the versioned wrapper, or the
/// bare record array older hand-maintained files used.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum HistoryFile {
    Wrapped(HistoryData),
    Bare(Vec<SessionRecord>),
}

impl HistoryFile {
    pub fn into_data(self) -> HistoryData {
        match self {
            HistoryFile::Wrapped(data) => data,
            HistoryFile::Bare(sessions) => HistoryData::with_sessions(sessions),
        }
    }
}

impl Default for HistoryFile {
    fn default() -> Self {
        HistoryFile::Wrapped(HistoryData::default())
    }
}
