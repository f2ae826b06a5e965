// src/storage/memory.rs
use log::info;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::models::server::Roster;

#[derive(Debug)]
pub enum RosterError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
}

impl fmt::Display for RosterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Failed to read roster {}: {}", path.display(), source)
            }
            Self::Parse { path, source } => {
                write!(f, "Invalid roster {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for RosterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

/// The static server catalog. Loaded once, never mutated; snapshots work on
/// their own copies.
pub struct RosterStore {
    roster: Roster,
}

impl RosterStore {
    pub fn from_roster(roster: Roster) -> Self {
        Self { roster }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, RosterError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| RosterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let roster = Self::parse(&text).map_err(|source| RosterError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        info!(
            "Loaded roster from {}: {} categories, {} servers",
            path.display(),
            roster.roster.categories.len(),
            roster.roster.server_count()
        );
        Ok(roster)
    }

    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text).map(Self::from_roster)
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn server_count(&self) -> usize {
        self.roster.server_count()
    }
}
