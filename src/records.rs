use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("failed to access record file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("record file {} is not a valid record list: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode records for {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One restaurant shown to the user, tagged with the profile description
/// that was selected when the search ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub profile: String,
    pub title: String,
    pub address: String,
    pub link: String,
}

/// Flat JSON file holding every record ever saved.
///
/// Writers do a full read-modify-write without locking, so two searches
/// saving at the same time can drop each other's records.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Vec<Record>, RecordError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No record file at {}, starting empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(RecordError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let records: Vec<Record> =
            serde_json::from_str(&contents).map_err(|source| RecordError::Parse {
                path: self.path.clone(),
                source,
            })?;
        debug!("Loaded {} records from {}", records.len(), self.path.display());
        Ok(records)
    }

    /// Replaces the whole file with `records`.
    pub fn save(&self, records: &[Record]) -> Result<(), RecordError> {
        let mut buffer = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
        records
            .serialize(&mut serializer)
            .map_err(|source| RecordError::Encode {
                path: self.path.clone(),
                source,
            })?;

        std::fs::write(&self.path, buffer).map_err(|source| RecordError::Io {
            path: self.path.clone(),
            source,
        })?;
        info!("Saved {} records to {}", records.len(), self.path.display());
        Ok(())
    }
}

/// Groups records by profile description. Group order is unspecified;
/// records keep their file order inside a group.
pub fn group_by_profile(records: Vec<Record>) -> HashMap<String, Vec<Record>> {
    let mut groups: HashMap<String, Vec<Record>> = HashMap::new();
    for record in records {
        groups.entry(record.profile.clone()).or_default().push(record);
    }
    groups
}
