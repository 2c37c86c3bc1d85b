use anyhow::Context;
use chrono::{Local, NaiveDateTime, TimeZone};
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;
use vocabrs_core::{AccessCheckpoint, CheckpointStore, Error, Result};

/// Stores the checkpoint as a plaintext millisecond timestamp.
#[derive(Debug, Clone)]
pub struct FileCheckpointStore {
    path: PathBuf,
}

impl FileCheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Accepts an integer timestamp, or a local ISO-8601 date-time as written by
/// earlier releases.
fn parse_checkpoint(content: &str) -> anyhow::Result<AccessCheckpoint> {
    if content.is_empty() {
        return Ok(AccessCheckpoint::BEGINNING);
    }
    if let Ok(millis) = content.parse::<i64>() {
        return Ok(AccessCheckpoint::new(millis));
    }

    let naive = NaiveDateTime::parse_from_str(content, "%Y-%m-%dT%H:%M:%S%.f")
        .with_context(|| format!("'{content}' is neither a timestamp nor a date-time"))?;
    let local = Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| anyhow::anyhow!("'{content}' does not exist in the local time zone"))?;
    Ok(AccessCheckpoint::new(local.timestamp_millis()))
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// The previous checkpoint stays in place until the new value is on disk.
fn write_value(path: &Path, millis: i64) -> anyhow::Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("cannot create {}", path.display()))?;
    write!(file, "{millis}")?;
    file.sync_all()?;
    Ok(())
}

impl CheckpointStore for FileCheckpointStore {
    fn read_checkpoint(&self) -> Result<AccessCheckpoint> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No checkpoint at {}, first run", self.path.display());
                return Ok(AccessCheckpoint::BEGINNING);
            }
            Err(e) => {
                return Err(Error::CheckpointUnreadable {
                    path: self.path.clone(),
                    reason: e.to_string(),
                });
            }
        };

        parse_checkpoint(content.trim()).map_err(|e| Error::CheckpointUnreadable {
            path: self.path.clone(),
            reason: format!("{e:#}"),
        })
    }

    fn write_checkpoint(&self, checkpoint: AccessCheckpoint) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let tmp = temp_sibling(&self.path);
        let written = write_value(&tmp, checkpoint.last_access).and_then(|()| {
            std::fs::rename(&tmp, &self.path)
                .with_context(|| format!("cannot move into {}", self.path.display()))
        });
        if written.is_err() {
            let _ = std::fs::remove_file(&tmp);
        }
        written
    }

    fn location(&self) -> PathBuf {
        self.path.clone()
    }
}
