use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Fatal conditions that abort a run before any output is written.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Kindle device not found. Attach the device via USB and unlock it, then run again")]
    DeviceNotFound { searched: Vec<String> },

    #[error("Kindle device at {} is attached but not readable", path.display())]
    DeviceNotReadable { path: PathBuf },

    #[error("Vocabulary database unavailable at {}: {reason}", path.display())]
    StoreUnavailable { path: PathBuf, reason: String },

    #[error("Frequency list for '{language}' unavailable and no cached copy exists: {reason}")]
    FrequencyListUnavailable { language: String, reason: String },

    #[error("Last access checkpoint at {} is unreadable: {reason}", path.display())]
    CheckpointUnreadable { path: PathBuf, reason: String },

    #[error("Failed to write export file {}: {reason}", path.display())]
    ExportFailed { path: PathBuf, reason: String },
}

impl Error {
    /// Steps the user can take to resolve the error, if any.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        match self {
            Self::DeviceNotFound { .. } => Some(
                "Please connect your Kindle using a USB cable and make sure it is in file transfer mode.\n\
                 You may need to:\n\
                 1. Connect your Kindle via USB\n\
                 2. Select 'Transfer files' when prompted on your Kindle\n\
                 3. Unlock the device and wait for it to mount\n\
                 4. Run vocabrs again (or pass --mount <path>)",
            ),
            Self::DeviceNotReadable { .. } => Some(
                "The device was detected but cannot be read. This might be due to:\n\
                 1. Insufficient permissions on the mount point\n\
                 2. The device not being in file transfer mode\n\
                 3. The device being locked - unlock it and try again\n\
                 4. File system issues - disconnect and reconnect the device",
            ),
            Self::FrequencyListUnavailable { .. } => {
                Some("Check your network connection; the list is cached after the first download.")
            }
            _ => None,
        }
    }
}
