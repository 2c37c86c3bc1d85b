#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Filesystem-based device discovery.
//!
//! The device shows up as a mass-storage mount. A candidate mount counts as
//! the device when it is a readable directory containing the firmware's
//! `system/` directory.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use vocabrs_core::{DEVICE_MARKER_DIR, DeviceLocator, DevicePath, Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    Ready,
    Unreadable,
    NotDevice,
    Missing,
}

fn probe(path: &Path) -> Probe {
    if !path.is_dir() {
        return Probe::Missing;
    }
    if std::fs::read_dir(path).is_err() {
        return Probe::Unreadable;
    }
    if path.join(DEVICE_MARKER_DIR).is_dir() {
        Probe::Ready
    } else {
        Probe::NotDevice
    }
}

fn is_pattern(path: &str) -> bool {
    path.contains(['*', '?', '['])
}

/// Looks for the device under conventional mount points.
#[derive(Debug, Clone)]
pub struct FsDeviceLocator {
    mount_path: Option<PathBuf>,
    search_paths: Vec<String>,
}

impl FsDeviceLocator {
    pub const fn new(search_paths: Vec<String>) -> Self {
        Self {
            mount_path: None,
            search_paths,
        }
    }

    /// Checks only `path` instead of searching.
    #[must_use]
    pub fn with_mount_path(mut self, path: Option<PathBuf>) -> Self {
        self.mount_path = path;
        self
    }

    /// Existing paths the search patterns expand to, in search order.
    #[must_use]
    pub fn candidates(&self) -> Vec<PathBuf> {
        let mut found = Vec::new();
        for pattern in &self.search_paths {
            if !is_pattern(pattern) {
                found.push(PathBuf::from(pattern));
                continue;
            }
            match glob::glob(pattern) {
                Ok(paths) => found.extend(paths.filter_map(std::result::Result::ok)),
                Err(e) => warn!("Skipping invalid search path '{pattern}': {e}"),
            }
        }
        found
    }

    fn locate_at(path: &Path) -> Result<DevicePath> {
        match probe(path) {
            Probe::Ready => Ok(DevicePath::new(path)),
            Probe::Unreadable => Err(Error::DeviceNotReadable {
                path: path.to_path_buf(),
            }),
            Probe::NotDevice | Probe::Missing => Err(Error::DeviceNotFound {
                searched: vec![path.display().to_string()],
            }),
        }
    }
}

impl DeviceLocator for FsDeviceLocator {
    fn locate(&self) -> Result<DevicePath> {
        if let Some(path) = &self.mount_path {
            return Self::locate_at(path);
        }

        let mut unreadable = None;
        for candidate in self.candidates() {
            match probe(&candidate) {
                Probe::Ready => return Ok(DevicePath::new(candidate)),
                Probe::Unreadable => {
                    debug!("{} exists but is not readable", candidate.display());
                    if unreadable.is_none() {
                        unreadable = Some(candidate);
                    }
                }
                Probe::NotDevice => debug!(
                    "{} has no {DEVICE_MARKER_DIR}/ directory, skipping",
                    candidate.display()
                ),
                Probe::Missing => {}
            }
        }

        if let Some(path) = unreadable {
            return Err(Error::DeviceNotReadable { path });
        }

        info!("No device under: {}", self.search_paths.join(", "));
        Err(Error::DeviceNotFound {
            searched: self.search_paths.clone(),
        })
    }
}
