//! CD drive access and disc ID reading

use discid::DiscId;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum CdDriveError {
    #[error("Device not found: {}", .0.display())]
    DeviceNotFound(PathBuf),
    #[error("No readable disc in drive: {0}")]
    NoDisc(String),
    #[error("Drive access error: {0}")]
    Access(String),
}

/// Represents a CD drive
#[derive(Debug, Clone, PartialEq)]
pub struct CdDrive {
    pub device_path: PathBuf,
}

/// Identification of the disc currently in the drive
#[derive(Debug, Clone, PartialEq)]
pub struct DiscInfo {
    pub disc_id: String,
    /// Web page for attaching this disc ID to a release by hand
    pub submission_url: String,
}

impl CdDrive {
    pub fn new(device_path: impl Into<PathBuf>) -> Self {
        Self {
            device_path: device_path.into(),
        }
    }

    /// The platform's default CD device, as reported by libdiscid
    pub fn default_device() -> Self {
        Self::new(DiscId::default_device())
    }

    pub fn device(&self) -> &Path {
        &self.device_path
    }

    /// Read the disc ID from the disc in this drive
    pub fn read_disc(&self) -> Result<DiscInfo, CdDriveError> {
        let device_str = self
            .device_path
            .to_str()
            .ok_or_else(|| CdDriveError::Access("Invalid device path".to_string()))?;

        // Drive numbers such as "1" on macOS are not filesystem paths.
        // libdiscid reports a missing device path the same way as an empty drive.
        if device_str.contains(std::path::is_separator) && !self.device_path.exists() {
            return Err(CdDriveError::DeviceNotFound(self.device_path.clone()));
        }

        debug!("Reading disc in {}", device_str);
        let disc = DiscId::read(Some(device_str))
            .map_err(|e| CdDriveError::NoDisc(e.to_string()))?;

        let info = DiscInfo {
            disc_id: disc.id(),
            submission_url: disc.submission_url(),
        };

        info!(
            "💿 Disc {} with tracks {}-{}",
            info.disc_id,
            disc.first_track_num(),
            disc.last_track_num()
        );
        Ok(info)
    }
}
