//! Durable, atomic manifest persistence.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::domain::DeploymentManifest;
use crate::error::{PipelineError, Result};
use crate::port::{ProgressEvent, ProgressReporter};

/// What to do when a manifest already exists at the target path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExistingManifestPolicy {
    /// Replace it wholesale.
    #[default]
    Overwrite,
    /// Fail without touching it.
    Refuse,
}

/// Writes the deployment manifest.
pub struct DeploymentRecorder {
    policy: ExistingManifestPolicy,
    reporter: Arc<dyn ProgressReporter>,
}

impl DeploymentRecorder {
    pub fn new(policy: ExistingManifestPolicy, reporter: Arc<dyn ProgressReporter>) -> Self {
        Self { policy, reporter }
    }

    /// Persist `manifest` at `path`.
    ///
    /// The target is replaced by rename, so readers see either the previous
    /// file or the complete new one, never a partial write.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Persistence`] carrying the deployed address.
    /// The deployment itself already happened, so the address is also
    /// logged for manual recovery.
    pub fn record(&self, manifest: &DeploymentManifest, path: &Path) -> Result<()> {
        let persistence = |source: io::Error| {
            error!(
                address = %manifest.resource_address,
                path = %path.display(),
                error = %source,
                "Failed to record deployment; record the address manually"
            );
            PipelineError::Persistence {
                path: path.to_path_buf(),
                address: manifest.resource_address.clone(),
                source,
            }
        };

        if self.policy == ExistingManifestPolicy::Refuse && path.exists() {
            return Err(persistence(io::Error::new(
                io::ErrorKind::AlreadyExists,
                "manifest already exists and the refuse policy is set",
            ))
            .into());
        }

        let json = serde_json::to_vec_pretty(manifest)
            .map_err(|e| persistence(io::Error::new(io::ErrorKind::InvalidData, e)))?;
        write_atomic(path, &json).map_err(persistence)?;

        info!(address = %manifest.resource_address, path = %path.display(), "Manifest written");
        self.reporter.report(ProgressEvent::ManifestRecorded {
            path: path.to_path_buf(),
        });
        Ok(())
    }

    /// Read a previously recorded manifest, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Option<DeploymentManifest>> {
        let contents = match fs::read(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&contents)?))
    }
}

/// Sibling temp path used while writing `path`.
pub(crate) fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `bytes` to `path` via a synced temp file and a rename.
///
/// The temp file lives in the same directory so the rename never crosses
/// filesystems. It is removed if any step fails.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let temp_path = temp_path(path);
    let mut file = fs::File::create(&temp_path)?;

    let cleanup_and_err = |e| {
        let _ = fs::remove_file(&temp_path);
        e
    };

    file.write_all(bytes).map_err(cleanup_and_err)?;
    file.sync_all().map_err(cleanup_and_err)?;
    drop(file);

    fs::rename(&temp_path, path).map_err(cleanup_and_err)
}
