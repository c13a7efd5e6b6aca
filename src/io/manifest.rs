//! Freshness manifest read/write.
//!
//! The manifest is the fingerprint half of the idempotence gate: artifact
//! presence says nothing about which dataset produced them, so the driver
//! records a SHA-256 digest of the source file plus the pipeline version and
//! only skips work when both match.

use std::fs::{self, File};
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::domain::{MANIFEST_FILE, PIPELINE_VERSION, RunManifest};
use crate::error::{AppError, EXIT_IO};

/// SHA-256 of the source dataset, hex-encoded.
pub fn source_digest(path: &Path) -> Result<String, AppError> {
    let bytes = fs::read(path).map_err(|e| {
        AppError::new(EXIT_IO, format!("Failed to read dataset '{}': {e}", path.display()))
    })?;
    let digest = Sha256::digest(&bytes);
    Ok(digest.iter().map(|b| format!("{b:02x}")).collect())
}

/// The manifest a run over `dataset` would record right now.
pub fn current_manifest(dataset: &Path) -> Result<RunManifest, AppError> {
    Ok(RunManifest {
        tool: "pulse".to_string(),
        pipeline_version: PIPELINE_VERSION,
        source_sha256: source_digest(dataset)?,
    })
}

/// Write the manifest into the report directory.
pub fn write_manifest(report_dir: &Path, manifest: &RunManifest) -> Result<(), AppError> {
    let path = report_dir.join(MANIFEST_FILE);
    let file = File::create(&path).map_err(|e| {
        AppError::new(EXIT_IO, format!("Failed to create manifest '{}': {e}", path.display()))
    })?;
    serde_json::to_writer_pretty(file, manifest)
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to write manifest: {e}")))?;
    Ok(())
}

/// Read the manifest if present and well-formed; anything else reads as
/// "no manifest" and fails the gate.
pub fn read_manifest(report_dir: &Path) -> Option<RunManifest> {
    let file = File::open(report_dir.join(MANIFEST_FILE)).ok()?;
    serde_json::from_reader(file).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_stable_and_content_sensitive() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.csv");
        fs::write(&a, "OrderID,Revenue\nO1,10\n").unwrap();
        fs::write(&b, "OrderID,Revenue\nO1,11\n").unwrap();

        assert_eq!(source_digest(&a).unwrap(), source_digest(&a).unwrap());
        assert_ne!(source_digest(&a).unwrap(), source_digest(&b).unwrap());
    }

    #[test]
    fn manifest_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = RunManifest {
            tool: "pulse".to_string(),
            pipeline_version: PIPELINE_VERSION,
            source_sha256: "abc123".to_string(),
        };
        write_manifest(dir.path(), &manifest).unwrap();
        assert_eq!(read_manifest(dir.path()), Some(manifest));
    }

    #[test]
    fn corrupt_manifest_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), "{not json").unwrap();
        assert_eq!(read_manifest(dir.path()), None);
    }
}
