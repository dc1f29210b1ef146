use async_trait::async_trait;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::errors::{LendingError, Result};

pub const PDF_MIME: &str = "application/pdf";

/// native share sheet (or anything else that takes a finished file)
#[async_trait]
pub trait ShareTarget: Send + Sync {
    async fn share(&self, path: &Path, mime_type: &str) -> Result<()>;
}

/// where a rendered receipt goes
#[derive(Clone, Copy)]
pub enum ReceiptOutput<'a> {
    /// hand the bytes back, e.g. for a browser download
    Download,
    /// write under the configured directory, then share the file
    SaveAndShare(&'a dyn ShareTarget),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiptArtifact {
    Download { file_name: String, bytes: Vec<u8> },
    Shared { path: PathBuf },
}

pub(crate) async fn deliver(
    output: ReceiptOutput<'_>,
    dir: &Path,
    file_name: String,
    bytes: Vec<u8>,
) -> Result<ReceiptArtifact> {
    match output {
        ReceiptOutput::Download => Ok(ReceiptArtifact::Download { file_name, bytes }),
        ReceiptOutput::SaveAndShare(target) => {
            let path = dir.join(&file_name);
            write_atomic(&path, &bytes)?;
            target.share(&path, PDF_MIME).await?;
            info!(path = %path.display(), "receipt shared");
            Ok(ReceiptArtifact::Shared { path })
        }
    }
}

/// write to a hidden sibling, then rename over `path`; no partial file survives a failure
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| LendingError::Asset {
            message: format!("not a file path: {}", path.display()),
        })?;
    fs::create_dir_all(dir).map_err(|e| LendingError::io(dir.display().to_string(), e))?;

    let tmp = dir.join(format!(".{file_name}.part"));
    let written = fs::File::create(&tmp)
        .and_then(|mut file| {
            file.write_all(bytes)?;
            file.sync_all()
        })
        .and_then(|_| fs::rename(&tmp, path));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(LendingError::io(path.display().to_string(), e));
    }
    debug!(path = %path.display(), bytes = bytes.len(), "file written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingShare {
        shared: Mutex<Vec<PathBuf>>,
    }

    #[async_trait]
    impl ShareTarget for RecordingShare {
        async fn share(&self, path: &Path, mime_type: &str) -> Result<()> {
            assert_eq!(mime_type, PDF_MIME);
            assert!(path.exists());
            self.shared.lock().unwrap().push(path.to_path_buf());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_download_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = deliver(ReceiptOutput::Download, dir.path(), "r.pdf".into(), vec![1, 2])
            .await
            .unwrap();
        assert_eq!(artifact, ReceiptArtifact::Download { file_name: "r.pdf".into(), bytes: vec![1, 2] });
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_save_and_share() {
        let dir = tempfile::tempdir().unwrap();
        let share = RecordingShare::default();
        let artifact = deliver(
            ReceiptOutput::SaveAndShare(&share),
            &dir.path().join("receipts"),
            "r.pdf".into(),
            b"%PDF-1.4".to_vec(),
        )
        .await
        .unwrap();

        let path = dir.path().join("receipts").join("r.pdf");
        assert_eq!(artifact, ReceiptArtifact::Shared { path: path.clone() });
        assert_eq!(fs::read(&path).unwrap(), b"%PDF-1.4");
        assert_eq!(share.shared.lock().unwrap().as_slice(), &[path]);
    }

    #[test]
    fn test_failed_write_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        // a directory squatting on the target name makes the rename fail
        let target = dir.path().join("taken.pdf");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), b"x").unwrap();

        assert!(write_atomic(&target, b"data").is_err());
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["taken.pdf".to_string()]);
    }
}
