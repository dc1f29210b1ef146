//! Photo capture behind a host-provided capability.
//!
//! The host (camera app, file picker, test fake) implements [`MediaCapture`];
//! [`capture_image`] applies the permission and retry rules around it.

use async_trait::async_trait;
use std::fmt;
use tracing::{debug, warn};

use crate::errors::{LendingError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaSource {
    Camera,
    Gallery,
}

impl fmt::Display for MediaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaSource::Camera => write!(f, "camera"),
            MediaSource::Gallery => write!(f, "gallery"),
        }
    }
}

/// encoded image ready for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime_type: String,
}

impl CapturedImage {
    pub fn jpeg(bytes: Vec<u8>, file_name: impl Into<String>) -> Self {
        Self {
            bytes,
            file_name: file_name.into(),
            mime_type: "image/jpeg".to_string(),
        }
    }
}

#[async_trait]
pub trait MediaCapture: Send + Sync {
    /// ask the user for access; `Ok(false)` means refused
    async fn request_permission(&self, source: MediaSource) -> Result<bool>;

    async fn capture(&self, source: MediaSource) -> Result<CapturedImage>;
}

/// permission first, then capture with a single retry
pub async fn capture_image(
    media: &dyn MediaCapture,
    source: MediaSource,
) -> Result<CapturedImage> {
    if !media.request_permission(source).await? {
        warn!(%source, "media permission refused");
        return Err(LendingError::PermissionDenied {
            capability: source.to_string(),
        });
    }

    let image = match media.capture(source).await {
        Ok(image) => image,
        Err(LendingError::PermissionDenied { capability }) => {
            return Err(LendingError::PermissionDenied { capability })
        }
        Err(LendingError::Cancelled) => return Err(LendingError::Cancelled),
        Err(first) => {
            debug!(%source, error = %first, "capture failed, retrying once");
            media.capture(source).await?
        }
    };

    if image.bytes.is_empty() {
        return Err(LendingError::Capture {
            message: format!("{source} returned an empty image"),
        });
    }
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct FakeCapture {
        granted: bool,
        failures_before_success: u32,
        attempts: AtomicU32,
    }

    impl FakeCapture {
        fn new(granted: bool, failures_before_success: u32) -> Self {
            Self { granted, failures_before_success, attempts: AtomicU32::new(0) }
        }
    }

    #[async_trait]
    impl MediaCapture for FakeCapture {
        async fn request_permission(&self, _source: MediaSource) -> Result<bool> {
            Ok(self.granted)
        }

        async fn capture(&self, _source: MediaSource) -> Result<CapturedImage> {
            let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
            if attempt < self.failures_before_success {
                return Err(LendingError::Capture { message: "sensor busy".into() });
            }
            Ok(CapturedImage::jpeg(vec![0xFF, 0xD8, 0xFF], "photo.jpg"))
        }
    }

    #[tokio::test]
    async fn test_denied_permission_never_captures() {
        let fake = FakeCapture::new(false, 0);
        let err = capture_image(&fake, MediaSource::Camera).await.unwrap_err();
        assert!(matches!(err, LendingError::PermissionDenied { ref capability } if capability == "camera"));
        assert_eq!(fake.attempts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_retries_once() {
        let fake = FakeCapture::new(true, 1);
        let image = capture_image(&fake, MediaSource::Gallery).await.unwrap();
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(fake.attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_gives_up_after_second_failure() {
        let fake = FakeCapture::new(true, 5);
        let err = capture_image(&fake, MediaSource::Camera).await.unwrap_err();
        assert!(matches!(err, LendingError::Capture { .. }));
        assert_eq!(fake.attempts.load(Ordering::SeqCst), 2);
    }
}
