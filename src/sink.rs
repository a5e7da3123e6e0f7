//! Output destinations for finished documents
//!
//! A sink is opened only once every page has been laid out, so a layout
//! failure never touches it. File output is written to a temporary sibling
//! and renamed into place on finalize; until then nothing readable exists at
//! the destination path.

use crate::Result;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Destination the serialized document is streamed into
pub trait Sink {
    /// What a successful render hands back (bytes, a path, ...)
    type Output;

    /// Open the sink for writing
    fn open(&mut self) -> Result<&mut dyn Write>;

    /// Flush everything and make the document visible
    fn finalize(&mut self) -> Result<Self::Output>;

    /// Discard anything written so far
    fn abort(&mut self) {}
}

/// In-memory sink, e.g. for returning a document in an HTTP response
#[derive(Debug, Default)]
pub struct BufferSink {
    buffer: Vec<u8>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Sink for BufferSink {
    type Output = Vec<u8>;

    fn open(&mut self) -> Result<&mut dyn Write> {
        self.buffer.clear();
        let writer: &mut dyn Write = &mut self.buffer;
        Ok(writer)
    }

    fn finalize(&mut self) -> Result<Vec<u8>> {
        Ok(std::mem::take(&mut self.buffer))
    }

    fn abort(&mut self) {
        self.buffer.clear();
    }
}

/// File sink with atomic visibility: write to a temporary file in the
/// target directory, rename over the target on finalize.
///
/// The target directory is created if it does not exist. Dropping an
/// unfinalized sink removes the temporary file.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    temp: Option<NamedTempFile>,
}

impl FileSink {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            temp: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Directory a file at `path` lives in (`.` for bare file names)
pub(crate) fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn temp_builder() -> tempfile::Builder<'static, 'static> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".lopdf-report-").suffix(".part");
    builder
}

impl Sink for FileSink {
    type Output = PathBuf;

    fn open(&mut self) -> Result<&mut dyn Write> {
        let dir = parent_dir(&self.path);
        std::fs::create_dir_all(&dir)?;
        let temp = temp_builder().tempfile_in(&dir)?;
        debug!("Writing {} via {}", self.path.display(), temp.path().display());
        let writer: &mut dyn Write = self.temp.insert(temp);
        Ok(writer)
    }

    fn finalize(&mut self) -> Result<PathBuf> {
        let mut temp = self
            .temp
            .take()
            .ok_or_else(|| io::Error::other("file sink was never opened"))?;
        temp.flush()?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| e.error)?;
        debug!("Persisted {}", self.path.display());
        Ok(self.path.clone())
    }

    fn abort(&mut self) {
        if let Some(temp) = self.temp.take() {
            if let Err(e) = temp.close() {
                warn!("Failed to remove partial output: {}", e);
            }
        }
    }
}

/// Write a finished document to `path` atomically.
///
/// The bytes go to a temporary sibling which is renamed over `path` once
/// fully synced. If the future is dropped before completion the temporary
/// file is removed.
#[cfg(feature = "async")]
pub async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<PathBuf> {
    use tokio::io::AsyncWriteExt;

    let dir = parent_dir(path);
    tokio::fs::create_dir_all(&dir).await?;
    // TempPath deletes the file when dropped, including on cancellation
    let temp = temp_builder().tempfile_in(&dir)?.into_temp_path();

    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(&temp)
        .await?;
    file.write_all(bytes).await?;
    file.sync_all().await?;
    drop(file);

    tokio::fs::rename(&temp, path).await?;
    // Already renamed; only disarm the cleanup
    let _ = temp.keep();
    debug!("Persisted {} ({} bytes)", path.display(), bytes.len());
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leftover_parts(dir: &Path) -> usize {
        std::fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".part"))
            .count()
    }

    #[test]
    fn test_buffer_sink() {
        let mut sink = BufferSink::new();
        sink.open().unwrap().write_all(b"%PDF").unwrap();
        assert_eq!(sink.finalize().unwrap(), b"%PDF".to_vec());
    }

    #[test]
    fn test_file_sink_creates_directory_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("out.pdf");
        let mut sink = FileSink::new(&target);

        sink.open().unwrap().write_all(b"%PDF-1.5").unwrap();
        assert!(!target.exists());

        let path = sink.finalize().unwrap();
        assert_eq!(path, target);
        assert_eq!(std::fs::read(&target).unwrap(), b"%PDF-1.5".to_vec());
        assert_eq!(leftover_parts(&dir.path().join("nested")), 0);
    }

    #[test]
    fn test_file_sink_abort_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.pdf");
        let mut sink = FileSink::new(&target);

        sink.open().unwrap().write_all(b"partial").unwrap();
        sink.abort();

        assert!(!target.exists());
        assert_eq!(leftover_parts(dir.path()), 0);
    }

    #[test]
    fn test_dropped_file_sink_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut sink = FileSink::new(dir.path().join("out.pdf"));
            sink.open().unwrap().write_all(b"partial").unwrap();
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_finalize_without_open_fails() {
        let mut sink = FileSink::new("never.pdf");
        assert!(sink.finalize().is_err());
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_write_atomic() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("reports").join("a.pdf");
        let path = write_atomic(&target, b"%PDF").await.unwrap();
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"%PDF".to_vec());
        assert_eq!(leftover_parts(&dir.path().join("reports")), 0);
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_write_atomic_cancelled_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("big.pdf");
        let bytes = vec![b'x'; 50 * 1024 * 1024];

        let result = tokio::time::timeout(
            std::time::Duration::from_millis(1),
            write_atomic(&target, &bytes),
        )
        .await;
        assert!(result.is_err(), "write finished before the timeout");

        assert!(!target.exists());
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert!(entries.is_empty(), "left behind: {:?}", entries);
    }
}
