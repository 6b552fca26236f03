//! Bounded asynchronous file reads.

use std::path::Path;

use tokio::fs as tokio_fs;
use tokio::io::AsyncReadExt;

use crate::classify::is_binary;
use crate::error::GateError;

/// Stat, size-check, read, and binary-check a file.
async fn read_bounded(path: &Path, max_bytes: u64) -> Result<Vec<u8>, GateError> {
    let metadata = tokio_fs::metadata(path)
        .await
        .map_err(|_| GateError::NotFound(path.to_string_lossy().to_string()))?;

    if metadata.len() > max_bytes {
        return Err(GateError::TooLarge(metadata.len(), max_bytes));
    }

    let mut file = tokio_fs::File::open(path).await?;
    let mut buffer = Vec::with_capacity(usize::try_from(metadata.len()).unwrap_or(0));
    file.read_to_end(&mut buffer).await?;

    if is_binary(&buffer) {
        return Err(GateError::BinaryFile);
    }
    Ok(buffer)
}

/// Read text from a file with size and binary checks.
///
/// Invalid UTF-8 is decoded lossily (sequences become U+FFFD). Suitable for
/// display-only reads; content that will be written back must go through
/// [`read_text_strict`] instead, since persisting a lossy decode would
/// rewrite bytes the caller never touched.
///
/// # Arguments
/// * `path` - Path to the file
/// * `max_bytes` - Maximum file size in bytes
///
/// # Errors
///
/// Returns `GateError::NotFound` for a missing file, `GateError::TooLarge`
/// when the size ceiling is exceeded, and `GateError::BinaryFile` when the
/// content fails the binary check.
pub async fn read_text(path: &Path, max_bytes: u64) -> Result<String, GateError> {
    let buffer = read_bounded(path, max_bytes).await?;
    match String::from_utf8(buffer) {
        Ok(s) => Ok(s),
        Err(e) => Ok(String::from_utf8_lossy(&e.into_bytes()).into_owned()),
    }
}

/// Read text from a file, requiring valid UTF-8.
///
/// Same checks as [`read_text`], but a decode failure is an error rather
/// than a lossy substitution. The mutation pipeline reads through this:
/// writing back a lossily decoded file would silently corrupt every
/// non-UTF-8 byte, including on lines no edit touched.
///
/// # Errors
///
/// As [`read_text`], plus `GateError::InvalidEncoding` when the content is
/// not valid UTF-8.
pub async fn read_text_strict(path: &Path, max_bytes: u64) -> Result<String, GateError> {
    let buffer = read_bounded(path, max_bytes).await?;
    String::from_utf8(buffer).map_err(|_| GateError::InvalidEncoding)
}

/// Read at most `len` bytes from the start of a file.
///
/// # Errors
///
/// Returns `GateError::NotFound` for a missing file; other I/O failures
/// propagate as `GateError::System`.
pub async fn read_prefix(path: &Path, len: usize) -> Result<Vec<u8>, GateError> {
    let file = tokio_fs::File::open(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            GateError::NotFound(path.to_string_lossy().to_string())
        } else {
            GateError::System(e)
        }
    })?;

    let mut buffer = Vec::with_capacity(len);
    let mut handle = file.take(len as u64);
    handle.read_to_end(&mut buffer).await?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_read_text() {
        let dir = TempDir::new().unwrap();
        let p = dir.path().join("read.txt");
        std::fs::write(&p, "Gate Read").unwrap();
        assert_eq!(read_text(&p, 1024).await.unwrap(), "Gate Read");
    }

    #[tokio::test]
    async fn test_read_binary_rejected() {
        let dir = TempDir::new().unwrap();
        let p = dir.path().join("binary.bin");
        std::fs::write(&p, b"\x00\x01\x02\x03").unwrap();
        assert!(matches!(
            read_text(&p, 1024).await,
            Err(GateError::BinaryFile)
        ));
    }

    #[tokio::test]
    async fn test_read_too_large() {
        let dir = TempDir::new().unwrap();
        let p = dir.path().join("large.txt");
        std::fs::write(&p, "12345678901234567890").unwrap();
        assert!(matches!(
            read_text(&p, 10).await,
            Err(GateError::TooLarge(20, 10))
        ));
    }

    #[tokio::test]
    async fn test_read_not_found() {
        let result = read_text(Path::new("/nonexistent/file.txt"), 1024).await;
        assert!(matches!(result, Err(GateError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_lossy_read_substitutes_invalid_bytes() {
        let dir = TempDir::new().unwrap();
        let p = dir.path().join("latin1.txt");
        std::fs::write(&p, b"caf\xe9\n").unwrap();
        assert_eq!(read_text(&p, 1024).await.unwrap(), "caf\u{fffd}\n");
    }

    #[tokio::test]
    async fn test_strict_read_rejects_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let p = dir.path().join("latin1.txt");
        std::fs::write(&p, b"caf\xe9\n").unwrap();
        assert!(matches!(
            read_text_strict(&p, 1024).await,
            Err(GateError::InvalidEncoding)
        ));
    }

    #[tokio::test]
    async fn test_strict_read_accepts_valid_utf8() {
        let dir = TempDir::new().unwrap();
        let p = dir.path().join("utf8.txt");
        std::fs::write(&p, "café 日本語\n").unwrap();
        assert_eq!(read_text_strict(&p, 1024).await.unwrap(), "café 日本語\n");
    }

    #[tokio::test]
    async fn test_read_prefix_is_bounded() {
        let dir = TempDir::new().unwrap();
        let p = dir.path().join("prefix.txt");
        std::fs::write(&p, "abcdefgh").unwrap();
        let prefix = read_prefix(&p, 4).await.unwrap();
        assert_eq!(prefix, b"abcd");
    }
}
