//! Buffered copy of entry data into destination files.

use std::io;
use std::io::Read;
use std::io::Write;

use crate::ExtractionError;
use crate::ProgressCallback;
use crate::Result;

/// Buffer size for entry copies (64KB).
const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Reusable stack buffer shared by every file of one extraction.
#[derive(Debug)]
pub struct CopyBuffer {
    #[allow(clippy::large_stack_arrays)]
    buf: [u8; COPY_BUFFER_SIZE],
}

impl CopyBuffer {
    /// Creates a zeroed copy buffer.
    #[inline]
    #[must_use]
    #[allow(clippy::large_stack_arrays)]
    pub const fn new() -> Self {
        Self {
            buf: [0u8; COPY_BUFFER_SIZE],
        }
    }

    /// Returns the buffer size in bytes.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        COPY_BUFFER_SIZE
    }
}

impl Default for CopyBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies `reader` into `writer`, reporting each chunk to `progress`.
///
/// Corrupt or truncated entry data surfaces as
/// [`ExtractionError::InvalidArchive`]; write failures stay I/O errors.
///
/// # Errors
///
/// Returns an error if reading the entry or writing the destination fails.
pub fn copy_with_buffer<R: Read + ?Sized, W: Write + ?Sized>(
    reader: &mut R,
    writer: &mut W,
    buffer: &mut CopyBuffer,
    progress: &mut dyn ProgressCallback,
) -> Result<u64> {
    let mut total: u64 = 0;

    loop {
        let bytes_read = match reader.read(&mut buffer.buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(entry_read_error(e)),
        };

        writer.write_all(&buffer.buf[..bytes_read])?;

        total = total
            .checked_add(bytes_read as u64)
            .ok_or_else(|| ExtractionError::InvalidArchive("entry size overflows u64".into()))?;
        progress.on_bytes_written(bytes_read as u64);
    }

    Ok(total)
}

fn entry_read_error(err: io::Error) -> ExtractionError {
    match err.kind() {
        io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof => {
            ExtractionError::InvalidArchive(format!("corrupt entry data: {err}"))
        }
        _ => ExtractionError::Io(err),
    }
}

/// Returns `true` if opening a destination failed because the OS holds it
/// locked, such as a running executable or a file open elsewhere.
///
/// Windows reports a file in use as access denied, so `PermissionDenied`
/// counts there. Elsewhere it means an unwritable location and is an error.
#[must_use]
pub fn is_busy(err: &io::Error) -> bool {
    // ERROR_SHARING_VIOLATION and ERROR_LOCK_VIOLATION
    const WINDOWS_LOCK_ERRORS: [i32; 2] = [32, 33];

    match err.kind() {
        io::ErrorKind::ResourceBusy | io::ErrorKind::ExecutableFileBusy => true,
        io::ErrorKind::PermissionDenied => cfg!(windows),
        _ => cfg!(windows) && err.raw_os_error().is_some_and(|c| WINDOWS_LOCK_ERRORS.contains(&c)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::NoopProgress;
    use std::io::Cursor;

    struct CountingProgress {
        bytes: u64,
    }

    impl ProgressCallback for CountingProgress {
        fn on_entry_start(&mut self, _: &std::path::Path, _: usize, _: usize) {}
        fn on_bytes_written(&mut self, bytes: u64) {
            self.bytes += bytes;
        }
        fn on_entry_complete(&mut self, _: &std::path::Path) {}
        fn on_complete(&mut self) {}
    }

    struct FailingReader(io::ErrorKind);

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(self.0, "boom"))
        }
    }

    #[test]
    fn test_copy_buffer_size() {
        assert_eq!(CopyBuffer::new().size(), 64 * 1024);
        assert_eq!(CopyBuffer::default().size(), 64 * 1024);
    }

    #[test]
    fn test_copy_empty_source() {
        let mut buffer = CopyBuffer::new();
        let mut output = Vec::new();
        let copied = copy_with_buffer(
            &mut Cursor::new(Vec::<u8>::new()),
            &mut output,
            &mut buffer,
            &mut NoopProgress,
        )
        .unwrap();
        assert_eq!(copied, 0);
        assert!(output.is_empty());
    }

    #[test]
    fn test_copy_reports_progress() {
        let data = vec![0x42u8; 200 * 1024];
        let mut buffer = CopyBuffer::new();
        let mut output = Vec::new();
        let mut progress = CountingProgress { bytes: 0 };

        let copied =
            copy_with_buffer(&mut Cursor::new(&data), &mut output, &mut buffer, &mut progress)
                .unwrap();

        assert_eq!(copied, data.len() as u64);
        assert_eq!(progress.bytes, data.len() as u64);
        assert_eq!(output, data);
    }

    #[test]
    fn test_corrupt_data_is_format_error() {
        let mut buffer = CopyBuffer::new();
        let err = copy_with_buffer(
            &mut FailingReader(io::ErrorKind::InvalidData),
            &mut Vec::new(),
            &mut buffer,
            &mut NoopProgress,
        )
        .unwrap_err();
        assert!(err.is_format_error());

        let err = copy_with_buffer(
            &mut FailingReader(io::ErrorKind::Other),
            &mut Vec::new(),
            &mut buffer,
            &mut NoopProgress,
        )
        .unwrap_err();
        assert!(matches!(err, ExtractionError::Io(_)));
    }

    #[test]
    fn test_is_busy() {
        assert!(is_busy(&io::Error::from(io::ErrorKind::ResourceBusy)));
        assert!(is_busy(&io::Error::from(io::ErrorKind::ExecutableFileBusy)));
        assert_eq!(
            is_busy(&io::Error::from(io::ErrorKind::PermissionDenied)),
            cfg!(windows)
        );
        assert!(!is_busy(&io::Error::from(io::ErrorKind::NotFound)));
        assert!(!is_busy(&io::Error::from(io::ErrorKind::StorageFull)));
    }
}
