//! Compression detection for tar archives.
//!
//! Legacy archives arrive either as plain tar or wrapped in gzip. The wrapper
//! is recognised by its magic bytes, so the file name does not matter.

use std::io;
use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;

use flate2::bufread::MultiGzDecoder;

/// Gzip member header magic.
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Compression wrapping a tar stream.
///
/// # Examples
///
/// ```
/// use restorable_core::formats::compression::CompressionCodec;
///
/// assert_eq!(CompressionCodec::detect(&[0x1f, 0x8b, 0x08]), CompressionCodec::Gzip);
/// assert_eq!(CompressionCodec::detect(b"plain"), CompressionCodec::None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionCodec {
    /// Uncompressed tar.
    None,
    /// Gzip, possibly with several concatenated members.
    Gzip,
}

impl CompressionCodec {
    /// Detects the codec from the leading bytes of a stream.
    #[must_use]
    pub fn detect(prefix: &[u8]) -> Self {
        if prefix.starts_with(&GZIP_MAGIC) {
            Self::Gzip
        } else {
            Self::None
        }
    }

    /// Returns a short lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Gzip => "gzip",
        }
    }
}

/// A byte stream with its compression wrapper removed.
pub enum Decoder<R: Read> {
    /// Bytes are passed through.
    Plain(BufReader<R>),
    /// Bytes are gunzipped.
    Gzip(MultiGzDecoder<BufReader<R>>),
}

impl<R: Read> Decoder<R> {
    /// Peeks at the first bytes of `reader` and wraps it accordingly.
    pub fn new(reader: R) -> io::Result<Self> {
        let mut buffered = BufReader::new(reader);
        let codec = CompressionCodec::detect(buffered.fill_buf()?);
        Ok(match codec {
            CompressionCodec::Gzip => Self::Gzip(MultiGzDecoder::new(buffered)),
            CompressionCodec::None => Self::Plain(buffered),
        })
    }

    /// Returns the detected codec.
    #[must_use]
    pub const fn codec(&self) -> CompressionCodec {
        match self {
            Self::Plain(_) => CompressionCodec::None,
            Self::Gzip(_) => CompressionCodec::Gzip,
        }
    }
}

impl<R: Read> Read for Decoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Plain(r) => r.read(buf),
            Self::Gzip(r) => r.read(buf),
        }
    }
}

impl<R: Read> std::fmt::Debug for Decoder<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Decoder").field(&self.codec()).finish()
    }
}
