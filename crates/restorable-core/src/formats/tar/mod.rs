//! Legacy tar archive reader.
//!
//! [`TarReader`] enumerates the entries of a tar archive, optionally gzip
//! wrapped, and streams their data. It holds exactly one open stream over the
//! source. Enumeration and data reads share that stream's cursor:
//!
//! - data of the entry at the cursor, or of any entry ahead of it, is served by
//!   skipping forward;
//! - data of an entry behind the cursor (or one whose bytes were partly
//!   consumed) is served by reopening the source and skipping forward again.
//!
//! Reopening never disturbs enumeration: [`TarReader::next_entry`] continues
//! after the last entry it returned.
//!
//! # Examples
//!
//! ```no_run
//! use restorable_core::formats::tar::TarReader;
//! use std::io::Read;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut reader = TarReader::open_path("bundle.tar.gz")?;
//! while let Some(entry) = reader.next_entry()? {
//!     if entry.name == "META-INF/MANIFEST.MF" {
//!         let mut manifest = String::new();
//!         reader.entry_data(&entry)?.read_to_string(&mut manifest)?;
//!         println!("{manifest}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod header;
mod source;

use std::fmt;
use std::io;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;
use std::time::SystemTime;

use tracing::debug;

pub use source::MemorySource;
pub use source::TarSource;

use self::header::BLOCK_SIZE;
use self::header::MAX_EXTENSION_SIZE;
use self::header::PaxOverrides;
use self::header::invalid;
use super::compression::CompressionCodec;
use super::compression::Decoder;
use crate::CancellationToken;
use crate::ExtractionError;
use crate::Result;

/// One member of a tar archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TarEntry {
    /// Slash-separated name as stored in the archive.
    pub name: String,
    /// `true` for directory entries.
    pub is_dir: bool,
    /// Size of the entry data in bytes.
    pub size: u64,
    /// Modification time recorded in the header.
    pub mtime: SystemTime,
    /// Zero-based position of the entry in the archive.
    pub index: usize,
}

/// Cursor state of the open stream.
#[derive(Debug, Default)]
struct Cursor {
    /// Entry whose header was read last. `None` at end of archive.
    current: Option<TarEntry>,
    /// Unread data bytes of `current`.
    remaining: u64,
    /// Padding bytes following the data of `current`.
    padding: u64,
    /// Index the next header read will get.
    next_index: usize,
    /// Whether a block has been read from the current stream.
    started: bool,
}

impl Cursor {
    fn untouched(&self, entry: &TarEntry) -> bool {
        self.current
            .as_ref()
            .is_some_and(|c| c.index == entry.index && self.remaining == c.size)
    }

    fn ahead_of(&self, entry: &TarEntry) -> bool {
        self.current.as_ref().is_some_and(|c| c.index < entry.index)
    }
}

/// Reader over a tar archive that can revisit entries by reopening its
/// source.
#[derive(Debug)]
pub struct TarReader<S: TarSource = PathBuf> {
    source: S,
    stream: Option<Decoder<S::Reader>>,
    cursor: Cursor,
    /// Index the next `next_entry` call must reach.
    next_yield: usize,
    reopen_count: usize,
    cancel: Option<CancellationToken>,
}

impl TarReader<PathBuf> {
    /// Opens the tar or tar.gz file at `path`.
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::open(path.as_ref().to_path_buf())
    }
}

impl<S: TarSource> TarReader<S> {
    /// Opens `source` and reads the first header.
    ///
    /// # Errors
    ///
    /// - `ExtractionError::Io` if the source cannot be opened
    /// - `ExtractionError::InvalidArchive` if the first block is not a valid
    ///   header, or the source holds no data at all. An archive starting with
    ///   an end-of-archive block is valid and has no entries.
    pub fn open(source: S) -> Result<Self> {
        let stream = Decoder::new(source.open()?)?;
        debug!(codec = stream.codec().name(), "opened tar archive");

        let mut reader = Self {
            source,
            stream: Some(stream),
            cursor: Cursor::default(),
            next_yield: 0,
            reopen_count: 0,
            cancel: None,
        };
        reader.read_header()?;
        Ok(reader)
    }

    /// Checks `token` at every entry boundary.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Returns the codec detected when the source was last opened.
    #[must_use]
    pub fn codec(&self) -> Option<CompressionCodec> {
        self.stream.as_ref().map(Decoder::codec)
    }

    /// Returns the next entry, or `None` at the end of the archive.
    pub fn next_entry(&mut self) -> Result<Option<TarEntry>> {
        self.check_cancelled()?;
        loop {
            match &self.cursor.current {
                None => return Ok(None),
                Some(current) if current.index >= self.next_yield => {
                    self.next_yield = current.index + 1;
                    return Ok(Some(current.clone()));
                }
                Some(_) => self.advance()?,
            }
        }
    }

    /// Iterates the remaining entries. Enumeration shares the reader's
    /// cursor and cannot be restarted.
    pub fn entries(&mut self) -> Entries<'_, S> {
        Entries {
            reader: self,
            done: false,
        }
    }

    /// Returns `true` if [`entry_data`](Self::entry_data) can serve `entry`
    /// without reopening the source.
    #[must_use]
    pub fn data_available(&self, entry: &TarEntry) -> bool {
        self.cursor.untouched(entry) || self.cursor.ahead_of(entry)
    }

    /// Returns a reader over the data of `entry`.
    ///
    /// # Errors
    ///
    /// - `ExtractionError::EntryNotFound` if `entry` is not in this archive
    /// - `ExtractionError::InvalidArchive` if the archive is truncated or
    ///   corrupt on the way to the entry
    /// - `ExtractionError::Io` if the source cannot be reopened
    pub fn entry_data(&mut self, entry: &TarEntry) -> Result<EntryReader<'_, S>> {
        if !self.cursor.untouched(entry) {
            if !self.cursor.ahead_of(entry) {
                self.reopen()?;
            }
            self.skip_to(entry)?;
        }

        Ok(EntryReader { reader: self })
    }

    /// Returns the first entry named `name` after the cursor.
    pub fn find(&mut self, name: &str) -> Result<Option<TarEntry>> {
        while let Some(entry) = self.next_entry()? {
            if entry.name == name || entry.name.trim_end_matches('/') == name {
                return Ok(Some(entry));
            }
        }
        Ok(None)
    }

    /// Returns how many times the source has been reopened.
    #[must_use]
    pub fn reopen_count(&self) -> usize {
        self.reopen_count
    }

    /// Releases the source stream.
    pub fn close(self) {
        drop(self);
    }

    fn check_cancelled(&self) -> Result<()> {
        self.cancel.as_ref().map_or(Ok(()), CancellationToken::check)
    }

    fn reopen(&mut self) -> Result<()> {
        self.stream = None;
        self.cursor = Cursor::default();
        self.stream = Some(Decoder::new(self.source.open()?)?);
        self.reopen_count += 1;
        debug!(reopen_count = self.reopen_count, "reopened tar archive");
        self.read_header()
    }

    fn skip_to(&mut self, entry: &TarEntry) -> Result<()> {
        loop {
            let not_found = || ExtractionError::EntryNotFound {
                name: entry.name.clone(),
            };
            match &self.cursor.current {
                None => return Err(not_found()),
                Some(current) if current.index < entry.index => {
                    self.check_cancelled()?;
                    self.advance()?;
                }
                Some(current) if current.index == entry.index && current.name == entry.name => {
                    return Ok(());
                }
                Some(_) => return Err(not_found()),
            }
        }
    }

    /// Skips the rest of the current entry and reads the next header.
    fn advance(&mut self) -> Result<()> {
        let skip = self
            .cursor
            .remaining
            .checked_add(self.cursor.padding)
            .ok_or_else(|| invalid("entry size overflows".to_string()))?;
        self.cursor.remaining = 0;
        self.cursor.padding = 0;
        self.skip_bytes(skip)?;
        self.read_header()
    }

    fn read_header(&mut self) -> Result<()> {
        let mut long_name: Option<Vec<u8>> = None;
        let mut pax = PaxOverrides::default();

        loop {
            let Some(block) = self.read_block()? else {
                return self.finish();
            };
            let Some(raw) = header::parse(&block)? else {
                return self.finish();
            };

            let kind = raw.entry_type;
            if kind.is_gnu_longname() || kind.is_pax_local_extensions() {
                let data = self.read_extension(raw.size)?;
                if kind.is_gnu_longname() {
                    long_name = Some(header::trim_nul(data));
                } else {
                    pax = PaxOverrides::parse(&data)?;
                }
                continue;
            }
            if kind.is_gnu_longlink() || kind.is_pax_global_extensions() {
                self.skip_bytes(header::data_span(raw.size)?)?;
                continue;
            }

            let name_bytes = pax.path.take().or_else(|| long_name.take()).unwrap_or(raw.name);
            let name = String::from_utf8_lossy(&name_bytes).into_owned();
            let size = pax.size.unwrap_or(raw.size);
            let padding = header::data_span(size)? - size;
            let mtime = pax.mtime.unwrap_or(raw.mtime);

            let entry = TarEntry {
                is_dir: kind.is_dir() || name.ends_with('/'),
                name,
                size,
                mtime: SystemTime::UNIX_EPOCH
                    .checked_add(Duration::from_secs(mtime))
                    .unwrap_or(SystemTime::UNIX_EPOCH),
                index: self.cursor.next_index,
            };
            self.cursor.next_index += 1;
            self.cursor.remaining = size;
            self.cursor.padding = padding;
            self.cursor.current = Some(entry);
            return Ok(());
        }
    }

    fn finish(&mut self) -> Result<()> {
        self.cursor.current = None;
        self.cursor.remaining = 0;
        self.cursor.padding = 0;
        Ok(())
    }

    fn read_extension(&mut self, size: u64) -> Result<Vec<u8>> {
        if size > MAX_EXTENSION_SIZE {
            return Err(invalid(format!("extended header of {size} bytes")));
        }
        let mut data = Vec::new();
        self.stream()?
            .take(size)
            .read_to_end(&mut data)
            .map_err(read_error)?;
        if data.len() as u64 != size {
            return Err(invalid("truncated extended header".to_string()));
        }
        self.skip_bytes(header::padding(size))?;
        Ok(data)
    }

    /// Reads one block; `None` on a clean end of stream.
    fn read_block(&mut self) -> Result<Option<[u8; BLOCK_SIZE as usize]>> {
        let mut block = [0u8; BLOCK_SIZE as usize];
        let mut filled = 0;
        let stream = self.stream()?;
        while filled < block.len() {
            match stream.read(&mut block[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(read_error(e)),
            }
        }
        match filled {
            0 if !self.cursor.started => Err(invalid("archive stream is empty".to_string())),
            0 => Ok(None),
            n if n == block.len() => {
                self.cursor.started = true;
                Ok(Some(block))
            }
            _ => Err(invalid("truncated header block".to_string())),
        }
    }

    fn skip_bytes(&mut self, count: u64) -> Result<()> {
        if count == 0 {
            return Ok(());
        }
        let skipped = io::copy(&mut self.stream()?.take(count), &mut io::sink()).map_err(read_error)?;
        if skipped == count {
            Ok(())
        } else {
            Err(invalid("truncated entry data".to_string()))
        }
    }

    fn stream(&mut self) -> Result<&mut Decoder<S::Reader>> {
        self.stream
            .as_mut()
            .ok_or_else(|| ExtractionError::Io(io::Error::other("tar source is not open")))
    }
}

/// Returns `true` if `block` starts with a header block whose checksum
/// verifies.
pub(crate) fn is_tar_header(block: &[u8]) -> bool {
    block
        .get(..BLOCK_SIZE as usize)
        .and_then(|b| <&[u8; BLOCK_SIZE as usize]>::try_from(b).ok())
        .is_some_and(|b| matches!(header::parse(b), Ok(Some(_))))
}

fn read_error(e: io::Error) -> ExtractionError {
    match e.kind() {
        io::ErrorKind::InvalidData | io::ErrorKind::InvalidInput | io::ErrorKind::UnexpectedEof => {
            invalid(e.to_string())
        }
        _ => ExtractionError::Io(e),
    }
}

/// Data of one entry, read through the parent reader's stream.
///
/// Dropping it leaves the stream open and positioned inside the entry.
pub struct EntryReader<'a, S: TarSource> {
    reader: &'a mut TarReader<S>,
}

impl<S: TarSource> fmt::Debug for EntryReader<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryReader")
            .field("remaining", &self.remaining())
            .finish_non_exhaustive()
    }
}

impl<S: TarSource> EntryReader<'_, S> {
    /// Returns the number of bytes not read yet.
    #[must_use]
    pub fn remaining(&self) -> u64 {
        self.reader.cursor.remaining
    }
}

impl<S: TarSource> Read for EntryReader<'_, S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.reader.cursor.remaining;
        if remaining == 0 || buf.is_empty() {
            return Ok(0);
        }

        let max = usize::try_from(remaining).map_or(buf.len(), |r| r.min(buf.len()));
        let stream = self
            .reader
            .stream
            .as_mut()
            .ok_or_else(|| io::Error::other("tar source is not open"))?;
        let n = stream.read(&mut buf[..max])?;
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "truncated entry data",
            ));
        }
        self.reader.cursor.remaining -= n as u64;
        Ok(n)
    }
}

/// Iterator returned by [`TarReader::entries`]. Stops after the first error.
pub struct Entries<'a, S: TarSource> {
    reader: &'a mut TarReader<S>,
    done: bool,
}

impl<S: TarSource> fmt::Debug for Entries<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entries")
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

impl<S: TarSource> Iterator for Entries<'_, S> {
    type Item = Result<TarEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.next_entry() {
            Ok(Some(entry)) => Some(Ok(entry)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<S: TarSource> std::iter::FusedIterator for Entries<'_, S> {}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::test_utils::TarTestBuilder;
    use crate::test_utils::gzip;

    fn open(bytes: Vec<u8>) -> TarReader<MemorySource> {
        TarReader::open(MemorySource::from(bytes)).expect("archive should open")
    }

    fn read_all<S: TarSource>(reader: &mut TarReader<S>, entry: &TarEntry) -> String {
        let mut out = String::new();
        reader
            .entry_data(entry)
            .unwrap()
            .read_to_string(&mut out)
            .unwrap();
        out
    }

    fn sample() -> Vec<u8> {
        TarTestBuilder::new()
            .add_directory("dir/")
            .add_file("dir/a.txt", b"alpha")
            .add_file("dir/b.txt", b"bravo")
            .build()
    }

    #[test]
    fn test_enumerates_in_order() {
        let mut reader = open(sample());
        let names: Vec<String> = reader
            .entries()
            .map(|e| e.unwrap().name)
            .collect();
        assert_eq!(names, ["dir/", "dir/a.txt", "dir/b.txt"]);
    }

    #[test]
    fn test_entry_fields() {
        let bytes = TarTestBuilder::new()
            .add_directory("dir/")
            .add_file_with_mtime("dir/a.txt", b"alpha", 1_600_000_000)
            .build();
        let mut reader = open(bytes);

        let dir = reader.next_entry().unwrap().unwrap();
        assert!(dir.is_dir);
        assert_eq!(dir.index, 0);

        let file = reader.next_entry().unwrap().unwrap();
        assert!(!file.is_dir);
        assert_eq!(file.size, 5);
        assert_eq!(file.index, 1);
        assert_eq!(
            file.mtime,
            SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000)
        );
        assert!(reader.next_entry().unwrap().is_none());
        assert!(reader.next_entry().unwrap().is_none());
    }

    #[test]
    fn test_gzip_detected_and_read_forward_without_reopen() {
        let mut reader = open(gzip(&sample()));
        assert_eq!(reader.codec(), Some(CompressionCodec::Gzip));

        let _dir = reader.next_entry().unwrap().unwrap();
        let a = reader.next_entry().unwrap().unwrap();
        assert_eq!(read_all(&mut reader, &a), "alpha");

        let b = reader.next_entry().unwrap().unwrap();
        assert!(reader.data_available(&b));
        assert_eq!(read_all(&mut reader, &b), "bravo");
        assert_eq!(reader.reopen_count(), 0);
    }

    #[test]
    fn test_entry_ahead_of_cursor_skips_forward() {
        let mut listing = open(sample());
        let entries: Vec<TarEntry> = listing.entries().map(Result::unwrap).collect();

        let mut reader = open(sample());
        assert!(reader.data_available(&entries[2]));
        assert_eq!(read_all(&mut reader, &entries[2]), "bravo");
        assert_eq!(reader.reopen_count(), 0);
    }

    #[test]
    fn test_entry_behind_cursor_reopens() {
        let mut reader = open(gzip(&sample()));
        let entries: Vec<TarEntry> = reader.entries().map(Result::unwrap).collect();

        assert!(!reader.data_available(&entries[1]));
        assert_eq!(read_all(&mut reader, &entries[1]), "alpha");
        assert_eq!(reader.reopen_count(), 1);

        // Now positioned at `a` with its data consumed; `b` is ahead.
        assert!(reader.data_available(&entries[2]));
        assert_eq!(read_all(&mut reader, &entries[2]), "bravo");
        assert_eq!(reader.reopen_count(), 1);
    }

    #[test]
    fn test_rereading_consumed_entry_reopens() {
        let mut reader = open(sample());
        reader.next_entry().unwrap();
        let a = reader.next_entry().unwrap().unwrap();

        assert_eq!(read_all(&mut reader, &a), "alpha");
        assert!(!reader.data_available(&a));
        assert_eq!(read_all(&mut reader, &a), "alpha");
        assert_eq!(reader.reopen_count(), 1);
    }

    #[test]
    fn test_enumeration_continues_after_reopen() {
        let mut reader = open(sample());
        let dir = reader.next_entry().unwrap().unwrap();
        let a = reader.next_entry().unwrap().unwrap();
        assert_eq!(read_all(&mut reader, &a), "alpha");

        // Reading `dir` again rewinds the stream but not the enumeration.
        let mut data = Vec::new();
        reader.entry_data(&dir).unwrap().read_to_end(&mut data).unwrap();
        assert!(data.is_empty());

        let next = reader.next_entry().unwrap().unwrap();
        assert_eq!(next.name, "dir/b.txt");
        assert!(reader.next_entry().unwrap().is_none());
    }

    #[test]
    fn test_partial_read_then_next_entry() {
        let bytes = TarTestBuilder::new()
            .add_file("big.bin", &[7u8; 2000])
            .add_file("small.txt", b"s")
            .build();
        let mut reader = open(bytes);
        let big = reader.next_entry().unwrap().unwrap();

        let mut head = [0u8; 10];
        let mut data = reader.entry_data(&big).unwrap();
        data.read_exact(&mut head).unwrap();
        assert_eq!(data.remaining(), 1990);
        drop(data);

        let small = reader.next_entry().unwrap().unwrap();
        assert_eq!(read_all(&mut reader, &small), "s");
    }

    #[test]
    fn test_entry_data_reads_exactly_size() {
        let bytes = TarTestBuilder::new().add_file("a", b"12345").build();
        let mut reader = open(bytes);
        let a = reader.next_entry().unwrap().unwrap();
        let mut data = Vec::new();
        reader.entry_data(&a).unwrap().read_to_end(&mut data).unwrap();
        assert_eq!(data, b"12345");
    }

    #[test]
    fn test_long_gnu_name() {
        let long = format!("{}/file.txt", "d".repeat(150));
        let bytes = TarTestBuilder::new().add_file(&long, b"long").build();
        let mut reader = open(bytes);
        let entry = reader.next_entry().unwrap().unwrap();
        assert_eq!(entry.name, long);
        assert_eq!(entry.index, 0);
        assert_eq!(read_all(&mut reader, &entry), "long");
    }

    #[test]
    fn test_pax_path_override() {
        let bytes = TarTestBuilder::new()
            .add_pax_file("real/name.txt", "short", b"pax")
            .build();
        let mut reader = open(bytes);
        let entry = reader.next_entry().unwrap().unwrap();
        assert_eq!(entry.name, "real/name.txt");
        assert_eq!(read_all(&mut reader, &entry), "pax");
    }

    #[test]
    fn test_empty_archive_has_no_entries() {
        let bytes = TarTestBuilder::new().build();
        let mut reader = open(bytes);
        assert!(reader.next_entry().unwrap().is_none());
    }

    #[test]
    fn test_not_an_archive() {
        let result = TarReader::open(MemorySource::from(b"definitely not a tar".to_vec()));
        assert!(matches!(result, Err(ExtractionError::InvalidArchive(_))));

        let result = TarReader::open(MemorySource::from(vec![b'x'; 1024]));
        assert!(matches!(result, Err(ExtractionError::InvalidArchive(_))));
    }

    #[test]
    fn test_reader_handles_debug_format() {
        let mut reader = open(sample());
        assert!(format!("{:?}", reader.entries()).starts_with("Entries"));

        let entry = reader.find("dir/a.txt").unwrap().unwrap();
        let data = reader.entry_data(&entry).unwrap();
        let debug = format!("{data:?}");
        assert!(debug.starts_with("EntryReader"));
        assert!(debug.contains("remaining: 5"));
    }

    #[test]
    fn test_empty_source_rejected() {
        let result = TarReader::open(MemorySource::from(Vec::new()));
        assert!(matches!(result, Err(ExtractionError::InvalidArchive(_))));

        let result = TarReader::open(MemorySource::from(gzip(&[])));
        assert!(matches!(result, Err(ExtractionError::InvalidArchive(_))));
    }

    #[test]
    fn test_pax_size_overflow_is_format_error() {
        let record = b"29 size=18446744073709551615\n";
        let mut builder = tar::Builder::new(Vec::new());

        let mut pax = tar::Header::new_ustar();
        pax.set_path("PaxHeaders/a").unwrap();
        pax.set_size(record.len() as u64);
        pax.set_entry_type(tar::EntryType::XHeader);
        pax.set_cksum();
        builder.append(&pax, &record[..]).unwrap();

        let mut header = tar::Header::new_ustar();
        header.set_path("a").unwrap();
        header.set_size(1);
        header.set_entry_type(tar::EntryType::Regular);
        header.set_cksum();
        builder.append(&header, &b"x"[..]).unwrap();

        let result = TarReader::open(MemorySource::from(builder.into_inner().unwrap()));
        assert!(matches!(result, Err(ExtractionError::InvalidArchive(_))));
    }

    #[test]
    fn test_base256_size_overflow_is_format_error() {
        let mut header = tar::Header::new_gnu();
        header.set_path("huge.bin").unwrap();
        header.set_size(u64::MAX);
        header.set_entry_type(tar::EntryType::Regular);
        header.set_cksum();
        let mut bytes = header.as_bytes().to_vec();
        bytes.extend_from_slice(&[0u8; 1024]);

        let result = TarReader::open(MemorySource::from(bytes));
        assert!(matches!(result, Err(ExtractionError::InvalidArchive(_))));
    }

    #[test]
    fn test_gzip_of_non_tar() {
        let result = TarReader::open(MemorySource::from(gzip(&[b'x'; 1024])));
        assert!(matches!(result, Err(ExtractionError::InvalidArchive(_))));
    }

    #[test]
    fn test_truncated_entry_data() {
        let mut bytes = TarTestBuilder::new().add_file("a", &[1u8; 1000]).build();
        bytes.truncate(512 + 100);
        let mut reader = open(bytes);
        let a = reader.next_entry().unwrap().unwrap();
        let mut out = Vec::new();
        let err = reader.entry_data(&a).unwrap().read_to_end(&mut out).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_entry_from_another_archive() {
        let mut first = open(sample());
        let foreign = TarEntry {
            name: "elsewhere.txt".to_string(),
            is_dir: false,
            size: 1,
            mtime: SystemTime::UNIX_EPOCH,
            index: 7,
        };
        first.next_entry().unwrap();
        assert!(matches!(
            first.entry_data(&foreign),
            Err(ExtractionError::EntryNotFound { .. })
        ));
    }

    #[test]
    fn test_find() {
        let mut reader = open(sample());
        let b = reader.find("dir/b.txt").unwrap().unwrap();
        assert_eq!(b.index, 2);
        assert!(reader.find("missing").unwrap().is_none());
    }

    #[test]
    fn test_cancellation_at_entry_boundary() {
        let token = CancellationToken::new();
        let mut reader = open(sample()).with_cancellation(token.clone());
        reader.next_entry().unwrap();
        token.cancel();
        assert!(matches!(reader.next_entry(), Err(ExtractionError::Cancelled)));
    }

    #[test]
    fn test_open_from_path() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("bundle.tar.gz");
        std::fs::write(&path, gzip(&sample())).unwrap();

        let mut reader = TarReader::open_path(&path).unwrap();
        let names: Vec<String> = reader.entries().map(|e| e.unwrap().name).collect();
        assert_eq!(names.len(), 3);
        reader.close();
    }
}
