//! Tar header blocks and extended header records.

use tar::EntryType;
use tar::Header;

use crate::ExtractionError;
use crate::Result;

/// Size of a tar block.
pub const BLOCK_SIZE: u64 = 512;

/// Largest GNU long name or PAX record block accepted.
pub const MAX_EXTENSION_SIZE: u64 = 1024 * 1024;

/// The fields of one header block that the reader uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawHeader {
    pub name: Vec<u8>,
    pub entry_type: EntryType,
    pub size: u64,
    pub mtime: u64,
}

/// Parses one 512-byte block. Returns `None` for an all-zero block, which
/// marks the end of the archive.
pub fn parse(block: &[u8; BLOCK_SIZE as usize]) -> Result<Option<RawHeader>> {
    if block.iter().all(|b| *b == 0) {
        return Ok(None);
    }

    let header = Header::from_byte_slice(block);
    verify_checksum(block, header)?;

    let size = header
        .entry_size()
        .map_err(|e| invalid(format!("bad size field: {e}")))?;
    let mtime = header
        .mtime()
        .map_err(|e| invalid(format!("bad mtime field: {e}")))?;

    Ok(Some(RawHeader {
        name: header.path_bytes().into_owned(),
        entry_type: header.entry_type(),
        size,
        mtime,
    }))
}

fn verify_checksum(block: &[u8], header: &Header) -> Result<()> {
    let expected = header
        .cksum()
        .map_err(|e| invalid(format!("bad checksum field: {e}")))?;

    // The checksum field itself is summed as eight spaces.
    let field = 148..156;
    let unsigned: u32 = block
        .iter()
        .enumerate()
        .map(|(i, b)| if field.contains(&i) { u32::from(b' ') } else { u32::from(*b) })
        .sum();
    // Some historic writers summed signed bytes.
    #[allow(clippy::cast_possible_wrap)]
    let signed: i64 = block
        .iter()
        .enumerate()
        .map(|(i, b)| if field.contains(&i) { i64::from(b' ') } else { i64::from(*b as i8) })
        .sum();

    if expected == unsigned || i64::from(expected) == signed {
        Ok(())
    } else {
        Err(invalid(format!(
            "header checksum mismatch: stored {expected}, computed {unsigned}"
        )))
    }
}

/// Number of padding bytes after `size` bytes of entry data.
pub const fn padding(size: u64) -> u64 {
    let rem = size % BLOCK_SIZE;
    if rem == 0 { 0 } else { BLOCK_SIZE - rem }
}

/// Bytes occupied by `size` bytes of entry data plus their padding.
pub fn data_span(size: u64) -> Result<u64> {
    size.checked_add(padding(size))
        .ok_or_else(|| invalid(format!("entry size overflows: {size}")))
}

/// Overrides collected from a PAX `x` header for the following entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaxOverrides {
    pub path: Option<Vec<u8>>,
    pub size: Option<u64>,
    pub mtime: Option<u64>,
}

impl PaxOverrides {
    /// Parses `<len> <key>=<value>\n` records. Unknown keys are ignored.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut overrides = Self::default();
        let mut rest = data;

        while !rest.is_empty() {
            if rest.iter().all(|b| *b == 0) {
                break;
            }
            let space = rest
                .iter()
                .position(|b| *b == b' ')
                .ok_or_else(|| invalid("malformed PAX record: missing length".into()))?;
            let len: usize = std::str::from_utf8(&rest[..space])
                .ok()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| invalid("malformed PAX record: bad length".into()))?;
            if len <= space + 1 || len > rest.len() || rest[len - 1] != b'\n' {
                return Err(invalid("malformed PAX record: bad length".into()));
            }

            let record = &rest[space + 1..len - 1];
            if let Some(eq) = record.iter().position(|b| *b == b'=') {
                let (key, value) = (&record[..eq], &record[eq + 1..]);
                match key {
                    b"path" => overrides.path = Some(value.to_vec()),
                    b"size" => {
                        let size = parse_decimal(value, "size")?;
                        data_span(size)?;
                        overrides.size = Some(size);
                    }
                    b"mtime" => {
                        // Fractional seconds are dropped.
                        let whole = value.split(|b| *b == b'.').next().unwrap_or(value);
                        overrides.mtime = Some(parse_decimal(whole, "mtime")?);
                    }
                    _ => {}
                }
            }
            rest = &rest[len..];
        }

        Ok(overrides)
    }
}

fn parse_decimal(value: &[u8], key: &str) -> Result<u64> {
    std::str::from_utf8(value)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| invalid(format!("malformed PAX {key} value")))
}

/// Strips the NUL terminator GNU long names carry.
pub fn trim_nul(mut bytes: Vec<u8>) -> Vec<u8> {
    while bytes.last() == Some(&0) {
        bytes.pop();
    }
    bytes
}

pub fn invalid(message: String) -> ExtractionError {
    ExtractionError::InvalidArchive(message)
}
