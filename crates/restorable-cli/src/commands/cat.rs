//! Cat command implementation.

use crate::cli::CatArgs;
use crate::error::add_archive_context;
use crate::error::convert_extraction_error;
use anyhow::Context;
use anyhow::Result;
use restorable_core::ExtractionError;
use restorable_core::TarReader;
use std::io;
use std::io::Write;

/// Streams the data of `args.entry` to standard output.
pub fn execute(args: &CatArgs) -> Result<()> {
    let mut reader = add_archive_context(TarReader::open_path(&args.archive), &args.archive)?;

    let entry = add_archive_context(reader.find(&args.entry), &args.archive)?;
    let Some(entry) = entry else {
        return Err(convert_extraction_error(
            ExtractionError::EntryNotFound {
                name: args.entry.clone(),
            },
            &args.archive,
        ));
    };
    if entry.is_dir {
        anyhow::bail!("'{}' is a directory", entry.name);
    }

    let mut data = add_archive_context(reader.entry_data(&entry), &args.archive)?;
    let mut stdout = io::stdout().lock();
    io::copy(&mut data, &mut stdout).context("failed to write entry to stdout")?;
    stdout.flush()?;
    Ok(())
}
