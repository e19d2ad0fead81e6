//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::error::convert_extraction_error;
use crate::error::with_restore_outcome;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Context;
use anyhow::Result;
use restorable_core::BackupConfig;
use restorable_core::BackupStore;
use restorable_core::ExtractionConfig;
use restorable_core::ExtractionRequest;
use std::env;
use std::fs;
use tracing::info;

pub fn execute(args: &ExtractArgs, formatter: &dyn OutputFormatter, quiet: bool) -> Result<()> {
    let output_dir = match &args.output_dir {
        Some(dir) => dir.clone(),
        None => env::current_dir().context("failed to get current directory")?,
    };
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("failed to create '{}'", output_dir.display()))?;

    let config = ExtractionConfig::default()
        .with_prefix(args.prefix.clone())
        .with_include(args.include.clone())
        .with_exclude(args.exclude.clone());

    let mut store = (!args.no_backup)
        .then(|| BackupStore::new(BackupConfig::default().with_root(args.backup_dir.clone())));

    // Use progress bar if TTY is detected (not quiet, not JSON, is terminal)
    let mut progress = (!quiet && CliProgress::should_show()).then(|| CliProgress::new("Extracting"));

    let mut request = ExtractionRequest::from_path(&args.archive, &output_dir).config(config);
    if let Some(store) = store.as_mut() {
        request = request.backup(store);
    }
    if let Some(progress) = progress.as_mut() {
        request = request.progress(progress);
    }
    let result = request.extract();
    drop(progress);

    match result {
        Ok(report) => {
            if let Some(store) = store.as_mut() {
                let backups = store.len();
                if let Err(e) = store.discard() {
                    formatter.format_warning(&format!("some backups could not be removed: {e}"));
                } else {
                    info!(backups, "installation committed, backups discarded");
                }
            }
            formatter.format_extraction_result(&report)
        }
        Err(err) => {
            let err = convert_extraction_error(err, &args.archive);
            match store.as_mut() {
                Some(store) => Err(with_restore_outcome(err, &store.restore())),
                None => Err(err),
            }
        }
    }
}
