//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use restorable_core::ArchiveManifest;
use restorable_core::ExtractionReport;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

#[derive(Serialize)]
struct WarningOutput {
    path: String,
    message: String,
}

#[derive(Serialize)]
struct ExtractionOutput {
    files_extracted: usize,
    directories_created: usize,
    entries_skipped: usize,
    bytes_written: u64,
    duration_ms: u128,
    touched: Vec<String>,
    warnings: Vec<WarningOutput>,
}

#[derive(Serialize)]
struct EntryOutput {
    name: String,
    is_dir: bool,
    size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    modified: Option<u64>,
}

#[derive(Serialize)]
struct ManifestOutput {
    format: &'static str,
    total_entries: usize,
    total_size: u64,
    entries: Vec<EntryOutput>,
}

fn unix_seconds(time: SystemTime) -> Option<u64> {
    time.duration_since(UNIX_EPOCH).ok().map(|d| d.as_secs())
}

fn manifest_output(manifest: &ArchiveManifest, with_details: bool) -> ManifestOutput {
    ManifestOutput {
        format: manifest.format.name(),
        total_entries: manifest.total_entries,
        total_size: manifest.total_size,
        entries: manifest
            .entries
            .iter()
            .map(|e| EntryOutput {
                name: e.name.clone(),
                is_dir: e.is_dir,
                size: e.size,
                modified: if with_details {
                    e.modified.and_then(unix_seconds)
                } else {
                    None
                },
            })
            .collect(),
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_extraction_result(&self, report: &ExtractionReport) -> Result<()> {
        let data = ExtractionOutput {
            files_extracted: report.files_extracted,
            directories_created: report.directories_created,
            entries_skipped: report.entries_skipped,
            bytes_written: report.bytes_written,
            duration_ms: report.duration.as_millis(),
            touched: report
                .touched
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            warnings: report
                .warnings
                .iter()
                .map(|w| WarningOutput {
                    path: w.path.display().to_string(),
                    message: w.message.clone(),
                })
                .collect(),
        };

        let output = JsonOutput::success("extract", data);
        Self::output(&output)
    }

    fn format_manifest_short(&self, manifest: &ArchiveManifest) -> Result<()> {
        Self::output(&JsonOutput::success("list", manifest_output(manifest, false)))
    }

    fn format_manifest_long(&self, manifest: &ArchiveManifest, _human_readable: bool) -> Result<()> {
        Self::output(&JsonOutput::success("list", manifest_output(manifest, true)))
    }

    fn format_error(&self, error: &anyhow::Error) {
        let output = JsonOutput::error("error", format!("{error:#}"));
        let _ = Self::output(&output);
    }

    fn format_warning(&self, message: &str) {
        #[derive(Serialize)]
        struct WarningData {
            message: String,
        }

        let output = JsonOutput::success(
            "warning",
            WarningData {
                message: message.to_string(),
            },
        );
        let _ = Self::output(&output);
    }
}
