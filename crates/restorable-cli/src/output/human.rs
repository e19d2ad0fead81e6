//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use chrono::DateTime;
use chrono::Local;
use console::Term;
use console::style;
use restorable_core::ArchiveManifest;
use restorable_core::ExtractionReport;
use std::time::SystemTime;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();
        let mut count = 0;

        for c in s.chars().rev() {
            if count == 3 {
                result.push(',');
                count = 0;
            }
            result.push(c);
            count += 1;
        }

        result.chars().rev().collect()
    }

    fn format_mtime(time: Option<SystemTime>) -> String {
        time.map_or_else(
            || "-".to_string(),
            |t| DateTime::<Local>::from(t).format("%Y-%m-%d %H:%M").to_string(),
        )
    }

    fn heading(&self, text: &str) -> String {
        if self.use_colors {
            style(text).yellow().bold().to_string()
        } else {
            text.to_string()
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_extraction_result(&self, report: &ExtractionReport) -> Result<()> {
        if !report.has_warnings() && self.quiet {
            return Ok(());
        }

        if !self.quiet {
            if self.use_colors {
                let _ = self.term.write_line(&format!(
                    "{} Extraction complete",
                    style("✓").green().bold()
                ));
            } else {
                let _ = self.term.write_line("Extraction complete");
            }

            let _ = self.term.write_line(&format!(
                "  Files extracted: {}",
                Self::format_number(report.files_extracted)
            ));
            let _ = self
                .term
                .write_line(&format!("  Directories: {}", report.directories_created));
            let _ = self.term.write_line(&format!(
                "  Total size: {}",
                Self::format_size(report.bytes_written)
            ));
            if report.entries_skipped > 0 {
                let _ = self
                    .term
                    .write_line(&format!("  Entries skipped: {}", report.entries_skipped));
            }

            if self.verbose {
                let _ = self
                    .term
                    .write_line(&format!("  Duration: {:?}", report.duration));
                for path in &report.touched {
                    let _ = self.term.write_line(&format!("    {}", path.display()));
                }
            }
        }

        // Busy destinations are reported even in quiet mode.
        if report.has_warnings() {
            let err = Term::stderr();
            let _ = err.write_line(&self.heading("Warnings:"));
            for warning in &report.warnings {
                let _ = err.write_line(&format!(
                    "  - {}: {}",
                    warning.path.display(),
                    warning.message
                ));
            }
        }

        Ok(())
    }

    fn format_manifest_short(&self, manifest: &ArchiveManifest) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        for entry in &manifest.entries {
            let _ = self.term.write_line(&entry.name);
        }

        Ok(())
    }

    fn format_manifest_long(&self, manifest: &ArchiveManifest, human_readable: bool) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        for entry in &manifest.entries {
            let size_str = if human_readable {
                Self::format_size(entry.size)
            } else {
                entry.size.to_string()
            };
            let type_char = if entry.is_dir { "d" } else { "-" };

            let _ = self.term.write_line(&format!(
                "{} {:>10}  {:>10}  {}",
                type_char,
                size_str,
                Self::format_mtime(entry.modified),
                entry.name
            ));
        }

        let _ = self.term.write_line("");
        let _ = self.term.write_line(&format!(
            "Total: {} entries, {} ({})",
            Self::format_number(manifest.total_entries),
            Self::format_size(manifest.total_size),
            manifest.format.name()
        ));

        Ok(())
    }

    fn format_error(&self, error: &anyhow::Error) {
        // Always show errors, even in quiet mode
        let err = Term::stderr();
        if self.use_colors {
            let _ = err.write_line(&format!("{} {error:#}", style("ERROR:").red().bold()));
        } else {
            let _ = err.write_line(&format!("ERROR: {error:#}"));
        }
    }

    fn format_warning(&self, message: &str) {
        let err = Term::stderr();
        if self.use_colors {
            let _ = err.write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = err.write_line(&format!("WARNING: {message}"));
        }
    }
}
