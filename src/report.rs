//! Durable cycle report persistence.
//!
//! Each cycle's report is written to the shared output directory and read
//! back before the next cycle starts, so the handoff only ever carries text
//! that provably reached disk. A failed write or reporter call degrades to a
//! sentinel report instead of killing the run.

use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::error::{CadreError, Result};

pub const FINAL_REPORT_FILENAME: &str = "final_business_report.md";

/// An intermediate report produced at the end of one cycle
#[derive(Debug, Clone)]
pub struct CycleReport {
    /// 1-based cycle number
    pub cycle: u32,
    pub markdown: String,
    /// Image artifacts created during the cycle, relative to the output dir
    pub figures: Vec<PathBuf>,
}

impl CycleReport {
    /// Sentinel report used when the reporter call or the write fails.
    /// The next cycle still gets a well-formed, honest handoff.
    pub fn sentinel(cycle: u32, reason: &str) -> Self {
        Self {
            cycle,
            markdown: format!("Error: report for cycle {} could not be generated ({}).", cycle, reason),
            figures: Vec::new(),
        }
    }
}

pub fn intermediate_report_filename(cycle: u32) -> String {
    format!("intermediate_report_cycle_{}.md", cycle)
}

/// Write a cycle report and verify it by reading it back.
///
/// Returns the persisted text, which is the bytes on disk rather than the
/// in-memory string, so the handoff reflects what the next cycle will see.
pub fn persist_cycle_report(output_dir: &Path, report: &CycleReport) -> Result<String> {
    let path = output_dir.join(intermediate_report_filename(report.cycle));

    std::fs::create_dir_all(output_dir)?;
    std::fs::write(&path, &report.markdown).map_err(|e| CadreError::Handoff {
        cycle: report.cycle,
        reason: format!("write {} failed: {}", path.display(), e),
    })?;

    let persisted = std::fs::read_to_string(&path).map_err(|e| CadreError::Handoff {
        cycle: report.cycle,
        reason: format!("read-back of {} failed: {}", path.display(), e),
    })?;

    info!("Persisted cycle {} report to {}", report.cycle, path.display());
    Ok(persisted)
}

/// Collect every intermediate report in the output directory, sorted by
/// cycle number, each wrapped in START/END markers for the synthesis prompt.
///
/// A plain directory listing filtered by filename, so the output path itself
/// never gets pattern-interpreted. A missing directory yields no reports.
pub fn collect_intermediate_reports(output_dir: &Path) -> Result<String> {
    let mut entries: Vec<(u32, PathBuf)> = Vec::new();
    if let Ok(dir) = std::fs::read_dir(output_dir) {
        for entry in dir {
            let path = entry?.path();
            if let Some(cycle) = cycle_number_from_path(&path) {
                entries.push((cycle, path));
            }
        }
    } else {
        warn!("Output directory {} is not readable", output_dir.display());
    }
    entries.sort_by_key(|(cycle, _)| *cycle);

    let mut combined = String::new();
    for (_, path) in &entries {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let body = std::fs::read_to_string(path)?;
        combined.push_str(&format!("--- START OF REPORT: {} ---\n", name));
        combined.push_str(&body);
        if !body.ends_with('\n') {
            combined.push('\n');
        }
        combined.push_str("--- END OF REPORT ---\n\n");
    }

    Ok(combined)
}

/// Write the synthesized final report.
pub fn write_final_report(output_dir: &Path, markdown: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(FINAL_REPORT_FILENAME);
    std::fs::write(&path, markdown)?;
    info!("Wrote final report to {}", path.display());
    Ok(path)
}

fn cycle_number_from_path(path: &Path) -> Option<u32> {
    if path.extension().and_then(|e| e.to_str()) != Some("md") {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    stem.strip_prefix("intermediate_report_cycle_")?.parse().ok()
}
