//! Tab-separated rendering of query reports.

use std::io::Write;

use anyhow::{anyhow, Result};

use crate::{AssemblyStatus, Inconclusive, QueryReport};

const HEADER: &str = "#query\tpossibly_present\tstatus\tcontig\n";

/// Status column for one report.
pub fn status_label(report: &QueryReport) -> String {
    match &report.assembly {
        None => "absent".to_string(),
        Some(AssemblyStatus::Assembled(contig)) => format!(
            "assembled(left={},right={})",
            contig.left_extension, contig.right_extension
        ),
        Some(AssemblyStatus::Inconclusive(Inconclusive::SeedAbsent)) => {
            "inconclusive(seed_absent)".to_string()
        }
        Some(AssemblyStatus::Inconclusive(Inconclusive::CycleDetected { direction, steps })) => {
            format!("inconclusive(cycle,{direction},{steps})")
        }
    }
}

/// Write one line per report after a header line.
pub fn write_reports<W: Write>(writer: &mut W, reports: &[QueryReport]) -> Result<()> {
    writer.write_all(HEADER.as_bytes())?;

    for report in reports {
        let contig = report
            .contig()
            .map(ToString::to_string)
            .unwrap_or_else(|| ".".to_string());
        let line = format!(
            "{id}\t{present}\t{status}\t{contig}\n",
            id = report.id,
            present = report.possibly_present,
            status = status_label(report),
        );
        writer.write_all(line.as_bytes())?;
    }

    writer.flush()?;
    Ok(())
}

/// Render reports into a string (useful for tests and fingerprints).
pub fn render_reports(reports: &[QueryReport]) -> Result<String> {
    let mut buffer = Vec::new();
    write_reports(&mut buffer, reports)?;
    String::from_utf8(buffer).map_err(|_| anyhow!("rendered report is not valid UTF-8"))
}
