//! Loader for two-line-per-record sequence files.
//!
//! ```text
//! >read_1
//! ACGTACGT
//! >read_2
//! TTGACCA
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::records::ReadSet;

/// Read every record from `path`.
pub fn read_records<P: AsRef<Path>>(path: P) -> Result<ReadSet> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    parse_records(BufReader::new(file))
        .with_context(|| format!("failed to parse records from {}", path.display()))
}

/// Parse `>id` / sequence line pairs. Blank lines between records are skipped;
/// a repeated id replaces the earlier sequence.
pub fn parse_records<R: BufRead>(reader: R) -> Result<ReadSet> {
    let mut records = ReadSet::new();
    let mut lines = reader.lines().enumerate();

    while let Some((line_no, line)) = lines.next() {
        let line = line?;
        let header = line.trim();
        if header.is_empty() {
            continue;
        }
        let Some(id) = header.strip_prefix('>') else {
            bail!("line {}: expected a '>' header, found '{}'", line_no + 1, header);
        };
        let id = id.trim();
        if id.is_empty() {
            bail!("line {}: header has an empty identifier", line_no + 1);
        }

        let sequence = match lines.next() {
            Some((_, line)) => line?.trim().to_string(),
            None => bail!("line {}: header '{}' has no sequence line", line_no + 1, id),
        };
        if sequence.starts_with('>') {
            bail!(
                "line {}: header '{}' is followed by another header",
                line_no + 2,
                id
            );
        }
        records.insert(id, sequence.into_bytes());
    }

    Ok(records)
}
