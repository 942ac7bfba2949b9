use std::path::{Path, PathBuf};

use crate::tickets::parser::{Columns, Row, SkipReason};
use crate::types::ticket::Ticket;

#[derive(Debug, Default)]
pub(crate) struct LoadSummary {
    pub(crate) tickets: Vec<Ticket>,
    /// 1-based line number and reason for every dropped data row
    pub(crate) skipped: Vec<(usize, SkipReason)>,
}

impl LoadSummary {
    pub(crate) fn loaded(&self) -> usize {
        self.tickets.len()
    }
}

/// Returns `path` if it exists, otherwise the first `.csv` file (by name)
/// next to it. Falls back to `path` itself when there is nothing to find.
pub(crate) fn discover(path: &Path) -> PathBuf {
    if path.exists() {
        return path.to_path_buf();
    }

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut candidates: Vec<PathBuf> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|candidate| {
                candidate.is_file()
                    && candidate
                        .extension()
                        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
            })
            .collect(),
        Err(_) => Vec::new(),
    };

    candidates.sort();

    match candidates.into_iter().next() {
        Some(found) => {
            tracing::info!("Found ticket file: {}", found.display());
            found
        }
        None => path.to_path_buf(),
    }
}

/// Loads tickets from `path`. A missing or unreadable file yields an empty
/// summary rather than an error.
pub(crate) fn load(path: &Path) -> LoadSummary {
    let contents = match std::fs::read(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(
                "Ticket file not found at {}. Starting with empty ticket list.",
                path.display()
            );
            return LoadSummary::default();
        }
        Err(e) => {
            tracing::error!("Error reading ticket file {}: {}", path.display(), e);
            return LoadSummary::default();
        }
    };

    let summary = parse(&contents);

    tracing::info!(
        loaded = summary.loaded(),
        skipped = summary.skipped.len(),
        "Loaded tickets from {}",
        path.display()
    );

    summary
}

pub(crate) fn parse(contents: &[u8]) -> LoadSummary {
    let mut lines = split_lines(contents).into_iter();

    let header = match lines.next().map(std::str::from_utf8) {
        Some(Ok(header)) => header.trim_start_matches('\u{feff}'),
        Some(Err(_)) => {
            tracing::error!("Ticket file header is not valid UTF-8");
            return LoadSummary::default();
        }
        None => return LoadSummary::default(),
    };

    let columns = Columns::from_header(header);

    tracing::debug!(
        ticket_id = ?columns.ticket_id,
        email = ?columns.email,
        kind = ?columns.kind,
        description = ?columns.description,
        status = ?columns.status,
        resolution = ?columns.resolution,
        "Ticket file columns"
    );

    let mut summary = LoadSummary::default();

    for (index, line) in lines.enumerate() {
        let line_number = index + 2;

        let row = match std::str::from_utf8(line) {
            Ok(line) => columns.parse_row(line),
            Err(_) => Row::Skipped(SkipReason::InvalidEncoding),
        };

        match row {
            Row::Ticket(ticket) => summary.tickets.push(ticket),
            Row::Skipped(reason) => {
                tracing::debug!("Skipping line {}: {}", line_number, reason);
                summary.skipped.push((line_number, reason));
            }
        }
    }

    if summary.tickets.is_empty() && summary.skipped.is_empty() {
        tracing::info!("Ticket file is empty or contains only headers.");
    }

    summary
}

/// Splits on `\r\n`, `\n` or a lone `\r`. A trailing terminator leaves a
/// final empty line.
fn split_lines(contents: &[u8]) -> Vec<&[u8]> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < contents.len() {
        match contents[i] {
            b'\n' => {
                lines.push(&contents[start..i]);
                start = i + 1;
            }
            b'\r' => {
                lines.push(&contents[start..i]);
                if contents.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }

    lines.push(&contents[start..]);
    lines
}
