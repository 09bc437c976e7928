//! Directory entries and their text rendering.

use chrono::{DateTime, SecondsFormat, Utc};
use std::str::FromStr;
use std::time::SystemTime;
use suppaftp::list::File;

/// Kind of a directory entry as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    /// Symlinks and anything the listing parser cannot classify.
    Other,
}

impl EntryKind {
    fn tag(self) -> &'static str {
        match self {
            EntryKind::File => "[FILE]",
            EntryKind::Directory => "[DIR]",
            EntryKind::Other => "[OTHER]",
        }
    }
}

/// One entry of a remote directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: EntryKind,
    pub size: u64,
    /// ISO-8601 timestamp, or empty when the server did not provide one.
    pub modified: String,
}

impl DirEntry {
    /// Parse a single raw `LIST` line (POSIX or DOS format).
    ///
    /// Returns `None` for lines that do not describe an entry, such as the
    /// `total 12` header some servers emit.
    pub fn parse(line: &str) -> Option<Self> {
        let file = File::from_str(line).ok()?;
        let kind = if file.is_directory() {
            EntryKind::Directory
        } else if file.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        };
        Some(Self {
            name: file.name().to_string(),
            kind,
            size: file.size() as u64,
            modified: iso_timestamp(file.modified()),
        })
    }
}

/// Render a timestamp like JavaScript's `toISOString`. The epoch itself
/// means the server sent no usable date.
pub fn iso_timestamp(time: SystemTime) -> String {
    if time == SystemTime::UNIX_EPOCH {
        return String::new();
    }
    DateTime::<Utc>::from(time).to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Format a byte count with binary units.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes < KB {
        format!("{bytes} B")
    } else if bytes < MB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else if bytes < GB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    }
}

/// Entry counts per kind.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub files: usize,
    pub directories: usize,
    pub other: usize,
}

impl Summary {
    pub fn of(entries: &[DirEntry]) -> Self {
        entries.iter().fold(Self::default(), |mut acc, entry| {
            match entry.kind {
                EntryKind::File => acc.files += 1,
                EntryKind::Directory => acc.directories += 1,
                EntryKind::Other => acc.other += 1,
            }
            acc
        })
    }

    pub fn total(&self) -> usize {
        self.files + self.directories + self.other
    }
}

/// Render a listing for the `list-directory` tool.
pub fn format_listing(path: &str, entries: &[DirEntry]) -> String {
    let lines = if entries.is_empty() {
        "(empty)".to_string()
    } else {
        entries
            .iter()
            .map(format_entry)
            .collect::<Vec<_>>()
            .join("\n")
    };

    let summary = Summary::of(entries);
    let mut totals = format!(
        "Total: {} items ({} directories, {} files",
        summary.total(),
        summary.directories,
        summary.files
    );
    if summary.other > 0 {
        totals.push_str(&format!(", {} other", summary.other));
    }
    totals.push(')');

    format!("Directory listing for: {path}\n\n{lines}\n\n{totals}")
}

fn format_entry(entry: &DirEntry) -> String {
    match entry.kind {
        EntryKind::File => format!(
            "{} {} ({}) - {}",
            entry.kind.tag(),
            entry.name,
            format_size(entry.size),
            entry.modified
        ),
        _ => format!("{} {} - {}", entry.kind.tag(), entry.name, entry.modified),
    }
}
