use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;

use crate::io::lock;
use crate::model::task::Task;

/// Size past which the oldest entries are trimmed before an append (1 MB).
const MAX_LOG_SIZE: u64 = 1_048_576;

/// Header written at the top of a new recovery log.
const FILE_HEADER: &str = "\
<!-- tick recovery log: append-only copies of data tick could not
     read or save. If a task went missing, check here.
     View with: tick recovery
     Safe to delete. -->

---
";

/// Category of a recovery entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryCategory {
    /// A stored blob could not be decoded
    Parser,
    /// A blob could not be written
    Write,
    /// A task was deleted
    Delete,
}

impl fmt::Display for RecoveryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryCategory::Parser => write!(f, "parser"),
            RecoveryCategory::Write => write!(f, "write"),
            RecoveryCategory::Delete => write!(f, "delete"),
        }
    }
}

impl RecoveryCategory {
    pub fn parse_category(s: &str) -> Option<Self> {
        match s {
            "parser" => Some(RecoveryCategory::Parser),
            "write" => Some(RecoveryCategory::Write),
            "delete" => Some(RecoveryCategory::Delete),
            _ => None,
        }
    }
}

/// A single entry in the recovery log.
#[derive(Debug, Clone, PartialEq)]
pub struct RecoveryEntry {
    pub timestamp: DateTime<Utc>,
    pub category: RecoveryCategory,
    pub description: String,
    pub fields: Vec<(String, String)>,
    pub body: String,
}

/// Path to the recovery log inside the data directory.
pub fn recovery_log_path(data_dir: &Path) -> PathBuf {
    data_dir.join(".recovery.log")
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

impl RecoveryEntry {
    /// Markdown block for the log:
    ///
    /// ```text
    /// ## 2025-05-14T09:30:00Z [parser] unreadable todos
    ///
    /// Key: value
    ///
    /// (fenced body)
    /// ---
    /// ```
    pub fn to_markdown(&self) -> String {
        let mut out = format!(
            "## {} [{}] {}\n\n",
            self.timestamp
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            self.category,
            self.description,
        );
        for (key, value) in &self.fields {
            out.push_str(&format!("{}: {}\n", key, value));
        }
        if !self.body.is_empty() {
            out.push_str("\n```text\n");
            out.push_str(&self.body);
            if !self.body.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("```\n");
        }
        out.push_str("\n---\n");
        out
    }

    pub fn to_json(&self) -> serde_json::Value {
        let fields: serde_json::Map<String, serde_json::Value> = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect();

        serde_json::json!({
            "timestamp": self.timestamp.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            "category": self.category.to_string(),
            "description": self.description,
            "fields": fields,
            "body": self.body,
        })
    }
}

/// Append an entry to the log. Failures are printed to stderr and otherwise ignored.
pub fn log_recovery(data_dir: &Path, entry: RecoveryEntry) {
    if let Err(e) = append_entry(data_dir, &entry, MAX_LOG_SIZE) {
        eprintln!("warning: could not write to recovery log: {}", e);
    }
}

/// Like `log_recovery`, but skipped when the newest entry of the same
/// category already holds the same body (the same damaged file seen on
/// every load).
pub fn log_recovery_once(data_dir: &Path, entry: RecoveryEntry) {
    let repeated = read_recovery_entries(data_dir, None)
        .into_iter()
        .find(|e| e.category == entry.category)
        .is_some_and(|e| e.body.trim_end() == entry.body.trim_end());
    if !repeated {
        log_recovery(data_dir, entry);
    }
}

fn append_entry(data_dir: &Path, entry: &RecoveryEntry, max_size: u64) -> io::Result<()> {
    let path = recovery_log_path(data_dir);

    if let Ok(meta) = std::fs::metadata(&path)
        && meta.len() > max_size
    {
        trim_log(&path, max_size / 2);
    }

    let needs_header = std::fs::metadata(&path).map_or(true, |m| m.len() == 0);

    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    if needs_header {
        file.write_all(FILE_HEADER.as_bytes())?;
    }
    file.write_all(entry.to_markdown().as_bytes())
}

/// Drop the oldest entries until the log fits in `target` bytes.
/// Skipped when another process holds the log.
fn trim_log(path: &Path, target: u64) {
    let Ok(mut file) = OpenOptions::new().read(true).write(true).open(path) else {
        return;
    };
    if lock::try_lock(&file).is_err() {
        return;
    }

    let mut content = String::new();
    if file.read_to_string(&mut content).is_err() {
        return;
    }
    let trimmed = keep_newest_entries(&content, target as usize);
    if trimmed.len() < content.len() {
        let _ = rewrite_in_place(&mut file, &trimmed);
    }
    // flock released on close
}

fn rewrite_in_place(file: &mut File, content: &str) -> io::Result<()> {
    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    file.write_all(content.as_bytes())
}

/// The file header plus the newest whole entries that fit in `target` bytes
fn keep_newest_entries(content: &str, target: usize) -> String {
    let mut header = String::new();
    let mut entries: Vec<String> = Vec::new();
    let mut in_header = true;

    for line in content.lines() {
        if in_header {
            header.push_str(line);
            header.push('\n');
            if line == "---" {
                in_header = false;
            }
            continue;
        }
        let starts_entry = line
            .strip_prefix("## ")
            .and_then(parse_entry_header)
            .is_some();
        match entries.last_mut() {
            Some(current) if !starts_entry => {
                current.push_str(line);
                current.push('\n');
            }
            _ => entries.push(format!("{}\n", line)),
        }
    }

    let mut budget = target.saturating_sub(header.len());
    let mut kept = 0;
    for entry in entries.iter().rev() {
        if entry.len() > budget {
            break;
        }
        budget -= entry.len();
        kept += 1;
    }

    let mut out = header;
    for entry in &entries[entries.len() - kept..] {
        out.push_str(entry);
    }
    out
}

/// Keep a copy of a deleted task so it can be restored by hand.
pub fn log_task_deletion(data_dir: &Path, task: &Task) {
    log_recovery(
        data_dir,
        RecoveryEntry {
            timestamp: Utc::now(),
            category: RecoveryCategory::Delete,
            description: format!("task {} deleted", task.id),
            fields: vec![("Task".to_string(), task.id.clone())],
            body: serde_json::to_string(task).unwrap_or_else(|_| task.text.clone()),
        },
    );
}

/// Read entries, most recent first, optionally keeping only the newest `limit`.
pub fn read_recovery_entries(data_dir: &Path, limit: Option<usize>) -> Vec<RecoveryEntry> {
    let content = match std::fs::read_to_string(recovery_log_path(data_dir)) {
        Ok(c) => c,
        Err(_) => return Vec::new(),
    };

    let mut entries = parse_entries(&content);
    entries.reverse();
    if let Some(n) = limit {
        entries.truncate(n);
    }
    entries
}

/// Remove every entry, returning how many were dropped.
pub fn clear_recovery(data_dir: &Path) -> io::Result<usize> {
    let path = recovery_log_path(data_dir);
    let content = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e),
    };
    let count = parse_entries(&content).len();
    atomic_write(&path, FILE_HEADER.as_bytes())?;
    Ok(count)
}

fn parse_entries(content: &str) -> Vec<RecoveryEntry> {
    let mut entries = Vec::new();
    let mut lines = content.lines();

    while let Some(line) = lines.next() {
        let Some((timestamp, category, description)) =
            line.strip_prefix("## ").and_then(parse_entry_header)
        else {
            continue;
        };

        let mut fields = Vec::new();
        let mut body_lines: Vec<&str> = Vec::new();
        let mut in_code_block = false;

        for line in lines.by_ref() {
            if in_code_block {
                if line == "```" {
                    in_code_block = false;
                } else {
                    body_lines.push(line);
                }
                continue;
            }
            if line == "---" {
                break;
            }
            if line.starts_with("```") {
                in_code_block = true;
                continue;
            }
            if let Some((key, value)) = line.trim().split_once(": ") {
                fields.push((key.to_string(), value.to_string()));
            }
        }

        entries.push(RecoveryEntry {
            timestamp,
            category,
            description,
            fields,
            body: body_lines.join("\n"),
        });
    }

    entries
}

/// Parse `<timestamp> [<category>] <description>`
fn parse_entry_header(header: &str) -> Option<(DateTime<Utc>, RecoveryCategory, String)> {
    let (timestamp_str, rest) = header.split_once(' ')?;
    let timestamp = DateTime::parse_from_rfc3339(timestamp_str)
        .ok()?
        .with_timezone(&Utc);
    let rest = rest.strip_prefix('[')?;
    let (category_str, description) = rest.split_once("] ")?;
    let category = RecoveryCategory::parse_category(category_str)?;
    Some((timestamp, category, description.to_string()))
}
