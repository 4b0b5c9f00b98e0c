//! Diagnostic trace logging for debugging status output.
//!
//! When enabled via the `TICKLINE_TRACE_LOG` environment variable, this module
//! appends one JSONL record per published snapshot and per written line.
//! Escape sequences are stripped from lines unless `TICKLINE_TRACE_RAW` is set.

use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{LineWriter, Write};
use std::sync::{Mutex, OnceLock};

use super::snapshot::Snapshot;

static LOG_WRITER: OnceLock<Option<Mutex<LineWriter<File>>>> = OnceLock::new();
static KEEP_ANSI: OnceLock<bool> = OnceLock::new();

fn get_log_writer() -> Option<&'static Mutex<LineWriter<File>>> {
    LOG_WRITER
        .get_or_init(|| {
            std::env::var("TICKLINE_TRACE_LOG").ok().and_then(|path| {
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .ok()
                    .map(|file| Mutex::new(LineWriter::new(file)))
            })
        })
        .as_ref()
}

fn keep_ansi() -> bool {
    *KEEP_ANSI.get_or_init(|| std::env::var("TICKLINE_TRACE_RAW").is_ok())
}

/// One record of the trace log.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceEvent {
    /// A worker published a new snapshot.
    Publish {
        count: u64,
        total: u64,
        snapshot: Snapshot,
    },
    /// A status line was written to the terminal.
    Line { rendered: String },
}

fn write_event(event: &TraceEvent) {
    let Some(log_writer) = get_log_writer() else {
        return;
    };
    if let Ok(json) = serde_json::to_string(event) {
        if let Ok(mut writer) = log_writer.lock() {
            let _ = writeln!(writer, "{}", json);
        }
    }
}

/// Log a publish to the trace log file.
pub(crate) fn log_publish(count: u64, total: u64, snapshot: &Snapshot) {
    if get_log_writer().is_none() {
        return;
    }
    write_event(&TraceEvent::Publish {
        count,
        total,
        snapshot: *snapshot,
    });
}

/// Log a written line to the trace log file.
pub(crate) fn log_line(line: &str) {
    if get_log_writer().is_none() {
        return;
    }
    let rendered = if keep_ansi() {
        line.to_string()
    } else {
        console::strip_ansi_codes(line).to_string()
    };
    write_event(&TraceEvent::Line { rendered });
}
