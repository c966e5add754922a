//! Structured diagnostics: newline-delimited JSON events on the error stream.
//!
//! Every event carries a `level` plus whichever fields apply to it. The
//! stream is advisory and never part of the result contract, so writes are
//! best-effort: a failing diagnostic sink does not abort the run.

use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

/// Severity of a diagnostic event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Warning,
}

/// A single diagnostic event. Optional fields are omitted from the JSON
/// output when unset.
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub level: Level,
    pub info: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(rename = "numRecords", skip_serializing_if = "Option::is_none")]
    pub num_records: Option<u64>,
    #[serde(rename = "numHits", skip_serializing_if = "Option::is_none")]
    pub num_hits: Option<u64>,
    #[serde(rename = "elapsedSecs", skip_serializing_if = "Option::is_none")]
    pub elapsed_secs: Option<f64>,
    #[serde(rename = "sizeMiB", skip_serializing_if = "Option::is_none")]
    pub size_mib: Option<f64>,
}

impl Event {
    fn new(level: Level, info: impl Into<String>) -> Self {
        Self {
            level,
            info: info.into(),
            file: None,
            source: None,
            num_records: None,
            num_hits: None,
            elapsed_secs: None,
            size_mib: None,
        }
    }

    pub fn info(info: impl Into<String>) -> Self {
        Self::new(Level::Info, info)
    }

    pub fn warning(info: impl Into<String>) -> Self {
        Self::new(Level::Warning, info)
    }

    pub fn with_file(mut self, file: &Path) -> Self {
        self.file = Some(file.display().to_string());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_num_records(mut self, num_records: u64) -> Self {
        self.num_records = Some(num_records);
        self
    }

    pub fn with_num_hits(mut self, num_hits: u64) -> Self {
        self.num_hits = Some(num_hits);
        self
    }

    pub fn with_elapsed_secs(mut self, elapsed_secs: f64) -> Self {
        self.elapsed_secs = Some(elapsed_secs);
        self
    }

    pub fn with_size_mib(mut self, size_mib: f64) -> Self {
        self.size_mib = Some(size_mib);
        self
    }
}

/// Sink for diagnostic events, one JSON object per line.
pub struct Diag<W: Write> {
    out: W,
}

impl Diag<io::Stderr> {
    /// The production sink: standard error.
    pub fn stderr() -> Self {
        Self { out: io::stderr() }
    }
}

impl<W: Write> Diag<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Emit one event. Serialization and write failures are swallowed.
    pub fn emit(&mut self, event: &Event) {
        if let Ok(line) = serde_json::to_string(event) {
            let _ = writeln!(self.out, "{line}");
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn emit_to_string(event: &Event) -> String {
        let mut diag = Diag::new(Vec::new());
        diag.emit(event);
        String::from_utf8(diag.into_inner()).unwrap()
    }

    #[test]
    fn test_info_event_minimal_fields() {
        let line = emit_to_string(&Event::info("Built index."));
        let value: serde_json::Value = serde_json::from_str(line.trim()).unwrap();

        assert_eq!(value["level"], "info");
        assert_eq!(value["info"], "Built index.");
        assert!(value.get("file").is_none());
        assert!(value.get("numHits").is_none());
    }

    #[test]
    fn test_warning_event_with_file() {
        let event =
            Event::warning("File does not exist. Skipping.").with_file(&PathBuf::from("q.txt"));
        let line = emit_to_string(&event);
        let value: serde_json::Value = serde_json::from_str(line.trim()).unwrap();

        assert_eq!(value["level"], "warning");
        assert_eq!(value["file"], "q.txt");
    }

    #[test]
    fn test_field_spellings() {
        let event = Event::info("Built record index.")
            .with_num_records(3)
            .with_num_hits(7)
            .with_elapsed_secs(0.25)
            .with_size_mib(1.5);
        let line = emit_to_string(&event);
        let value: serde_json::Value = serde_json::from_str(line.trim()).unwrap();

        assert_eq!(value["numRecords"], 3);
        assert_eq!(value["numHits"], 7);
        assert_eq!(value["elapsedSecs"], 0.25);
        assert_eq!(value["sizeMiB"], 1.5);
    }

    #[test]
    fn test_one_event_per_line() {
        let mut diag = Diag::new(Vec::new());
        diag.emit(&Event::info("first"));
        diag.emit(&Event::info("second").with_source("stdin"));

        let text = String::from_utf8(diag.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            serde_json::from_str::<serde_json::Value>(line).unwrap();
        }
    }
}
