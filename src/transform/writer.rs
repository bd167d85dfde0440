use crate::types::OutputRecord;
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes the record array as one JSON document
pub struct RecordWriter<W: Write> {
    writer: W,
    compact: bool,
}

impl<W: Write> RecordWriter<W> {
    /// Pretty writer with 4-space indentation
    pub fn new(writer: W) -> Self {
        RecordWriter {
            writer,
            compact: false,
        }
    }

    pub fn compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    /// Serialize the whole array. serde_json leaves non-ASCII text unescaped.
    pub fn write_records(&mut self, records: &[OutputRecord]) -> Result<()> {
        if self.compact {
            serde_json::to_writer(&mut self.writer, records)
                .context("Failed to serialize records")?;
        } else {
            let formatter = PrettyFormatter::with_indent(b"    ");
            let mut serializer = Serializer::with_formatter(&mut self.writer, formatter);
            records
                .serialize(&mut serializer)
                .context("Failed to serialize records")?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush writer")
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Replace `destination` with the serialized records. The document is first
/// written next to it and then renamed into place.
pub fn write_document<P: AsRef<Path>>(destination: P, records: &[OutputRecord], compact: bool) -> Result<()> {
    let destination = destination.as_ref();
    let staging = staging_path(destination);

    let outcome = write_staged(&staging, records, compact).and_then(|_| {
        fs::rename(&staging, destination)
            .with_context(|| format!("Failed to move output into place: {}", destination.display()))
    });

    if outcome.is_err() {
        let _ = fs::remove_file(&staging);
    }
    outcome
}

fn write_staged(staging: &Path, records: &[OutputRecord], compact: bool) -> Result<()> {
    let file = File::create(staging)
        .with_context(|| format!("Failed to create file: {}", staging.display()))?;

    let mut writer = RecordWriter::new(BufWriter::new(file)).compact(compact);
    writer.write_records(records)?;
    writer.flush()?;

    let file = writer
        .into_inner()
        .into_inner()
        .context("Failed to flush output buffer")?;
    file.sync_all().context("Failed to sync output file")?;
    Ok(())
}

fn staging_path(destination: &Path) -> PathBuf {
    let name = destination
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("output.json"));
    destination.with_file_name(format!(".{}.tmp", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ConductorInfo, Performances, ShowInfo, ShowStatus};

    fn record(id: i64, title: &str) -> OutputRecord {
        OutputRecord {
            id,
            show_info: ShowInfo {
                title: title.to_string(),
                production_type: "Revival".to_string(),
                status: ShowStatus::Closed,
                opening: None,
                performances: Performances(12.0),
            },
            conductor_info: ConductorInfo {
                name: "Paul Gemignani".to_string(),
                lifespan: String::new(),
                role: "Music Director".to_string(),
                photo: String::new(),
                website: String::new(),
                ibdb: String::new(),
                fact: String::new(),
            },
            decade: 0,
        }
    }

    #[test]
    fn test_pretty_output_uses_four_spaces() {
        let mut writer = RecordWriter::new(Vec::new());
        writer.write_records(&[record(1, "Follies")]).unwrap();

        let output = String::from_utf8(writer.into_inner()).unwrap();
        assert!(output.starts_with("[\n    {\n        \"id\": 1,\n        \"show_info\": {\n            \"title\""));
        assert!(!output.ends_with('\n'));
    }

    #[test]
    fn test_field_order() {
        let mut writer = RecordWriter::new(Vec::new()).compact(true);
        writer.write_records(&[record(1, "Follies")]).unwrap();

        let output = String::from_utf8(writer.into_inner()).unwrap();
        let positions: Vec<usize> = ["\"id\"", "\"show_info\"", "\"type\"", "\"status\"", "\"opening\"", "\"performances\"", "\"conductor_info\"", "\"fact\"", "\"decade\""]
            .iter()
            .map(|key| output.find(key).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_non_ascii_is_literal() {
        let mut writer = RecordWriter::new(Vec::new()).compact(true);
        writer.write_records(&[record(1, "Les Misérables")]).unwrap();

        let output = String::from_utf8(writer.into_inner()).unwrap();
        assert!(output.contains("Les Misérables"));
        assert!(!output.contains("\\u00e9"));
    }

    #[test]
    fn test_write_document_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cleaned_data.json");
        fs::write(&path, "stale content that is much longer than the new document").unwrap();

        write_document(&path, &[record(3, "Company")], false).unwrap();

        let parsed: Vec<OutputRecord> = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, vec![record(3, "Company")]);
        assert!(!staging_path(&path).exists());
    }

    #[test]
    fn test_write_document_reports_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.json");
        assert!(write_document(&path, &[], false).is_err());
    }
}
