use anyhow::Context;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use vocabrs_core::{Error, ExportRecord, ExportSink, Result};

const DELIMITER: u8 = b';';

/// Writes `word;definition` rows for flashcard import.
#[derive(Debug, Clone)]
pub struct CsvExportWriter {
    destination: PathBuf,
}

impl CsvExportWriter {
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
        }
    }
}

impl ExportSink for CsvExportWriter {
    fn write(&self, records: &[ExportRecord]) -> Result<PathBuf> {
        write_csv(&self.destination, records).map_err(|e| Error::ExportFailed {
            path: self.destination.clone(),
            reason: format!("{e:#}"),
        })?;
        Ok(self.destination.clone())
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// Rows go to a temporary sibling first so a failed write leaves no partial
/// file behind.
fn write_csv(path: &Path, records: &[ExportRecord]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("cannot create {}", parent.display()))?;
    }

    let tmp = temp_sibling(path);
    let written = write_rows(&tmp, records).and_then(|()| {
        std::fs::rename(&tmp, path).with_context(|| format!("cannot move into {}", path.display()))
    });
    if written.is_err() {
        let _ = std::fs::remove_file(&tmp);
    }
    written
}

fn write_rows(path: &Path, records: &[ExportRecord]) -> anyhow::Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .from_path(path)?;
    for record in records {
        writer.write_record([record.word.as_str(), record.definition.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(word: &str, definition: &str) -> ExportRecord {
        ExportRecord {
            word: word.to_string(),
            definition: definition.to_string(),
        }
    }

    fn read_rows(path: &Path) -> Vec<Vec<String>> {
        csv::ReaderBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(false)
            .from_path(path)
            .unwrap()
            .records()
            .map(|r| r.unwrap().iter().map(ToString::to_string).collect())
            .collect()
    }

    #[test]
    fn writes_one_row_per_record_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.csv");
        let writer = CsvExportWriter::new(&path);

        let written = writer
            .write(&[
                record("zephyr", "A soft gentle breeze."),
                record("apple", ""),
            ])
            .unwrap();

        assert_eq!(written, path);
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content.lines().collect::<Vec<_>>(),
            vec!["zephyr;A soft gentle breeze.", "apple;"]
        );
        assert!(!temp_sibling(&path).exists());
    }

    #[test]
    fn delimiters_and_quotes_survive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.csv");

        CsvExportWriter::new(&path)
            .write(&[record("semi", "one; two \"three\"")])
            .unwrap();

        assert_eq!(
            read_rows(&path),
            vec![vec!["semi".to_string(), "one; two \"three\"".to_string()]]
        );
    }

    #[test]
    fn creates_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/anki/words.csv");

        CsvExportWriter::new(&path)
            .write(&[record("zephyr", "")])
            .unwrap();

        assert!(path.is_file());
    }

    #[test]
    fn existing_file_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.csv");
        std::fs::write(&path, "old;row\nstale;row\n").unwrap();

        CsvExportWriter::new(&path)
            .write(&[record("fresh", "new")])
            .unwrap();

        assert_eq!(read_rows(&path), vec![vec!["fresh", "new"]]);
    }

    #[test]
    fn unwritable_destination_is_export_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "").unwrap();

        let result = CsvExportWriter::new(blocker.join("words.csv")).write(&[record("a", "")]);

        assert!(matches!(result, Err(Error::ExportFailed { .. })));
    }
}
