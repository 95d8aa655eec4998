use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::record::{PageRecords, HEADER};

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Can't create {}: {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Can't write to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Append-only destination for completed batches.
pub trait Sink {
    /// Persist every record of every page in `batch`, in order.
    fn append(&mut self, batch: &[PageRecords]) -> Result<(), SinkError>;
}

/// `<name>.csv` with a header row, reopened in append mode for each batch so
/// every completed batch is on disk before the next one starts.
#[derive(Debug)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    /// Create (or truncate) `<dir>/<name>.csv` and write the header row.
    pub fn create(dir: &Path, name: &str) -> Result<Self, SinkError> {
        let path = dir.join(format!("{}.csv", name));
        fs::create_dir_all(dir).map_err(|source| SinkError::Create {
            path: path.clone(),
            source,
        })?;

        let write_err = |source: csv::Error| SinkError::Write {
            path: path.clone(),
            source,
        };
        let mut wtr = csv::Writer::from_path(&path).map_err(write_err)?;
        wtr.write_record(HEADER).map_err(write_err)?;
        wtr.flush().map_err(|e| write_err(e.into()))?;

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for CsvSink {
    fn append(&mut self, batch: &[PageRecords]) -> Result<(), SinkError> {
        let write_err = |source: csv::Error| SinkError::Write {
            path: self.path.clone(),
            source,
        };
        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| write_err(e.into()))?;

        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        for page in batch {
            for record in page {
                wtr.serialize(record).map_err(write_err)?;
            }
        }
        wtr.flush().map_err(|e| write_err(e.into()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;

    fn scratch_dir(test: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "realtor_scraper-{}-{}",
            test,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn record(name: &str) -> Record {
        Record {
            name: name.into(),
            role: "Broker".into(),
            company: "Acme Realty".into(),
            address: "1 Main St".into(),
            number: "555-0100".into(),
        }
    }

    fn read_rows(path: &Path) -> Vec<Vec<String>> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(path)
            .unwrap();
        rdr.records()
            .map(|r| r.unwrap().iter().map(String::from).collect())
            .collect()
    }

    #[test]
    fn create_writes_header_only() {
        let dir = scratch_dir("header");
        let sink = CsvSink::create(&dir, "myfile").unwrap();
        assert_eq!(sink.path(), dir.join("myfile.csv"));

        let contents = fs::read_to_string(sink.path()).unwrap();
        assert_eq!(contents.trim_end(), "name,role,company,address,number");
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn create_truncates_previous_run() {
        let dir = scratch_dir("truncate");
        let mut sink = CsvSink::create(&dir, "out").unwrap();
        sink.append(&[vec![record("Old")]]).unwrap();

        let sink = CsvSink::create(&dir, "out").unwrap();
        assert_eq!(read_rows(sink.path()).len(), 1);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn append_keeps_page_and_record_order() {
        let dir = scratch_dir("order");
        let mut sink = CsvSink::create(&dir, "out").unwrap();
        sink.append(&[vec![record("A"), record("B")], vec![record("C")]])
            .unwrap();
        sink.append(&[vec![record("D")]]).unwrap();

        let rows = read_rows(sink.path());
        let names: Vec<_> = rows.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(names, ["name", "A", "B", "C", "D"]);
        assert!(rows.iter().all(|r| r.len() == 5));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn quotes_embedded_delimiters() {
        let dir = scratch_dir("quoting");
        let mut sink = CsvSink::create(&dir, "out").unwrap();
        let tricky = Record {
            address: "Hut 8, \"The Park\"".into(),
            ..record("Turing")
        };
        sink.append(&[vec![tricky.clone()]]).unwrap();

        let contents = fs::read_to_string(sink.path()).unwrap();
        assert!(contents.contains(r#""Hut 8, ""The Park""""#));
        assert_eq!(read_rows(sink.path())[1][3], tricky.address);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn create_into_a_file_path_fails() {
        let dir = scratch_dir("blocked");
        fs::create_dir_all(&dir).unwrap();
        let blocker = dir.join("not_a_dir");
        fs::write(&blocker, "x").unwrap();

        let err = CsvSink::create(&blocker, "out").unwrap_err();
        assert!(matches!(err, SinkError::Create { .. }));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn append_after_file_removed_fails() {
        let dir = scratch_dir("removed");
        let mut sink = CsvSink::create(&dir, "out").unwrap();
        fs::remove_file(sink.path()).unwrap();

        let err = sink.append(&[vec![record("A")]]).unwrap_err();
        assert!(matches!(err, SinkError::Write { .. }));
        fs::remove_dir_all(&dir).unwrap();
    }
}
