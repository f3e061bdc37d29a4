//! Semicolon-delimited `key;value` ingestion.

use std::path::Path;

use thiserror::Error;

/// Errors returned by [`load_pairs`].
#[derive(Debug, Error)]
pub enum CsvError {
    /// The file could not be opened or read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that failed to open.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A data row could not be parsed as `key;value`.
    #[error("malformed row {row} in {path}: {source}")]
    Parse {
        /// Path being read.
        path: String,
        /// 1-based row number (counting the header as row 1).
        row: usize,
        /// Underlying parser error.
        #[source]
        source: csv::Error,
    },
}

/// Read a semicolon-delimited file of `key;value` rows, skipping the header
/// row, trimming whitespace from both fields, and dropping any row where
/// either field is empty after trimming.
///
/// A missing or unreadable file is surfaced as [`CsvError::Io`] rather than
/// panicking; a caller that would rather treat a missing file as "no rows"
/// can match on that variant and substitute an empty `Vec`.
pub fn load_pairs(path: impl AsRef<Path>) -> Result<Vec<(String, String)>, CsvError> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|source| CsvError::Io {
            path: path.display().to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, source),
        })?;

    let mut pairs = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|source| CsvError::Parse {
            path: path.display().to_string(),
            row: row + 2, // +1 for the header, +1 for 1-based counting
            source,
        })?;

        let key = record.get(0).unwrap_or("").trim();
        let value = record.get(1).unwrap_or("").trim();
        if key.is_empty() || value.is_empty() {
            continue;
        }
        pairs.push((key.to_string(), value.to_string()));
    }

    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_pairs_trims_and_skips_header() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "ProductCode;Category").unwrap();
        writeln!(file, "PROD000001; Electronics ").unwrap();
        writeln!(file, "PROD000002;Clothing").unwrap();
        file.flush().unwrap();

        let pairs = load_pairs(file.path()).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("PROD000001".to_string(), "Electronics".to_string()),
                ("PROD000002".to_string(), "Clothing".to_string()),
            ]
        );
    }

    #[test]
    fn test_load_pairs_drops_empty_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "ProductCode;Category").unwrap();
        writeln!(file, "PROD000001;Electronics").unwrap();
        writeln!(file, ";Clothing").unwrap();
        writeln!(file, "PROD000003;").unwrap();
        file.flush().unwrap();

        let pairs = load_pairs(file.path()).unwrap();
        assert_eq!(pairs, vec![("PROD000001".to_string(), "Electronics".to_string())]);
    }

    #[test]
    fn test_load_pairs_missing_file() {
        let err = load_pairs("/no/such/file.csv").unwrap_err();
        assert!(matches!(err, CsvError::Io { .. }));
    }
}
