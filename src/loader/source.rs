use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Reads an annex export into typed rows.
///
/// Returns `Ok(None)` when the file is missing or holds no data; both are
/// reported and the caller skips the file. Cells are decoded lossily, so a
/// stray Latin-1 byte becomes U+FFFD instead of failing the file. Short rows
/// are padded with blank cells and a row that still cannot be read is
/// skipped with a warning.
pub fn read_annex<T: DeserializeOwned>(path: &Path) -> Result<Option<Vec<T>>> {
    if !path.exists() {
        warn!("File not found: {}. Skipping.", path.display());
        return Ok(None);
    }

    let contents =
        fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    if contents.iter().all(u8::is_ascii_whitespace) {
        warn!("File is empty: {}. Skipping.", path.display());
        return Ok(None);
    }

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(contents.as_slice());

    let headers = reader
        .byte_headers()
        .with_context(|| format!("Failed to read header row of {}", path.display()))?
        .iter()
        .map(|raw| clean_header(&String::from_utf8_lossy(raw)))
        .collect::<StringRecord>();
    debug!("{} columns: {:?}", path.display(), headers);

    let mut rows = Vec::new();
    for (index, result) in reader.byte_records().enumerate() {
        // Line 1 is the header.
        let line = index + 2;
        let raw = result
            .with_context(|| format!("Failed to read record {} of {}", line, path.display()))?;

        let mut record = raw
            .iter()
            .map(String::from_utf8_lossy)
            .collect::<StringRecord>();
        record.truncate(headers.len());
        while record.len() < headers.len() {
            record.push_field("");
        }

        match record.deserialize::<T>(Some(&headers)) {
            Ok(row) => rows.push(row),
            Err(e) => {
                warn!("Skipping record {} of {}: {}", line, path.display(), e);
            }
        }
    }

    if rows.is_empty() {
        warn!("File has no data rows: {}. Skipping.", path.display());
        return Ok(None);
    }

    Ok(Some(rows))
}

/// Header cells in the exports carry stray whitespace and embedded line
/// breaks (`Lower Vert.\nLimit (FL)`).
pub fn clean_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}')
        .trim()
        .replace("\r\n", " ")
        .replace('\n', " ")
}

/// Trimmed cell value, or `None` when blank.
pub fn cell(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
