use crate::error::{Result, TableError};
use csv::ReaderBuilder;
use log::debug;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One parsed data line, keyed by header name.
pub type ImportedRecord = BTreeMap<String, String>;

/// Parse delimited text with a header row into records.
///
/// Blank lines are skipped. A record whose field count differs from the
/// header, or any undecodable input, fails the whole import.
///
/// # Arguments
/// * `source` - Reader over the delimited text
/// * `delimiter` - Field separator, usually `b','`
///
/// # Examples
/// ```
/// use datatable::loader::from_csv_reader;
///
/// let text = "name,age\nAda,36\n\nGrace,45\n";
/// let records = from_csv_reader(text.as_bytes(), b',').unwrap();
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[1]["name"], "Grace");
/// ```
pub fn from_csv_reader<R: Read>(source: R, delimiter: u8) -> Result<Vec<ImportedRecord>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(false)
        .from_reader(source);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        let fields = headers
            .iter()
            .cloned()
            .zip(record.iter().map(str::to_string))
            .collect();
        records.push(fields);
    }

    debug!("parsed {} records with {} columns", records.len(), headers.len());
    Ok(records)
}

/// Load records from a delimited text file on disk.
///
/// # Examples
/// ```no_run
/// use datatable::loader::from_csv_file;
///
/// match from_csv_file("people.csv", b',') {
///     Ok(records) => println!("parsed {} records", records.len()),
///     Err(e) => eprintln!("Error loading CSV: {}", e),
/// }
/// ```
pub fn from_csv_file(path: impl AsRef<Path>, delimiter: u8) -> Result<Vec<ImportedRecord>> {
    let path = path.as_ref();
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") || ext.eq_ignore_ascii_case("txt") => {}
        Some(ext) => {
            return Err(TableError::ImportParse(format!(
                "unsupported file extension: {}",
                ext
            )));
        }
        None => {}
    }
    let file = File::open(path)?;
    from_csv_reader(file, delimiter)
}
