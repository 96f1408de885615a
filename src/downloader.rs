use crate::error::{Result, TableError};
use crate::row::{Column, Row};
use csv::{Terminator, WriterBuilder};
use log::info;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Write rows as delimited text
///
/// The header row holds the column labels; each data row holds the value of
/// every given column, looked up by key. Absent values are written empty.
/// Fields containing the delimiter, quotes or newlines are quoted.
///
/// # Arguments
/// * `writer` - Destination of the text
/// * `rows` - Rows in output order (normally the filtered, sorted view)
/// * `columns` - Columns in output order (normally the visible ones)
/// * `delimiter` - Field separator
pub fn write_csv<W: Write>(
    writer: W,
    rows: &[&Row],
    columns: &[&Column],
    delimiter: u8,
) -> Result<()> {
    if columns.is_empty() {
        return Ok(());
    }
    let mut out = WriterBuilder::new()
        .delimiter(delimiter)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    out.write_record(columns.iter().map(|c| c.label.as_str()))
        .map_err(export_error)?;
    for row in rows {
        let record: Vec<String> = columns
            .iter()
            .map(|c| row.get(&c.key).map(|v| v.to_string()).unwrap_or_default())
            .collect();
        out.write_record(&record).map_err(export_error)?;
    }
    out.flush()?;
    Ok(())
}

/// Convert rows to a CSV string
///
/// # Examples
/// ```
/// use datatable::downloader::to_csv;
/// use datatable::row::{Column, Row};
///
/// let mut row = Row::new("1");
/// row.set("name", "Ada");
/// let name = Column::new("name", "Name");
/// let csv = to_csv(&[&row], &[&name], b',').unwrap();
/// assert_eq!(csv, "Name\nAda\n");
/// ```
pub fn to_csv(rows: &[&Row], columns: &[&Column], delimiter: u8) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, rows, columns, delimiter)?;
    String::from_utf8(buffer).map_err(|e| TableError::Export(e.to_string()))
}

/// Write rows to a CSV file, replacing it if it exists.
pub fn save_csv(
    path: impl AsRef<Path>,
    rows: &[&Row],
    columns: &[&Column],
    delimiter: u8,
) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_csv(file, rows, columns, delimiter)?;
    info!("exported {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Convert rows to XLSX format
///
/// Same projection as [`to_csv`]: a header row of labels, then one sheet row
/// per data row. Numbers are written as numeric cells, everything else as
/// text.
#[cfg(feature = "xlsx")]
pub fn to_xlsx(rows: &[&Row], columns: &[&Column]) -> Result<Vec<u8>> {
    use crate::row::FieldValue;
    use rust_xlsxwriter::Workbook;

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (c, column) in columns.iter().enumerate() {
        worksheet
            .write_string(0, c as u16, column.label.as_str())
            .map_err(xlsx_error)?;
    }
    for (r, row) in rows.iter().enumerate() {
        let sheet_row = (r + 1) as u32;
        for (c, column) in columns.iter().enumerate() {
            match row.get(&column.key) {
                Some(FieldValue::Number(n)) => {
                    worksheet
                        .write_number(sheet_row, c as u16, *n)
                        .map_err(xlsx_error)?;
                }
                Some(FieldValue::Text(s)) if !s.is_empty() => {
                    worksheet
                        .write_string(sheet_row, c as u16, s.as_str())
                        .map_err(xlsx_error)?;
                }
                _ => {}
            }
        }
    }

    workbook.save_to_buffer().map_err(xlsx_error)
}

#[cfg(feature = "xlsx")]
fn xlsx_error(err: rust_xlsxwriter::XlsxError) -> TableError {
    TableError::Export(err.to_string())
}

fn export_error(err: csv::Error) -> TableError {
    TableError::Export(err.to_string())
}
