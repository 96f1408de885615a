use crate::error::{Result, TableError};
use crate::row::Column;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Settings for one table. Every field is optional in the JSON form.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TableConfig {
    /// Rows per page.
    pub page_size: usize,
    /// Field separator for import and export.
    pub delimiter: char,
    /// Fields a draft must hold numbers in before it can be committed.
    pub numeric_fields: Vec<String>,
    pub export_file_name: String,
    /// Initial column list.
    pub columns: Vec<Column>,
}

impl Default for TableConfig {
    fn default() -> Self {
        TableConfig {
            page_size: 10,
            delimiter: ',',
            numeric_fields: vec!["age".to_string()],
            export_file_name: "export.csv".to_string(),
            columns: Column::defaults(),
        }
    }
}

impl TableConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: TableConfig =
            serde_json::from_str(text).map_err(|e| TableError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| TableError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(TableError::Config("page_size must be positive".into()));
        }
        if !self.delimiter.is_ascii() || matches!(self.delimiter, '"' | '\n' | '\r') {
            return Err(TableError::Config(format!(
                "unusable delimiter {:?}",
                self.delimiter
            )));
        }
        for (i, col) in self.columns.iter().enumerate() {
            if self.columns[..i].iter().any(|c| c.key == col.key) {
                return Err(TableError::Config(format!("duplicate column key {}", col.key)));
            }
        }
        Ok(())
    }

    /// The delimiter as the byte the CSV codec expects.
    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_object_gives_defaults() {
        assert_eq!(TableConfig::from_json_str("{}").unwrap(), TableConfig::default());
    }

    #[test]
    fn partial_override() {
        let config = TableConfig::from_json_str(
            r#"{"page_size": 25, "delimiter": ";", "numeric_fields": ["age", "salary"]}"#,
        )
        .unwrap();
        assert_eq!(config.page_size, 25);
        assert_eq!(config.delimiter_byte(), b';');
        assert_eq!(config.numeric_fields, vec!["age", "salary"]);
        assert_eq!(config.export_file_name, "export.csv");
    }

    #[test]
    fn custom_columns() {
        let config = TableConfig::from_json_str(
            r#"{"columns": [{"key": "sku", "label": "SKU", "visible": true},
                            {"key": "qty", "label": "Qty", "visible": false}]}"#,
        )
        .unwrap();
        assert_eq!(config.columns.len(), 2);
        assert!(!config.columns[1].visible);
    }

    #[test]
    fn rejects_bad_values() {
        for text in [
            r#"{"page_size": 0}"#,
            r#"{"delimiter": "\""}"#,
            r#"{"delimiter": "é"}"#,
            r#"{"unknown": 1}"#,
            r#"{"columns": [{"key": "a", "label": "A", "visible": true},
                            {"key": "a", "label": "B", "visible": true}]}"#,
            "not json",
        ] {
            assert!(
                matches!(TableConfig::from_json_str(text), Err(TableError::Config(_))),
                "accepted {}",
                text
            );
        }
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"page_size": 3}}"#).unwrap();
        let config = TableConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.page_size, 3);
    }

    #[test]
    fn missing_file_is_a_config_error() {
        assert!(matches!(
            TableConfig::from_json_file("/nonexistent/datatable.json"),
            Err(TableError::Config(_))
        ));
    }
}
