use crate::row::{Column, Row, RowPatch};
use log::debug;
use serde::{Deserialize, Serialize};

/// The authoritative rows and columns of one table.
///
/// All mutation goes through the methods below; each one leaves the store in
/// its final state before returning, so readers never see a half-applied
/// change. Operations addressing a missing id or key do nothing.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct RecordStore {
    rows: Vec<Row>,
    columns: Vec<Column>,
}

impl Default for RecordStore {
    fn default() -> Self {
        RecordStore::new(Column::defaults())
    }
}

impl RecordStore {
    pub fn new(columns: Vec<Column>) -> Self {
        RecordStore {
            rows: Vec::new(),
            columns,
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Row> {
        self.rows.iter().find(|r| r.id() == id)
    }

    pub fn contains_column(&self, key: &str) -> bool {
        self.columns.iter().any(|c| c.key == key)
    }

    /// Callers are responsible for id uniqueness.
    pub fn replace_all(&mut self, rows: Vec<Row>) {
        debug!("replacing {} rows with {}", self.rows.len(), rows.len());
        self.rows = rows;
    }

    pub fn add_many(&mut self, rows: Vec<Row>) {
        debug!("appending {} rows", rows.len());
        self.rows.extend(rows);
    }

    pub fn delete_by_id(&mut self, id: &str) {
        let before = self.rows.len();
        self.rows.retain(|r| r.id() != id);
        if self.rows.len() != before {
            debug!("deleted row {}", id);
        }
    }

    pub fn update_by_id(&mut self, patch: &RowPatch) {
        if let Some(row) = self.rows.iter_mut().find(|r| r.id() == patch.id) {
            row.merge(patch);
            debug!("updated row {} ({} fields)", patch.id, patch.fields.len());
        }
    }

    pub fn set_columns(&mut self, columns: Vec<Column>) {
        self.columns = columns;
    }

    pub fn toggle_column_visibility(&mut self, key: &str) {
        if let Some(col) = self.columns.iter_mut().find(|c| c.key == key) {
            col.visible = !col.visible;
            debug!("column {} visible={}", key, col.visible);
        }
    }

    /// Appends a visible column. Blank input and duplicate keys are ignored.
    /// Returns whether the column was added.
    pub fn add_column(&mut self, key: &str, label: &str) -> bool {
        let (key, label) = (key.trim(), label.trim());
        if key.is_empty() || label.is_empty() || self.contains_column(key) {
            return false;
        }
        let mut next = self.columns.clone();
        next.push(Column::new(key, label));
        self.set_columns(next);
        true
    }

    /// Moves the column at `from` so that it ends up at index `to`.
    pub fn move_column(&mut self, from: usize, to: usize) -> bool {
        if from >= self.columns.len() || to >= self.columns.len() {
            return false;
        }
        let mut next = self.columns.clone();
        let moved = next.remove(from);
        next.insert(to, moved);
        self.set_columns(next);
        true
    }
}
