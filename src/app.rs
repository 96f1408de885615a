use crate::config::TableConfig;
use crate::downloader;
use crate::error::Result;
use crate::loader::{self, ImportedRecord};
use crate::row::{Column, FieldValue, Fields, Row, RowIdGenerator};
use crate::session::EditSession;
use crate::store::RecordStore;
use crate::view::{self, ViewPage, ViewState};
use log::{info, warn};
use std::io::Read;
use std::path::{Path, PathBuf};

pub const SAVE_ALL_NOTICE: &str =
    "All changes saved (edits are committed row by row; nothing else to save)";
pub const CANCEL_ALL_NOTICE: &str =
    "View reset: search, sort, page and any open edit were discarded";

/// One table and everything the user can do to it.
///
/// Owns the record store, the view state, the edit session and the id
/// generator; callers drive it through the methods below instead of touching
/// the store directly.
#[derive(Debug)]
pub struct DataTable {
    store: RecordStore,
    view: ViewState,
    session: EditSession,
    ids: RowIdGenerator,
    config: TableConfig,
}

impl Default for DataTable {
    fn default() -> Self {
        DataTable::new(TableConfig::default())
    }
}

impl DataTable {
    pub fn new(config: TableConfig) -> Self {
        DataTable {
            store: RecordStore::new(config.columns.clone()),
            view: ViewState::new(config.page_size),
            session: EditSession::new(config.numeric_fields.clone()),
            ids: RowIdGenerator::new(),
            config,
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn visible_columns(&self) -> Vec<&Column> {
        view::visible_columns(self.store.columns())
    }

    /// The current page of the filtered, sorted view.
    pub fn page(&self) -> ViewPage<'_> {
        view::derive_view(self.store.rows(), self.store.columns(), &self.view)
    }

    /// Every row of the filtered, sorted view, unpaginated.
    pub fn arranged_rows(&self) -> Vec<&Row> {
        view::arrange(
            self.store.rows(),
            self.store.columns(),
            self.view.query(),
            self.view.sort(),
        )
    }

    pub fn total_count(&self) -> usize {
        self.arranged_rows().len()
    }

    pub fn page_count(&self) -> usize {
        view::page_count(self.total_count(), self.view.page_size())
    }

    /// Parses `source` and appends its records with fresh ids. On a parse
    /// error nothing is added. Returns the number of rows added.
    pub fn import_csv<R: Read>(&mut self, source: R) -> Result<usize> {
        let records = loader::from_csv_reader(source, self.config.delimiter_byte())
            .inspect_err(|err| warn!("import rejected: {}", err))?;
        Ok(self.add_records(records))
    }

    pub fn import_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let records = loader::from_csv_file(path, self.config.delimiter_byte())
            .inspect_err(|err| warn!("import of {} rejected: {}", path.display(), err))?;
        Ok(self.add_records(records))
    }

    fn add_records(&mut self, records: Vec<ImportedRecord>) -> usize {
        if records.is_empty() {
            warn!("import produced no rows");
            return 0;
        }
        let ids = self.ids.next_batch(records.len());
        let rows: Vec<Row> = ids
            .into_iter()
            .zip(records)
            .map(|(id, record)| {
                let fields: Fields = record
                    .into_iter()
                    .map(|(k, v)| (k, FieldValue::Text(v)))
                    .collect();
                Row::with_fields(id, fields)
            })
            .collect();
        let added = rows.len();
        self.store.add_many(rows);
        info!("imported {} rows", added);
        added
    }

    pub fn export_csv(&self) -> Result<String> {
        downloader::to_csv(
            &self.arranged_rows(),
            &self.visible_columns(),
            self.config.delimiter_byte(),
        )
    }

    /// Writes the current view to `path`, or to the configured export file
    /// name when none is given. Returns the path written.
    pub fn export_file(&self, path: Option<&Path>) -> Result<PathBuf> {
        let target = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(&self.config.export_file_name));
        downloader::save_csv(
            &target,
            &self.arranged_rows(),
            &self.visible_columns(),
            self.config.delimiter_byte(),
        )?;
        Ok(target)
    }

    #[cfg(feature = "xlsx")]
    pub fn export_xlsx(&self) -> Result<Vec<u8>> {
        downloader::to_xlsx(&self.arranged_rows(), &self.visible_columns())
    }

    pub fn search(&mut self, query: &str) {
        self.view.set_query(query);
    }

    pub fn sort_by(&mut self, key: &str) {
        self.view.select_sort(key);
    }

    pub fn go_to_page(&mut self, page: usize) -> bool {
        let total = self.total_count();
        self.view.go_to_page(page, total)
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.view.page() + 1)
    }

    pub fn prev_page(&mut self) -> bool {
        match self.view.page().checked_sub(1) {
            Some(page) => self.go_to_page(page),
            None => false,
        }
    }

    pub fn begin_edit(&mut self, row_id: &str) -> bool {
        self.session.begin_edit(&self.store, row_id)
    }

    pub fn set_draft_field(&mut self, key: &str, value: &str) -> Result<()> {
        self.session.update_draft_field(key, value)
    }

    pub fn save_edit(&mut self) -> Result<()> {
        self.session.commit(&mut self.store)
    }

    pub fn cancel_edit(&mut self) -> Result<()> {
        self.session.cancel()
    }

    /// Removes a row; an open draft of that row is discarded with it.
    pub fn delete_row(&mut self, row_id: &str) {
        if self.session.editing_id() == Some(row_id) {
            self.session.clear();
        }
        self.store.delete_by_id(row_id);
        self.clamp_page();
    }

    pub fn toggle_column(&mut self, key: &str) {
        self.store.toggle_column_visibility(key);
        self.clamp_page();
    }

    pub fn add_column(&mut self, key: &str, label: &str) -> bool {
        self.store.add_column(key, label)
    }

    pub fn move_column(&mut self, from: usize, to: usize) -> bool {
        self.store.move_column(from, to)
    }

    /// Edits are committed one row at a time, so there is nothing left to
    /// save here.
    pub fn save_all(&self) -> &'static str {
        SAVE_ALL_NOTICE
    }

    /// Full reset of the ephemeral state. Store contents survive.
    pub fn cancel_all(&mut self) -> &'static str {
        self.view.reset();
        self.session.clear();
        CANCEL_ALL_NOTICE
    }

    fn clamp_page(&mut self) {
        let total = self.total_count();
        self.view.clamp_page(total);
    }
}
