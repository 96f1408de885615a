/*!
# Data Table

A spreadsheet-like data table manager: import rows from a CSV file, view them
as a paginated, sortable, filterable grid, edit records one at a time, choose
which columns are shown and in what order, and export the current view.

## Overview

Everything lives in memory for a single user. There is no persistence between
sessions, no collaboration and no server. The library is driven by the
interactive terminal front end in `main.rs`, but every operation is available
to other front ends through [`DataTable`].

## Architecture

### Record Store
- Authoritative ordered rows and ordered column definitions
- Bulk replace/append, delete and merge-update by row id
- Column add, reorder and visibility toggle

### View Pipeline
- Column projection onto visible columns
- Case-insensitive substring filter over visible columns
- Stable sort, numeric when both values are numbers, text otherwise
- Pagination with clipped slices and a total count

### Edit Session
- At most one row under edit, holding a draft copy of its fields
- Commit validates numeric fields, then merges into the store
- Cancel drops the draft

### Import / Export
- CSV import with a header row; malformed files add nothing
- CSV export of visible columns for the filtered, sorted rows
- Optional XLSX export (`xlsx` feature)

## Modules

- **row**: Column, Row and FieldValue types, row id generation
- **store**: RecordStore and its mutation operations
- **view**: filter, sort and paginate derivation, sort cycling, page state
- **session**: edit session state machine and draft validation
- **loader**: CSV import
- **downloader**: CSV and XLSX export
- **app**: DataTable, the object user actions go through
- **command**: parsing of front-end commands
- **config**: table settings loaded from JSON
- **error**: TableError
*/

pub mod app;
pub mod command;
pub mod config;
pub mod downloader;
pub mod error;
pub mod loader;
pub mod row;
pub mod session;
pub mod store;
pub mod view;

pub use app::DataTable;
pub use command::Command;
pub use config::TableConfig;
pub use error::{Result, TableError};
pub use row::{Column, FieldValue, Row, RowPatch};
pub use session::{EditSession, EditState};
pub use store::RecordStore;
pub use view::{SortOrder, SortSpec, ViewPage, ViewState};
