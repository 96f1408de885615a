use crate::error::{Result, TableError};
use crate::row::{FieldValue, Fields, RowPatch};
use crate::store::RecordStore;
use crate::view::parse_number;
use log::{debug, info, warn};

#[derive(Clone, Debug, PartialEq, Default)]
pub enum EditState {
    #[default]
    Idle,
    Editing { row_id: String, draft: Fields },
}

/// Tracks the single row being edited and its uncommitted draft.
///
/// Starting an edit while another is open discards the earlier draft.
#[derive(Clone, Debug, Default)]
pub struct EditSession {
    state: EditState,
    numeric_fields: Vec<String>,
}

impl EditSession {
    pub fn new(numeric_fields: Vec<String>) -> Self {
        EditSession {
            state: EditState::Idle,
            numeric_fields,
        }
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, EditState::Editing { .. })
    }

    pub fn editing_id(&self) -> Option<&str> {
        match &self.state {
            EditState::Editing { row_id, .. } => Some(row_id.as_str()),
            EditState::Idle => None,
        }
    }

    pub fn draft(&self) -> Option<&Fields> {
        match &self.state {
            EditState::Editing { draft, .. } => Some(draft),
            EditState::Idle => None,
        }
    }

    /// Opens `row_id` for editing. An unknown id leaves the session as it was.
    pub fn begin_edit(&mut self, store: &RecordStore, row_id: &str) -> bool {
        let Some(row) = store.get(row_id) else {
            return false;
        };
        if let Some(prev) = self.editing_id() {
            debug!("discarding draft of row {}", prev);
        }
        self.state = EditState::Editing {
            row_id: row_id.to_string(),
            draft: row.fields().clone(),
        };
        true
    }

    pub fn update_draft_field(&mut self, key: &str, value: impl Into<FieldValue>) -> Result<()> {
        match &mut self.state {
            EditState::Editing { draft, .. } => {
                draft.insert(key.to_string(), value.into());
                Ok(())
            }
            EditState::Idle => Err(TableError::NoActiveEdit),
        }
    }

    /// Validates the draft and merges it into the store. On a validation
    /// error the draft stays open and the store is untouched.
    pub fn commit(&mut self, store: &mut RecordStore) -> Result<()> {
        let EditState::Editing { row_id, draft } = &self.state else {
            return Err(TableError::NoActiveEdit);
        };
        if let Err(err) = self.validate(draft) {
            warn!("commit of row {} rejected: {}", row_id, err);
            return Err(err);
        }
        let patch = RowPatch {
            id: row_id.clone(),
            fields: draft.clone(),
        };
        store.update_by_id(&patch);
        info!("committed edit of row {}", row_id);
        self.state = EditState::Idle;
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<()> {
        if !self.is_editing() {
            return Err(TableError::NoActiveEdit);
        }
        self.state = EditState::Idle;
        Ok(())
    }

    /// Drops any open draft without complaint.
    pub fn clear(&mut self) {
        self.state = EditState::Idle;
    }

    fn validate(&self, draft: &Fields) -> Result<()> {
        for field in &self.numeric_fields {
            let Some(FieldValue::Text(raw)) = draft.get(field) else {
                continue;
            };
            if raw.trim().is_empty() {
                continue;
            }
            if parse_number(raw).is_none() {
                return Err(TableError::Validation {
                    field: field.clone(),
                    value: raw.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::Row;

    fn store() -> RecordStore {
        let mut store = RecordStore::default();
        let mut a = Row::new("1");
        a.set("name", "A");
        a.set("age", 30.0);
        let mut b = Row::new("2");
        b.set("name", "B");
        b.set("age", "41");
        store.add_many(vec![a, b]);
        store
    }

    fn session() -> EditSession {
        EditSession::new(vec!["age".to_string()])
    }

    #[test]
    fn begin_then_commit_changes_nothing() {
        let mut store = store();
        let before = store.clone();
        let mut edit = session();

        assert!(edit.begin_edit(&store, "2"));
        edit.commit(&mut store).unwrap();

        assert_eq!(store, before);
        assert_eq!(edit.state(), &EditState::Idle);
    }

    #[test]
    fn begin_on_missing_row_stays_idle() {
        let store = store();
        let mut edit = session();
        assert!(!edit.begin_edit(&store, "404"));
        assert!(!edit.is_editing());
    }

    #[test]
    fn draft_changes_reach_store_only_on_commit() {
        let mut store = store();
        let mut edit = session();
        edit.begin_edit(&store, "1");
        edit.update_draft_field("name", "Alice").unwrap();
        edit.update_draft_field("age", "31").unwrap();

        assert_eq!(store.get("1").unwrap().get("name"), Some(&FieldValue::text("A")));

        edit.commit(&mut store).unwrap();
        let row = store.get("1").unwrap();
        assert_eq!(row.get("name"), Some(&FieldValue::text("Alice")));
        assert_eq!(row.get("age"), Some(&FieldValue::text("31")));
    }

    #[test]
    fn invalid_number_keeps_draft_open() {
        let mut store = store();
        let before = store.clone();
        let mut edit = session();
        edit.begin_edit(&store, "1");
        edit.update_draft_field("age", "abc").unwrap();

        let err = edit.commit(&mut store).unwrap_err();
        assert!(matches!(err, TableError::Validation { ref field, .. } if field == "age"));
        assert_eq!(store, before);
        assert_eq!(edit.editing_id(), Some("1"));
        assert_eq!(edit.draft().unwrap().get("age"), Some(&FieldValue::text("abc")));
    }

    #[test]
    fn blank_number_is_allowed() {
        let mut store = store();
        let mut edit = session();
        edit.begin_edit(&store, "1");
        edit.update_draft_field("age", "  ").unwrap();
        assert!(edit.commit(&mut store).is_ok());
    }

    #[test]
    fn cancel_discards_draft() {
        let mut store = store();
        let before = store.clone();
        let mut edit = session();
        edit.begin_edit(&store, "1");
        edit.update_draft_field("name", "changed").unwrap();
        edit.cancel().unwrap();

        assert_eq!(store, before);
        assert!(matches!(edit.commit(&mut store), Err(TableError::NoActiveEdit)));
    }

    #[test]
    fn idle_operations_report_no_active_edit() {
        let mut edit = session();
        assert!(matches!(edit.cancel(), Err(TableError::NoActiveEdit)));
        assert!(matches!(
            edit.update_draft_field("name", "x"),
            Err(TableError::NoActiveEdit)
        ));
    }

    #[test]
    fn second_begin_replaces_first_draft() {
        let mut store = store();
        let mut edit = session();
        edit.begin_edit(&store, "1");
        edit.update_draft_field("name", "lost").unwrap();
        edit.begin_edit(&store, "2");
        edit.commit(&mut store).unwrap();

        assert_eq!(store.get("1").unwrap().get("name"), Some(&FieldValue::text("A")));
    }

    #[test]
    fn missing_row_keeps_current_edit() {
        let store = store();
        let mut edit = session();
        edit.begin_edit(&store, "1");
        edit.begin_edit(&store, "404");
        assert_eq!(edit.editing_id(), Some("1"));
    }
}
