use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Fields every row carries even when no column references them.
pub const SEED_FIELDS: [&str; 4] = ["name", "email", "age", "role"];

/// A scalar cell value.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn text(s: impl Into<String>) -> Self {
        FieldValue::Text(s.into())
    }

    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Number(_) => false,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

pub type Fields = BTreeMap<String, FieldValue>;

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Column {
    pub key: String,
    pub label: String,
    pub visible: bool,
}

impl Column {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Column {
            key: key.into(),
            label: label.into(),
            visible: true,
        }
    }

    /// The column list a fresh table starts with.
    pub fn defaults() -> Vec<Column> {
        vec![
            Column::new("name", "Name"),
            Column::new("email", "Email"),
            Column::new("age", "Age"),
            Column::new("role", "Role"),
        ]
    }
}

/// One record. The id is fixed at construction; fields are only replaced
/// through the store's update path.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Row {
    id: String,
    fields: Fields,
}

impl Row {
    pub fn new(id: impl Into<String>) -> Self {
        Self::with_fields(id, Fields::new())
    }

    /// Builds a row from arbitrary fields, filling in missing seed fields.
    pub fn with_fields(id: impl Into<String>, mut fields: Fields) -> Self {
        for key in SEED_FIELDS {
            fields
                .entry(key.to_string())
                .or_insert_with(|| FieldValue::text(""));
        }
        Row {
            id: id.into(),
            fields,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Overwrites the fields present in `patch`, keeping everything else.
    pub fn merge(&mut self, patch: &RowPatch) {
        for (key, value) in &patch.fields {
            self.fields.insert(key.clone(), value.clone());
        }
    }
}

/// A partial row addressed by id, used for merge updates.
#[derive(Clone, Debug, PartialEq)]
pub struct RowPatch {
    pub id: String,
    pub fields: Fields,
}

impl RowPatch {
    pub fn new(id: impl Into<String>) -> Self {
        RowPatch {
            id: id.into(),
            fields: Fields::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

/// Hands out row ids built from the wall clock in milliseconds plus the
/// row's position in its batch. Ids never repeat within one generator.
#[derive(Debug, Default)]
pub struct RowIdGenerator {
    last: i64,
}

impl RowIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_batch(&mut self, count: usize) -> Vec<String> {
        let now = Utc::now().timestamp_millis();
        self.batch_from(now, count)
    }

    fn batch_from(&mut self, now: i64, count: usize) -> Vec<String> {
        let base = now.max(self.last + 1);
        let ids = (0..count as i64).map(|i| (base + i).to_string()).collect();
        if count > 0 {
            self.last = base + count as i64 - 1;
        }
        ids
    }
}
