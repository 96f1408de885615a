use datatable::{DataTable, FieldValue, RecordStore, Row, RowPatch, TableConfig, TableError};
use std::fs;

const TWO_PEOPLE: &str = "name,email,age,role\n\
    \"Hopper, Grace\",grace@navy.mil,85,admiral\n\
    Ada,ada@engine.org,36,analyst\n";

#[test]
fn import_then_export_round_trips_through_files() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("people.csv");
    let target = dir.path().join("export.csv");
    fs::write(&source, TWO_PEOPLE).unwrap();

    let mut table = DataTable::default();
    assert_eq!(table.import_file(&source).unwrap(), 2);
    table.export_file(Some(&target)).unwrap();

    let exported = fs::read_to_string(&target).unwrap();
    assert_eq!(
        exported,
        "Name,Email,Age,Role\n\
         \"Hopper, Grace\",grace@navy.mil,85,admiral\n\
         Ada,ada@engine.org,36,analyst\n"
    );
}

#[test]
fn exported_labels_differ_from_keys() {
    // Export headers are labels, so re-importing yields label-keyed fields.
    let mut table = DataTable::default();
    table.import_csv(TWO_PEOPLE.as_bytes()).unwrap();
    let exported = table.export_csv().unwrap();

    let mut again = DataTable::default();
    assert_eq!(again.import_csv(exported.as_bytes()).unwrap(), 2);
    let first = &again.store().rows()[0];
    assert_eq!(first.get("Name"), Some(&FieldValue::text("Hopper, Grace")));
    assert_eq!(first.get("name"), Some(&FieldValue::text("")));
}

#[test]
fn validation_failure_leaves_everything_in_place() {
    let mut table = DataTable::default();
    table.import_csv(TWO_PEOPLE.as_bytes()).unwrap();
    let before = table.store().clone();
    let id = before.rows()[1].id().to_string();

    assert!(table.begin_edit(&id));
    table.set_draft_field("age", "abc").unwrap();
    let err = table.save_edit().unwrap_err();

    assert!(matches!(err, TableError::Validation { ref field, ref value } if field == "age" && value == "abc"));
    assert_eq!(table.store(), &before);
    assert_eq!(table.session().editing_id(), Some(id.as_str()));
    assert_eq!(
        table.session().draft().and_then(|d| d.get("age")),
        Some(&FieldValue::text("abc"))
    );
}

#[test]
fn edit_round_trip_is_identity() {
    let mut table = DataTable::default();
    table.import_csv(TWO_PEOPLE.as_bytes()).unwrap();
    let before = table.store().clone();

    for row in before.rows() {
        assert!(table.begin_edit(row.id()));
        table.save_edit().unwrap();
    }
    assert_eq!(table.store(), &before);
}

#[test]
fn update_merge_keeps_other_fields() {
    let mut store = RecordStore::default();
    let mut row = Row::new("r1");
    row.set("name", "A");
    row.set("age", 30.0);
    store.replace_all(vec![row]);

    store.update_by_id(&RowPatch::new("r1").with("age", 31.0));

    let row = store.get("r1").unwrap();
    assert_eq!(row.get("name"), Some(&FieldValue::text("A")));
    assert_eq!(row.get("age"), Some(&FieldValue::Number(31.0)));
}

#[test]
fn custom_numeric_fields_and_delimiter() {
    let config = TableConfig::from_json_str(
        r#"{"delimiter": ";", "numeric_fields": ["salary"], "page_size": 1}"#,
    )
    .unwrap();
    let mut table = DataTable::new(config);
    table
        .import_csv("name;salary\nAda;100\nGrace;200\n".as_bytes())
        .unwrap();
    assert!(table.add_column("salary", "Salary"));
    assert_eq!(table.page().rows.len(), 1);
    assert_eq!(table.page().total_count, 2);

    let id = table.store().rows()[0].id().to_string();
    table.begin_edit(&id);
    table.set_draft_field("age", "not checked").unwrap();
    table.set_draft_field("salary", "lots").unwrap();
    assert!(matches!(
        table.save_edit(),
        Err(TableError::Validation { ref field, .. }) if field == "salary"
    ));
    table.set_draft_field("salary", "150").unwrap();
    table.save_edit().unwrap();

    table.sort_by("salary");
    table.sort_by("salary");
    assert_eq!(
        table.export_csv().unwrap(),
        "Name;Email;Age;Role;Salary\nGrace;;;;200\nAda;;not checked;;150\n"
    );
}
