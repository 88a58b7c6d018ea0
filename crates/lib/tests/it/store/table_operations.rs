use userstore::store::{FieldKey, Record, Table};

fn user(name: &str) -> Record {
    Record::new().with(FieldKey::UserName, name)
}

#[test]
fn test_generated_ids_skip_supplied_ones() {
    let mut table = Table::new();
    table.insert(user("a").with(FieldKey::Id, "2")).unwrap();
    let first = table.insert(user("b")).unwrap().id().unwrap().to_string();
    let second = table.insert(user("c")).unwrap().id().unwrap().to_string();

    assert_eq!(first, "1");
    assert_eq!(second, "3");

    let ids: Vec<_> = table.rows().iter().filter_map(Record::id).collect();
    assert_eq!(ids, ["2", "1", "3"]);
}

#[test]
fn test_lookup_cardinality_is_left_to_caller() {
    let mut table = Table::new();
    for name in ["alice", "alice", "bob"] {
        table.insert(user(name)).unwrap();
    }

    let named = |n: &'static str| move |r: &Record| r.get(FieldKey::UserName) == Some(n);
    assert_eq!(table.find_by(named("alice")).len(), 2);
    assert_eq!(table.find_by(named("bob")).len(), 1);
    assert!(table.find_by(named("carol")).is_empty());
}

#[test]
fn test_delete_missing_row_leaves_table_unchanged() {
    let mut table = Table::new();
    table.insert(user("alice")).unwrap();
    let before = table.clone();

    assert!(table.delete_by(|r| r.id() == Some("9")).is_none());
    assert_eq!(table, before);
}

#[test]
fn test_table_serializes_rows_and_counter() {
    let mut table = Table::new();
    table.insert(user("alice")).unwrap();

    let json = serde_json::to_value(&table).unwrap();
    assert_eq!(json["rows"][0]["USERNAME"], "alice");
    assert_eq!(json["next_id"], 2);

    let back: Table = serde_json::from_value(json).unwrap();
    assert_eq!(back, table);
}
