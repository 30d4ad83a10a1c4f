use rusqlite::Connection;
use studynote_core::db::open_db_in_memory;
use studynote_core::{KvError, NoteStore, PreferenceStore, SqlitePreferenceStore, SubjectStore};

#[test]
fn set_overwrites_and_remove_deletes() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqlitePreferenceStore::try_new(&conn).unwrap();

    assert_eq!(kv.get("notes_1").unwrap(), None);
    kv.set("notes_1", "[]").unwrap();
    kv.set("notes_1", "[1]").unwrap();
    assert_eq!(kv.get("notes_1").unwrap().as_deref(), Some("[1]"));
    assert!(kv.contains_key("notes_1").unwrap());

    kv.remove("notes_1").unwrap();
    kv.remove("notes_1").unwrap();
    assert!(!kv.contains_key("notes_1").unwrap());
}

#[test]
fn keys_are_sorted() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqlitePreferenceStore::try_new(&conn).unwrap();
    kv.set("subjects_list", "[]").unwrap();
    kv.set("notes_2", "[]").unwrap();
    kv.set("notes_10", "[]").unwrap();

    assert_eq!(
        kv.keys().unwrap(),
        vec!["notes_10", "notes_2", "subjects_list"]
    );
}

#[test]
fn try_new_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();
    let err = SqlitePreferenceStore::try_new(&conn).err().unwrap();
    assert!(matches!(err, KvError::MissingRequiredTable("preferences")));
}

#[test]
fn stores_survive_reopening_the_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("studynote.sqlite3");

    {
        let conn = studynote_core::db::open_db(&path).unwrap();
        let kv = SqlitePreferenceStore::try_new(&conn).unwrap();
        let subjects = SubjectStore::new(&kv);
        let mut list = subjects.load();
        list.truncate(2);
        assert!(subjects.save(&list));
        NoteStore::new(&kv).append(list[0].id, "định lý Pythagore");
    }

    let conn = studynote_core::db::open_db(&path).unwrap();
    let kv = SqlitePreferenceStore::try_new(&conn).unwrap();
    let subjects = SubjectStore::new(&kv).load();
    assert_eq!(subjects.len(), 2);
    let notes = NoteStore::new(&kv).load(subjects[0].id);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].content, "định lý Pythagore");
}
