use studynote_core::{MemoryPreferenceStore, Note, NoteStore, PreferenceStore};

const SUBJECT: i64 = 1_700_000_000_000;

#[test]
fn load_of_unknown_subject_is_empty() {
    let kv = MemoryPreferenceStore::new();
    let store = NoteStore::new(&kv);
    assert!(store.load(SUBJECT).is_empty());
    assert!(!store.exists(SUBJECT));
}

#[test]
fn append_then_load_returns_newest_first() {
    let kv = MemoryPreferenceStore::new();
    let store = NoteStore::new(&kv);

    let after_append = store.append(SUBJECT, "hello");
    let loaded = store.load(SUBJECT);
    assert_eq!(loaded, after_append);
    assert_eq!(loaded[0].content, "hello");

    store.append(SUBJECT, "world");
    let loaded = store.load(SUBJECT);
    assert_eq!(loaded[0].content, "world");
    assert_eq!(loaded[1].content, "hello");
}

#[test]
fn notes_are_scoped_to_their_subject() {
    let kv = MemoryPreferenceStore::new();
    let store = NoteStore::new(&kv);
    store.append(1, "toán");
    store.append(2, "lý");

    assert_eq!(store.load(1).len(), 1);
    assert_eq!(store.load(2)[0].content, "lý");
    assert!(kv.contains_key("notes_1").unwrap());
    assert!(kv.contains_key("notes_2").unwrap());
}

#[test]
fn remove_is_idempotent() {
    let kv = MemoryPreferenceStore::new();
    let store = NoteStore::new(&kv);
    store.append(SUBJECT, "a");
    store.append(SUBJECT, "b");
    let target = store.load(SUBJECT)[1].id;

    let once = store.remove(SUBJECT, target);
    let twice = store.remove(SUBJECT, target);
    assert_eq!(once, twice);
    assert_eq!(once.len(), 1);
    assert_eq!(once[0].content, "b");
    assert_eq!(store.load(SUBJECT), once);
}

#[test]
fn remove_unknown_id_leaves_notes_untouched() {
    let kv = MemoryPreferenceStore::new();
    let store = NoteStore::new(&kv);
    let notes = store.append(SUBJECT, "keep me");

    assert_eq!(store.remove(SUBJECT, 12345), notes);
}

#[test]
fn clear_deletes_key_and_load_returns_empty() {
    let kv = MemoryPreferenceStore::new();
    let store = NoteStore::new(&kv);
    store.append(SUBJECT, "a");
    assert!(store.exists(SUBJECT));

    store.clear(SUBJECT);
    assert!(store.load(SUBJECT).is_empty());
    assert!(!store.exists(SUBJECT));
    assert_eq!(kv.raw(&format!("notes_{SUBJECT}")), None);
}

#[test]
fn save_overwrites_whole_collection() {
    let kv = MemoryPreferenceStore::new();
    let store = NoteStore::new(&kv);
    store.append(SUBJECT, "old");

    let replacement = vec![
        Note::new(2, "second", "10:00:00 02/01/2026").unwrap(),
        Note::new(1, "first\nmultiline", "09:00:00 01/01/2026").unwrap(),
    ];
    store.save(SUBJECT, &replacement);
    assert_eq!(store.load(SUBJECT), replacement);
}

#[test]
fn payload_is_a_json_array_of_id_content_timestamp() {
    let kv = MemoryPreferenceStore::new();
    let store = NoteStore::new(&kv);
    store.save(SUBJECT, &[Note::new(7, "x", "08:00:00 01/09/2026").unwrap()]);

    let raw = kv.raw(&format!("notes_{SUBJECT}")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        json,
        serde_json::json!([{"id": 7, "content": "x", "timestamp": "08:00:00 01/09/2026"}])
    );
}
