use chrono::{TimeZone, Utc};
use studynote_core::{
    default_subjects, MemoryPreferenceStore, PreferenceStore, Subject, SubjectDraft, SubjectStore,
    SUBJECTS_KEY,
};

fn subject(id: i64, name: &str, description: &str) -> Subject {
    Subject::new(
        id,
        SubjectDraft {
            name: name.to_string(),
            icon: "📚".to_string(),
            gradient: "from-green-500 to-teal-500".to_string(),
            shadow: "shadow-green-500/50".to_string(),
            description: description.to_string(),
        },
        Some(Utc.with_ymd_and_hms(2026, 9, 1, 8, 0, 0).unwrap()),
    )
    .unwrap()
}

#[test]
fn fresh_store_loads_starter_subjects() {
    let kv = MemoryPreferenceStore::new();
    let store = SubjectStore::new(&kv);

    let loaded = store.load();
    assert_eq!(loaded, default_subjects());
    let names: Vec<&str> = loaded.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Toán", "Lý", "Anh", "CNTT", "Văn", "Hóa"]);
}

#[test]
fn save_then_load_round_trips_in_order() {
    let kv = MemoryPreferenceStore::new();
    let store = SubjectStore::new(&kv);
    let subjects = vec![
        subject(1_700_000_000_002, "Sử", "Lịch sử"),
        subject(1_700_000_000_001, "Địa", ""),
        subject(1_700_000_000_003, "Sinh", "Sinh học\nlớp 11"),
    ];

    assert!(store.save(&subjects));
    assert_eq!(store.load(), subjects);
}

#[test]
fn payload_uses_camel_case_and_iso_timestamps() {
    let kv = MemoryPreferenceStore::new();
    let store = SubjectStore::new(&kv);
    assert!(store.save(&[subject(42, "GDCD", "")]));

    let raw = kv.get(SUBJECTS_KEY).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json[0]["id"], 42);
    assert_eq!(json[0]["name"], "GDCD");
    assert_eq!(json[0]["createdAt"], "2026-09-01T08:00:00Z");
}

#[test]
fn load_accepts_payload_written_by_earlier_app_versions() {
    let kv = MemoryPreferenceStore::new();
    kv.insert_raw(
        SUBJECTS_KEY,
        r#"[
            {"id":1,"name":"Toán","icon":"📐","gradient":"from-blue-400 to-blue-600","shadow":"shadow-blue-500/50","description":"Đại số & Hình học"},
            {"id":1700000000000,"name":"Sử","icon":"📚","gradient":"from-purple-500 to-pink-500","shadow":"shadow-purple-500/50","description":"","createdAt":"2023-11-14T22:13:20.000Z"}
        ]"#,
    );
    let store = SubjectStore::new(&kv);

    let loaded = store.load();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].created_at, None);
    assert_eq!(
        loaded[1].created_at,
        Some(Utc.timestamp_millis_opt(1_700_000_000_000).unwrap())
    );
}

#[test]
fn load_falls_back_when_backend_read_fails() {
    let kv = MemoryPreferenceStore::new();
    let store = SubjectStore::new(&kv);
    assert!(store.save(&[subject(5, "Sử", "")]));

    kv.fail_reads(true);
    assert_eq!(store.load(), default_subjects());
}

#[test]
fn get_by_id_returns_none_for_ids_outside_collection() {
    let kv = MemoryPreferenceStore::new();
    let store = SubjectStore::new(&kv);
    assert!(store.save(&[subject(10, "Sinh", "")]));

    assert!(store.get_by_id(10).is_some());
    for id in [0, 1, 11, -10, i64::MAX] {
        assert_eq!(store.get_by_id(id), None, "id {id}");
    }
}
