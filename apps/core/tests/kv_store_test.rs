use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use gridlaunch_core::history::LaunchHistory;
use gridlaunch_core::kv_store::{
    get_count_map, get_string_list, load_history, open_file, open_memory, save_history,
    set_count_map, set_string_list, LAUNCH_COUNTS_KEY, RECENT_ITEMS_KEY,
};

#[test]
fn missing_keys_read_as_empty_defaults() {
    let db = open_memory().unwrap();
    assert!(get_count_map(&db, LAUNCH_COUNTS_KEY).unwrap().is_empty());
    assert!(get_string_list(&db, RECENT_ITEMS_KEY).unwrap().is_empty());

    let history = load_history(&db, 8);
    assert!(history.recent_ids().is_empty());
    assert!(history.counts().is_empty());
}

#[test]
fn values_are_last_write_wins() {
    let db = open_memory().unwrap();
    set_string_list(&db, RECENT_ITEMS_KEY, &["a".to_string()]).unwrap();
    set_string_list(&db, RECENT_ITEMS_KEY, &["b".to_string(), "c".to_string()]).unwrap();
    assert_eq!(get_string_list(&db, RECENT_ITEMS_KEY).unwrap(), vec!["b", "c"]);

    set_count_map(&db, LAUNCH_COUNTS_KEY, &HashMap::from([("a".to_string(), 4)])).unwrap();
    assert_eq!(get_count_map(&db, LAUNCH_COUNTS_KEY).unwrap().get("a"), Some(&4));
}

#[test]
fn corrupt_values_fall_back_to_empty_history() {
    let db = open_memory().unwrap();
    db.execute(
        "INSERT INTO kv (key, value) VALUES (?1, ?2)",
        rusqlite::params![LAUNCH_COUNTS_KEY, "{not-json"],
    )
    .unwrap();
    db.execute(
        "INSERT INTO kv (key, value) VALUES (?1, ?2)",
        rusqlite::params![RECENT_ITEMS_KEY, "42"],
    )
    .unwrap();

    let history = load_history(&db, 8);
    assert!(history.counts().is_empty());
    assert!(history.recent_ids().is_empty());
}

#[test]
fn history_survives_reopen() {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let db_path = std::env::temp_dir()
        .join("gridlaunch")
        .join(format!("history-test-{unique}.sqlite3"));

    {
        let db = open_file(&db_path).unwrap();
        let mut history = LaunchHistory::with_capacity(8);
        history.record("/Applications/Notes.app");
        history.record("/Applications/Mail.app");
        history.record("/Applications/Notes.app");
        save_history(&db, &history).unwrap();
    }

    let reopened = open_file(&db_path).unwrap();
    let history = load_history(&reopened, 8);
    assert_eq!(
        history.recent_ids(),
        &[
            "/Applications/Notes.app".to_string(),
            "/Applications/Mail.app".to_string()
        ]
    );
    assert_eq!(history.count("/Applications/Notes.app"), 2);
    assert_eq!(history.count("/Applications/Mail.app"), 1);

    drop(reopened);
    std::fs::remove_file(&db_path).unwrap();
}

#[test]
fn reload_applies_smaller_capacity() {
    let db = open_memory().unwrap();
    let mut history = LaunchHistory::with_capacity(10);
    for id in ["a", "b", "c", "d"] {
        history.record(id);
    }
    save_history(&db, &history).unwrap();

    let reloaded = load_history(&db, 2);
    assert_eq!(reloaded.recent_ids(), &["d".to_string(), "c".to_string()]);
    assert_eq!(reloaded.count("a"), 1);
}

#[test]
fn failed_save_leaves_no_partial_history() {
    let db = open_memory().unwrap();
    db.execute_batch(
        "CREATE TRIGGER reject_recent BEFORE INSERT ON kv
         WHEN NEW.key = 'recent_items'
         BEGIN SELECT RAISE(ABORT, 'recent list rejected'); END;",
    )
    .unwrap();

    let mut history = LaunchHistory::with_capacity(8);
    history.record("/Applications/Notes.app");
    assert!(save_history(&db, &history).is_err());

    assert!(get_count_map(&db, LAUNCH_COUNTS_KEY).unwrap().is_empty());
    assert!(get_string_list(&db, RECENT_ITEMS_KEY).unwrap().is_empty());
}
