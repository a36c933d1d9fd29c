//! Integration tests for the on-disk key-value store.

use dlpchat::store::{CONVERSATIONS_KEY, FileStore, KeyValueStore, LocalStore, THEME_KEY};
use dlpchat::types::{Conversation, Message, ThemeMode};

mod file_store_tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = FileStore::at(dir.path());
        let value = r#"{"name": "test", "count": 42}"#;

        store.set("test_key", value).expect("Failed to set storage");
        assert_eq!(store.get("test_key"), Some(value.to_string()));
    }

    #[test]
    fn test_get_nonexistent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::at(dir.path());
        assert_eq!(store.get("missing"), None);
    }

    #[test]
    fn test_overwrite() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = FileStore::at(dir.path());
        store.set("theme", "dark").unwrap();
        store.set("theme", "light").unwrap();
        assert_eq!(store.get("theme"), Some("light".to_string()));
    }

    #[test]
    fn test_delete() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = FileStore::at(dir.path());
        store.set("to_delete", "x").unwrap();
        store.delete("to_delete").unwrap();
        assert_eq!(store.get("to_delete"), None);
        // Deleting again is not an error.
        store.delete("to_delete").unwrap();
    }

    #[test]
    fn test_keys_and_clear() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = FileStore::at(dir.path());
        store.set("key1", "a").unwrap();
        store.set("key2", "b").unwrap();

        let mut keys = store.keys();
        keys.sort();
        assert_eq!(keys, vec!["key1".to_string(), "key2".to_string()]);

        store.clear().unwrap();
        assert!(store.keys().is_empty());
    }

    #[test]
    fn test_stores_are_isolated() {
        let first_dir = tempfile::tempdir().expect("tempdir");
        let second_dir = tempfile::tempdir().expect("tempdir");
        let mut first = FileStore::at(first_dir.path());
        let second = FileStore::at(second_dir.path());

        first.set("shared", "one").unwrap();
        assert_eq!(second.get("shared"), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        FileStore::at(dir.path()).set(THEME_KEY, "light").unwrap();
        assert_eq!(
            FileStore::at(dir.path()).get(THEME_KEY),
            Some("light".to_string())
        );
    }
}

mod local_store_tests {
    use super::*;

    #[test]
    fn test_conversations_round_trip_on_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = LocalStore::new(FileStore::at(dir.path()));
        let conv = Conversation {
            id: 1_700_000_000_000,
            title: "Hello".into(),
            messages: vec![Message::user("Hello"), Message::bot("Hi there")],
        };
        store.save_conversations(&[conv.clone()]).unwrap();
        store.save_theme(ThemeMode::Light).unwrap();

        let reopened = LocalStore::new(FileStore::at(dir.path()));
        assert_eq!(reopened.load_conversations(), vec![conv]);
        assert_eq!(reopened.load_theme(), ThemeMode::Light);
    }

    #[test]
    fn test_corrupt_list_loads_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut raw = FileStore::at(dir.path());
        raw.set(CONVERSATIONS_KEY, "{not json").unwrap();

        let store = LocalStore::new(raw);
        assert!(store.load_conversations().is_empty());
    }
}
