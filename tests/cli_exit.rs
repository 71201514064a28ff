use std::{fs, process::Command};

use tempfile::TempDir;

use irclog::persist::sqlite::SqliteLogStore;

fn run_cli(tmp: &TempDir, log: impl AsRef<[u8]>) -> (bool, u64) {
    let log_path = tmp.path().join("chat.log");
    let db_path = tmp.path().join("chat.db");
    fs::write(&log_path, log).expect("write log");

    let status = Command::new(env!("CARGO_BIN_EXE_irclog"))
        .arg(&log_path)
        .arg(&db_path)
        .arg("Libera")
        .arg("#chat")
        .args(["--utc", "--quiet"])
        .env("RUST_LOG", "off")
        .status()
        .expect("spawn irclog");

    let count = SqliteLogStore::open(&db_path)
        .expect("open db")
        .message_count()
        .expect("count");
    (status.success(), count)
}

#[test]
fn clean_log_exits_zero() {
    let tmp = TempDir::new().expect("tmp");
    let (ok, count) = run_cli(
        &tmp,
        concat!(
            "2023-06-15T12:00:00  <alice> hello world\n",
            "2023-06-15T12:00:05  ** alice <alice!a@host> has joined #chat\n",
        ),
    );
    assert!(ok);
    assert_eq!(count, 2);
}

#[test]
fn corrupt_log_exits_non_zero_after_first_line() {
    let tmp = TempDir::new().expect("tmp");
    let (ok, count) = run_cli(
        &tmp,
        concat!(
            "2023-06-15T12:00:00  <alice> first\n",
            "2023-99-15T12:00:01  <alice> second\n",
            "2023-06-15T12:00:02  <alice> third\n",
        ),
    );
    assert!(!ok);
    assert_eq!(count, 1);
}

#[test]
fn non_utf8_line_is_stored_as_latin1() {
    let tmp = TempDir::new().expect("tmp");
    let (ok, count) = run_cli(&tmp, b"2023-06-15T12:00:00  <alice> caf\xE9\n");
    assert!(ok);
    assert_eq!(count, 1);

    let store = SqliteLogStore::open(tmp.path().join("chat.db")).expect("open db");
    let messages = store.load_messages().expect("messages");
    assert_eq!(messages[0].text, "caf\u{e9}");
    assert_eq!(messages[0].text.as_bytes().to_vec(), vec![99u8, 97, 102, 0xC3, 0xA9]);
}
