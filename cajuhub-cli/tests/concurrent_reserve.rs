//! Several processes racing for one slot.

mod common;

use assert_cmd::cargo::cargo_bin;
use common::{TestEnv, DATE};
use std::process::Command;
use std::sync::{Arc, Barrier};
use std::thread;

const RACERS: usize = 6;

#[test]
fn test_concurrent_reserve_has_one_winner() {
    let env = TestEnv::with_admin();
    let admin = env.admin_token();
    let space = env.add_space(&admin, "S1");
    let token = env.user_token("Ana", "ana@example.com");

    let barrier = Arc::new(Barrier::new(RACERS));
    let handles: Vec<_> = (0..RACERS)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            let data_dir = env.data_dir.clone();
            let token = token.clone();
            let space = space.to_string();
            thread::spawn(move || {
                barrier.wait();
                Command::new(cargo_bin("cajuhub"))
                    .env_remove("CAJUHUB_TOKEN")
                    .arg("--data-dir")
                    .arg(&data_dir)
                    .args(["--token", &token, "--busy-timeout", "30"])
                    .args(["reserve", "--space", &space, "--date", DATE, "--shift", "morning"])
                    .output()
                    .expect("Failed to run reserve")
            })
        })
        .collect();

    let codes: Vec<i32> = handles
        .into_iter()
        .map(|h| h.join().unwrap().status.code().unwrap())
        .collect();

    assert_eq!(codes.iter().filter(|&&c| c == 0).count(), 1, "codes: {codes:?}");
    assert_eq!(
        codes.iter().filter(|&&c| c == 1).count(),
        RACERS - 1,
        "codes: {codes:?}"
    );

    let conn = rusqlite::Connection::open(env.database_path()).unwrap();
    let confirmed: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM reservations WHERE status = 'confirmed'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(confirmed, 1);
}
