// Drives the compiled binary through a PTY: start a game, press a few keys, quit.
//
// Requires a TTY; expectrl allocates a pseudo terminal. Unix-only and ignored
// by default. Run manually via: `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn minimal_session_starts_and_exits() -> Result<(), Box<dyn std::error::Error>> {
    let bin = assert_cmd::cargo::cargo_bin("canrun");
    let cmd = format!("{} --seed 7 --no-save", bin.display());

    let mut p = spawn(cmd)?;
    std::thread::sleep(Duration::from_millis(200));

    // start, wait for a spawn, poke a few cells
    p.send("s")?;
    std::thread::sleep(Duration::from_millis(1200));
    p.send("159")?;
    std::thread::sleep(Duration::from_millis(100));

    p.send("\x1b")?; // ESC
    p.expect(Eof)?;
    Ok(())
}
