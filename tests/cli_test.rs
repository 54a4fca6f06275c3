//! End-to-end runs of the binary.

use std::process::Command;

fn pawn_arena(args: &[&str]) -> (bool, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_pawn_arena"))
        .args(args)
        .env("RUST_LOG", "off")
        .env_remove("PAWN_ARENA_CONFIG")
        .output()
        .unwrap();
    (
        output.status.success(),
        String::from_utf8_lossy(&output.stdout).into_owned(),
    )
}

#[test]
fn test_solve_missionaries() {
    let (ok, stdout) = pawn_arena(&["solve", "mnc", "2", "1"]);
    assert!(ok);
    assert_eq!(stdout.trim(), "[(2, 0), (1, 0), (1, 1)]");

    let (ok, stdout) = pawn_arena(&["solve", "mnc", "--graph", "4", "4"]);
    assert!(!ok);
    assert_eq!(stdout.trim(), "No solution");
}

#[test]
fn test_solve_pitchers() {
    let (ok, stdout) = pawn_arena(&["solve", "pitcher", "1", "4", "9", "7"]);
    assert!(ok);
    assert_eq!(stdout.trim(), "[Fill P3, P3=>P1, Empty P1, P3=>P1]");
}

#[test]
fn test_play_match() {
    let (ok, stdout) = pawn_arena(&["play", "--black", "first", "--white", "greedy"]);
    assert!(ok);
    assert!(stdout.contains("wins after"));
}

#[test]
fn test_move_harness() {
    let (ok, stdout) = pawn_arena(&["test-move", "first"]);
    assert!(ok);
    assert!(stdout.contains("PASSED"));

    let (ok, _) = pawn_arena(&["test-move", "builtin:nonsense"]);
    assert!(!ok);
}
