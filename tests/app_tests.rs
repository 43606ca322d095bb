#![cfg(feature = "cli")]

use std::fs;
use std::path::Path;
use std::process::Command;

use structopt::StructOpt;
use tempfile::tempdir;

use twenty48::app::GameApp;
use twenty48::cli::Opt;
use twenty48::{Direction, Grid, Turn};

fn run_app(args: &[&str]) -> Result<(), Box<dyn std::error::Error>> {
    let opt = Opt::from_iter(std::iter::once("twenty48").chain(args.iter().copied()));
    let config = opt.to_app_config()?;

    GameApp::new(config).run()
}

fn read_trace(path: &Path) -> (Grid, Vec<Turn>) {
    let text = fs::read_to_string(path).unwrap();
    let mut lines = text.lines();

    let start = serde_json::from_str(lines.next().unwrap()).unwrap();
    let turns = lines.map(|line| serde_json::from_str(line).unwrap()).collect();

    (start, turns)
}

#[test]
fn test_scripted_game_writes_trace() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("turns.jsonl");
    let trace = path.to_str().unwrap();

    run_app(&["--seed", "5", "--moves", "lurdlurd", "--trace", trace]).unwrap();

    let (start, turns) = read_trace(&path);
    let expected = [Direction::Left, Direction::Up, Direction::Right, Direction::Down];

    assert_eq!(start.count_empty(), 14);
    assert_eq!(turns.len(), 8);

    let mut last_score = 0;
    for (turn, direction) in turns.iter().zip(expected.iter().cycle()) {
        assert_eq!(turn.direction, *direction);
        assert_eq!(turn.spawn.is_some(), turn.shift.moved());
        assert_eq!(turn.score, last_score + turn.shift.score());
        last_score = turn.score;
    }

    assert_eq!(turns.iter().filter(|t| t.shift.moved()).count(), turns.last().unwrap().number);
}

#[test]
fn test_same_seed_same_trace() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("first.jsonl");
    let second = dir.path().join("second.jsonl");

    for path in [&first, &second] {
        run_app(&["-s", "77", "-m", "l,u,l,d,r,r", "-t", path.to_str().unwrap()]).unwrap();
    }

    assert_eq!(fs::read_to_string(&first).unwrap(), fs::read_to_string(&second).unwrap());
}

#[test]
fn test_unwritable_trace_fails_run() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing").join("turns.jsonl");

    assert!(run_app(&["--moves", "l", "--trace", path.to_str().unwrap()]).is_err());
}

#[test]
fn test_exit_codes() {
    let binary = env!("CARGO_BIN_EXE_twenty48");

    let ok = Command::new(binary).args(["-q", "--seed", "3", "--moves", "lurd"]).output().unwrap();
    assert_eq!(ok.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&ok.stdout).contains("Score:"));

    let bad_config = Command::new(binary).args(["-q", "--moves", ","]).output().unwrap();
    assert_eq!(bad_config.status.code(), Some(2));

    let dir = tempdir().unwrap();
    let trace = dir.path().join("missing").join("turns.jsonl");
    let failed = Command::new(binary)
        .args(["-q", "--moves", "l", "--trace", trace.to_str().unwrap()])
        .output()
        .unwrap();
    assert_eq!(failed.status.code(), Some(1));
}
