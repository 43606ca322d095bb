use std::collections::VecDeque;
use std::io::BufRead;

use enum_map::{enum_map, EnumMap};
use log::warn;
#[cfg(feature = "serde")]
use serde::Deserialize;

use crate::error::EngineError;
use crate::grid::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Restart,
    Quit,
}

/// Something that turns user input into commands.
pub trait InputSource {
    /// The next command, or `None` once the source is exhausted.
    fn next_command(&mut self) -> Option<Command>;
}

/// Maps textual key names to commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    pub directions: EnumMap<Direction, Vec<String>>,
    pub restart: Vec<String>,
    pub quit: Vec<String>,
}

fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            directions: enum_map! {
                Direction::Up => keys(&["w", "k", "up"]),
                Direction::Down => keys(&["s", "j", "down"]),
                Direction::Left => keys(&["a", "h", "left"]),
                Direction::Right => keys(&["d", "l", "right"]),
            },
            restart: keys(&["r", "restart"]),
            quit: keys(&["q", "quit"]),
        }
    }
}

fn is_bound(names: &[String], token: &str) -> bool {
    names.iter().any(|name| name.eq_ignore_ascii_case(token))
}

impl KeyBindings {
    /// Resolves one token. Unbound tokens fall back to direction names.
    pub fn lookup(&self, token: &str) -> Result<Command, EngineError> {
        let token = token.trim();

        if is_bound(&self.quit, token) {
            return Ok(Command::Quit);
        }

        if is_bound(&self.restart, token) {
            return Ok(Command::Restart);
        }

        if let Some((direction, _)) = self.directions.iter().find(|(_, names)| is_bound(names, token)) {
            return Ok(Command::Move(direction));
        }

        token.parse().map(Command::Move)
    }
}

/// On-disk form of [`KeyBindings`]; absent entries keep their defaults.
#[cfg(feature = "serde")]
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeymapFile {
    pub up: Vec<String>,
    pub down: Vec<String>,
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub restart: Vec<String>,
    pub quit: Vec<String>,
}

#[cfg(feature = "serde")]
impl Default for KeymapFile {
    fn default() -> Self {
        let defaults = KeyBindings::default();

        Self {
            up: defaults.directions[Direction::Up].clone(),
            down: defaults.directions[Direction::Down].clone(),
            left: defaults.directions[Direction::Left].clone(),
            right: defaults.directions[Direction::Right].clone(),
            restart: defaults.restart,
            quit: defaults.quit,
        }
    }
}

#[cfg(feature = "serde")]
impl From<KeymapFile> for KeyBindings {
    fn from(file: KeymapFile) -> Self {
        Self {
            directions: enum_map! {
                Direction::Up => file.up.clone(),
                Direction::Down => file.down.clone(),
                Direction::Left => file.left.clone(),
                Direction::Right => file.right.clone(),
            },
            restart: file.restart,
            quit: file.quit,
        }
    }
}

/// Reads whitespace separated key tokens line by line.
pub struct LineInput<R: BufRead> {
    reader: R,
    bindings: KeyBindings,
    queue: VecDeque<Command>,
}

impl<R: BufRead> LineInput<R> {
    pub fn new(reader: R, bindings: KeyBindings) -> Self {
        Self {
            reader,
            bindings,
            queue: VecDeque::new(),
        }
    }
}

impl<R: BufRead> InputSource for LineInput<R> {
    fn next_command(&mut self) -> Option<Command> {
        while self.queue.is_empty() {
            let mut line = String::new();

            match self.reader.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(err) => {
                    warn!("Failed to read input: {}", err);
                    return None;
                }
            }

            for token in line.split_whitespace() {
                match self.bindings.lookup(token) {
                    Ok(command) => self.queue.push_back(command),
                    Err(err) => warn!("Ignoring input: {}", err),
                }
            }
        }

        self.queue.pop_front()
    }
}

/// Replays a fixed list of directions.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    queue: VecDeque<Command>,
}

impl ScriptedInput {
    pub fn new(directions: &[Direction]) -> Self {
        Self {
            queue: directions.iter().copied().map(Command::Move).collect(),
        }
    }
}

impl InputSource for ScriptedInput {
    fn next_command(&mut self) -> Option<Command> {
        self.queue.pop_front()
    }
}

/// Parses `"l,u,r"`, `"left up right"` or the compact `"lur"`.
pub fn parse_moves(s: &str) -> Result<Vec<Direction>, EngineError> {
    let separated = s.contains(|c: char| c == ',' || c.is_whitespace());

    if separated {
        s.split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .map(str::parse)
            .collect()
    } else {
        s.chars().map(|c| c.to_string().parse()).collect()
    }
}
