//! Lexer for free text that mentions files
//!
//!     Words are split on spaces and tabs. A word is a filename when it contains a dot or a
//!     directory separator followed by at least one more character, as in `bar.txt`,
//!     `./foo/bar.txt` or `src/main`. A word ending on the separator (`end.`, `dir/`) stays text.
//!     Parentheses end a filename so that `(see foo.txt)` links `foo.txt` only.

use super::engine::{Machine, Step};
use crate::token::HrefToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Spaces,
    Text,
    /// After a `.` in a word.
    Dot,
    /// After `..`.
    DoubleDot,
    /// After a `/` in a word.
    DirSep,
    Filename,
}

fn is_space(c: u8) -> bool {
    c == b' ' || c == b'\t'
}

#[derive(Debug, Clone)]
pub struct HrefLexer {
    state: State,
    kind: HrefToken,
}

impl Default for HrefLexer {
    fn default() -> Self {
        Self {
            state: State::Idle,
            kind: HrefToken::Err,
        }
    }
}

impl HrefLexer {
    pub fn new() -> Self {
        Self::default()
    }

    fn go(&mut self, state: State, kind: HrefToken) -> Step {
        self.state = state;
        self.kind = kind;
        Step::Shift
    }

    fn word(&mut self, c: u8) -> Step {
        match c {
            b'.' => self.go(State::Dot, self.kind),
            b'/' => self.go(State::DirSep, self.kind),
            _ => {
                self.state = State::Text;
                Step::Shift
            }
        }
    }
}

impl Machine for HrefLexer {
    type Kind = HrefToken;

    fn is_idle(&self) -> bool {
        self.state == State::Idle
    }

    fn kind(&self) -> HrefToken {
        self.kind
    }

    fn step(&mut self, c: u8) -> Step {
        use HrefToken::*;
        match self.state {
            State::Idle => {
                if is_space(c) {
                    self.go(State::Spaces, Space)
                } else {
                    self.kind = Text;
                    self.word(c)
                }
            }
            State::Spaces => {
                if is_space(c) {
                    Step::Shift
                } else {
                    Step::Reject
                }
            }
            State::Text => match c {
                c if is_space(c) => Step::Reject,
                _ => self.word(c),
            },
            State::Dot => match c {
                c if is_space(c) => Step::Reject,
                b'(' | b')' => Step::Reject,
                b'.' => self.go(State::DoubleDot, self.kind),
                b'/' => self.go(State::DirSep, self.kind),
                _ => self.go(State::Filename, Filename),
            },
            State::DoubleDot => match c {
                c if is_space(c) => Step::Reject,
                b'/' => self.go(State::DirSep, self.kind),
                _ => self.go(State::Text, Text),
            },
            State::DirSep => match c {
                c if is_space(c) => Step::Reject,
                b'(' | b')' => Step::Reject,
                b'.' => self.go(State::Dot, self.kind),
                b'/' => self.go(State::Text, Text),
                _ => self.go(State::Filename, Filename),
            },
            State::Filename => match c {
                c if is_space(c) => Step::Reject,
                b'(' | b')' => Step::Reject,
                b'.' => self.go(State::Dot, Text),
                b'/' => self.go(State::DirSep, Text),
                _ => Step::Shift,
            },
        }
    }

    fn finish(&mut self) -> HrefToken {
        let kind = self.kind;
        self.state = State::Idle;
        self.kind = HrefToken::Err;
        kind
    }
}
