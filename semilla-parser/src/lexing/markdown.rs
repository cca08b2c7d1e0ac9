//! Line classifier for Markdown: every non-empty line is one token.

use super::engine::{Machine, Step};
use crate::token::MarkdownToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    /// After a leading `-`: a list bullet or the start of an underline.
    Dash,
    DashRun,
    EqualRun,
    /// After a leading `*` or `+`.
    Bullet,
    Ordinal,
    OrdinalMark,
    /// Rest of the line, whatever it is.
    Line,
}

#[derive(Debug, Clone)]
pub struct MarkdownLexer {
    state: State,
    kind: MarkdownToken,
}

impl Default for MarkdownLexer {
    fn default() -> Self {
        Self {
            state: State::Idle,
            kind: MarkdownToken::Err,
        }
    }
}

impl MarkdownLexer {
    pub fn new() -> Self {
        Self::default()
    }

    fn go(&mut self, state: State, kind: MarkdownToken) -> Step {
        self.state = state;
        self.kind = kind;
        Step::Shift
    }
}

impl Machine for MarkdownLexer {
    type Kind = MarkdownToken;

    fn is_idle(&self) -> bool {
        self.state == State::Idle
    }

    fn kind(&self) -> MarkdownToken {
        self.kind
    }

    fn step(&mut self, c: u8) -> Step {
        use MarkdownToken::*;
        match (self.state, c) {
            (State::Idle, b'#') => self.go(State::Line, Header),
            (State::Idle, b'-') => self.go(State::Dash, Para),
            (State::Idle, b'=') => self.go(State::EqualRun, Header),
            (State::Idle, b'*' | b'+') => self.go(State::Bullet, Para),
            (State::Idle, b'0'..=b'9') => self.go(State::Ordinal, Para),
            (State::Idle, _) => self.go(State::Line, Para),

            (State::Dash, b'-') => self.go(State::DashRun, Header),
            (State::Dash | State::Bullet | State::OrdinalMark, b' ' | b'\t') => {
                self.go(State::Line, ListItem)
            }
            (State::DashRun, b'-') | (State::EqualRun, b'=') => Step::Shift,
            (State::Ordinal, b'0'..=b'9') => Step::Shift,
            (State::Ordinal, b'.' | b')') => self.go(State::OrdinalMark, Para),

            (State::Line, _) => Step::Shift,
            _ => self.go(State::Line, Para),
        }
    }

    fn finish(&mut self) -> MarkdownToken {
        let kind = self.kind;
        self.state = State::Idle;
        self.kind = MarkdownToken::Err;
        kind
    }
}
