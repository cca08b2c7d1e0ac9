//! Lexer for compiler and linter output
//!
//!     Lines look like `path:line[:column]: message`. Anything after the file name that is not
//!     a number starts the message, so `make: *** Error 1` is a file name followed by a message.
//!     Lines starting with white space continue the previous message.

use super::engine::{Machine, Step};
use crate::token::DiagnosticToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Start,
    FileSep,
    Line,
    LineSep,
    Column,
    ColumnSep,
    Message,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Filename,
    Number,
    Message,
    Error,
    Done,
}

#[derive(Debug, Clone)]
pub struct DiagnosticLexer {
    state: State,
    phase: Phase,
    kind: DiagnosticToken,
}

impl Default for DiagnosticLexer {
    fn default() -> Self {
        Self {
            state: State::Idle,
            phase: Phase::Start,
            kind: DiagnosticToken::Err,
        }
    }
}

impl DiagnosticLexer {
    pub fn new() -> Self {
        Self::default()
    }

    fn go(&mut self, state: State, kind: DiagnosticToken) -> Step {
        self.state = state;
        self.kind = kind;
        Step::Shift
    }

    fn separator(&mut self, next: Phase) -> Step {
        self.phase = next;
        self.kind = DiagnosticToken::Separator;
        Step::Accept
    }

    fn start(&mut self, c: u8) -> Step {
        use DiagnosticToken::*;
        match (self.phase, c) {
            (Phase::Start, b' ' | b'\t') => self.go(State::Message, Message),
            (Phase::Start, _) => self.go(State::Filename, Filename),
            (Phase::FileSep, b':') => self.separator(Phase::Line),
            (Phase::LineSep, b':') => self.separator(Phase::Column),
            (Phase::ColumnSep, b':') => self.separator(Phase::Message),
            (Phase::Line | Phase::Column, b'0'..=b'9') => self.go(State::Number, LineNum),
            _ => self.go(State::Message, Message),
        }
    }
}

impl Machine for DiagnosticLexer {
    type Kind = DiagnosticToken;

    fn is_idle(&self) -> bool {
        self.state == State::Idle
    }

    fn kind(&self) -> DiagnosticToken {
        self.kind
    }

    fn step(&mut self, c: u8) -> Step {
        let step = match self.state {
            State::Idle => self.start(c),
            State::Filename => {
                if c == b':' {
                    self.phase = Phase::FileSep;
                    Step::Reject
                } else {
                    Step::Shift
                }
            }
            State::Number => match c {
                b'0'..=b'9' => Step::Shift,
                b':' => {
                    self.phase = match self.phase {
                        Phase::Line => Phase::LineSep,
                        _ => Phase::ColumnSep,
                    };
                    Step::Reject
                }
                _ => self.go(State::Error, DiagnosticToken::Err),
            },
            State::Message | State::Error => Step::Shift,
            State::Done => Step::Reject,
        };
        if step == Step::Accept {
            self.state = State::Done;
        }
        step
    }

    fn finish(&mut self) -> DiagnosticToken {
        let kind = match self.state {
            // A line without any colon is not a diagnostic.
            State::Filename if self.phase == Phase::Start => DiagnosticToken::Err,
            _ => self.kind,
        };
        self.state = State::Idle;
        self.kind = DiagnosticToken::Err;
        kind
    }

    fn continues_lines(&self) -> bool {
        true
    }

    fn newline(&mut self) {
        self.phase = Phase::Start;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{lex, lex_kinds, pairs_of};
    use crate::token::DiagnosticToken::*;

    #[test]
    fn gcc_style_line() {
        let events = lex::<DiagnosticLexer>("src/a.c:12:5: warning: unused\n");
        assert_eq!(
            pairs_of(&events),
            vec![
                (Filename, "src/a.c".to_string()),
                (Separator, ":".to_string()),
                (LineNum, "12".to_string()),
                (Separator, ":".to_string()),
                (LineNum, "5".to_string()),
                (Separator, ":".to_string()),
                (Message, " warning: unused".to_string()),
            ]
        );
    }

    #[test]
    fn message_without_line_number() {
        assert_eq!(
            lex_kinds::<DiagnosticLexer>("make: *** Error 1\n  continued\n"),
            vec![Filename, Separator, Message, Message]
        );
    }

    #[test]
    fn line_without_colon_is_an_error() {
        assert_eq!(lex_kinds::<DiagnosticLexer>("oops\n"), vec![Err]);
        assert_eq!(
            lex_kinds::<DiagnosticLexer>("a.c:1x: m\n"),
            vec![Filename, Separator, Err]
        );
    }

    #[test]
    fn noise_after_a_diagnostic_is_an_error() {
        let events = lex::<DiagnosticLexer>("x.c:4: error: boom\nnoise\n");
        assert_eq!(
            pairs_of(&events),
            vec![
                (Filename, "x.c".to_string()),
                (Separator, ":".to_string()),
                (LineNum, "4".to_string()),
                (Separator, ":".to_string()),
                (Message, " error: boom".to_string()),
                (Err, "noise".to_string()),
            ]
        );
    }

    #[test]
    fn backslash_newline_joins_message_lines() {
        assert_eq!(
            lex_kinds::<DiagnosticLexer>("a.c:1: long \\\n tail\n"),
            vec![Filename, Separator, LineNum, Separator, Message]
        );
    }
}
