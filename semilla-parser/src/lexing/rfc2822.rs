//! RFC 2822 message lexer
//!
//!     Headers are split into field name, colon and field body. A header line starting with
//!     white space is a folded continuation of the previous field and is reported as another
//!     field body. The first empty line switches to the body, reported one line at a time.
//!
//!     Several messages may be concatenated mbox style: a line starting with `From ` is a
//!     message break and the lines after it are headers again. Inside headers, `From:` is an
//!     ordinary field.

use super::engine::{Machine, Step};
use crate::token::Rfc2822Token;

const FROM: &[u8] = b"From ";

/// Printable US-ASCII except colon, as allowed in field names.
fn is_ftext(c: u8) -> bool {
    (33..=126).contains(&c) && c != b':'
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Headers,
    Body,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    /// Matched the first `n` bytes of `From ` at the start of a line.
    From(usize),
    BreakLine,
    FieldName,
    FieldBody,
    Body,
    Error,
    Done,
}

#[derive(Debug, Clone)]
pub struct Rfc2822Lexer {
    state: State,
    kind: Rfc2822Token,
    mode: Mode,
    line_start: bool,
}

impl Default for Rfc2822Lexer {
    fn default() -> Self {
        Self {
            state: State::Idle,
            kind: Rfc2822Token::Err,
            mode: Mode::Headers,
            line_start: true,
        }
    }
}

impl Rfc2822Lexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the empty line ending the headers has been seen.
    pub fn in_body(&self) -> bool {
        self.mode == Mode::Body
    }

    fn go(&mut self, state: State, kind: Rfc2822Token) -> Step {
        self.state = state;
        self.kind = kind;
        Step::Shift
    }

    /// Starts, or turns the current token into, an error running to the next colon.
    fn fail(&mut self) -> Step {
        self.kind = Rfc2822Token::Err;
        self.state = State::Error;
        Step::Shift
    }

    fn start(&mut self, c: u8) -> Step {
        use Rfc2822Token::*;
        let line_start = std::mem::replace(&mut self.line_start, false);
        match self.mode {
            _ if line_start && c == FROM[0] => {
                let kind = match self.mode {
                    Mode::Headers => FieldName,
                    Mode::Body => MessageBody,
                };
                self.go(State::From(1), kind)
            }
            Mode::Body => self.go(State::Body, MessageBody),
            Mode::Headers if line_start => match c {
                b' ' | b'\t' => self.go(State::FieldBody, FieldBody),
                c if is_ftext(c) => self.go(State::FieldName, FieldName),
                _ => self.fail(),
            },
            Mode::Headers => match c {
                b':' => {
                    self.kind = Colon;
                    Step::Accept
                }
                _ => self.go(State::FieldBody, FieldBody),
            },
        }
    }

    fn advance(&mut self, c: u8) -> Step {
        match self.state {
            State::Idle => self.start(c),
            State::From(n) => {
                if c == FROM[n] {
                    if n + 1 == FROM.len() {
                        self.go(State::BreakLine, Rfc2822Token::MessageBreak)
                    } else {
                        self.state = State::From(n + 1);
                        Step::Shift
                    }
                } else if self.mode == Mode::Headers {
                    self.state = State::FieldName;
                    self.advance(c)
                } else {
                    self.state = State::Body;
                    Step::Shift
                }
            }
            State::FieldName => match c {
                b':' => {
                    self.state = State::Done;
                    Step::Reject
                }
                c if is_ftext(c) => Step::Shift,
                _ => self.fail(),
            },
            State::Error => {
                if c == b':' {
                    Step::Reject
                } else {
                    Step::Shift
                }
            }
            State::BreakLine | State::FieldBody | State::Body => Step::Shift,
            State::Done => Step::Reject,
        }
    }
}

impl Machine for Rfc2822Lexer {
    type Kind = Rfc2822Token;

    fn is_idle(&self) -> bool {
        self.state == State::Idle
    }

    fn kind(&self) -> Rfc2822Token {
        self.kind
    }

    fn step(&mut self, c: u8) -> Step {
        let step = self.advance(c);
        if step == Step::Accept {
            self.state = State::Done;
        }
        step
    }

    fn finish(&mut self) -> Rfc2822Token {
        let kind = match (self.state, self.mode) {
            // A field name cut by the end of its line never got its colon.
            (State::From(_) | State::FieldName, Mode::Headers) => Rfc2822Token::Err,
            (State::BreakLine, _) => {
                self.mode = Mode::Headers;
                Rfc2822Token::MessageBreak
            }
            _ => self.kind,
        };
        self.state = State::Idle;
        self.kind = Rfc2822Token::Err;
        kind
    }

    fn newline(&mut self) {
        if self.line_start && self.mode == Mode::Headers {
            self.mode = Mode::Body;
        }
        self.line_start = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{lex, lex_kinds, newline_count, pairs_of};
    use crate::token::Rfc2822Token::*;

    const MBOX: &str = "From a@b Mon\nSubject: Hi\n there\n\nBody line\nFrom c@d\nFrom: x\n";

    #[test]
    fn mbox_with_two_messages() {
        let events = lex::<Rfc2822Lexer>(MBOX);
        assert_eq!(
            crate::testing::kinds_of(&events),
            vec![
                MessageBreak,
                FieldName,
                Colon,
                FieldBody,
                FieldBody,
                MessageBody,
                MessageBreak,
                FieldName,
                Colon,
                FieldBody
            ]
        );
        assert_eq!(newline_count(&events), 7);
    }

    #[test]
    fn field_parts_keep_their_text() {
        let events = lex::<Rfc2822Lexer>("Subject: Hi\r\n\r\nbody");
        assert_eq!(
            pairs_of(&events),
            vec![
                (FieldName, "Subject".to_string()),
                (Colon, ":".to_string()),
                (FieldBody, " Hi".to_string()),
                (MessageBody, "body".to_string()),
            ]
        );
    }

    #[test]
    fn header_line_without_colon_is_an_error() {
        assert_eq!(lex_kinds::<Rfc2822Lexer>("Bad line\n"), vec![Err]);
        assert_eq!(lex_kinds::<Rfc2822Lexer>("Fro\n"), vec![Err]);
    }

    #[test]
    fn field_name_without_colon_is_an_error() {
        assert_eq!(lex_kinds::<Rfc2822Lexer>("Subject\n"), vec![Err]);
        assert_eq!(
            lex_kinds::<Rfc2822Lexer>("Subject\nFrom: x\n"),
            vec![Err, FieldName, Colon, FieldBody]
        );
    }

    #[test]
    fn header_line_starting_with_colon_is_one_error() {
        let events = lex::<Rfc2822Lexer>("Subject: a\n: b\n");
        assert_eq!(
            pairs_of(&events),
            vec![
                (FieldName, "Subject".to_string()),
                (Colon, ":".to_string()),
                (FieldBody, " a".to_string()),
                (Err, ": b".to_string()),
            ]
        );
    }

    #[test]
    fn error_stops_at_the_colon() {
        assert_eq!(
            lex_kinds::<Rfc2822Lexer>("Bad line: x\n"),
            vec![Err, Colon, FieldBody]
        );
    }

    #[test]
    fn from_inside_a_body_line_is_body() {
        assert_eq!(
            lex_kinds::<Rfc2822Lexer>("\nFrozen\nsaid From here\n"),
            vec![MessageBody, MessageBody]
        );
    }
}
