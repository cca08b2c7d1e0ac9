//! Shell lexer: separates comments from code
//!
//!     `#` starts a comment when it begins a word outside quotes, so `$#`, `${#x}` and
//!     `"#"` stay code. Quoted strings may span lines; a backslash escapes the next byte
//!     outside single quotes.

use super::engine::{Machine, Step};
use crate::token::ShToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Code,
    CodeEscape,
    SingleQuoted,
    DoubleQuoted,
    DoubleQuotedEscape,
    Comment,
}

#[derive(Debug, Clone)]
pub struct ShLexer {
    state: State,
    kind: ShToken,
    /// Whether the previous code byte ends a word.
    word_break: bool,
}

impl Default for ShLexer {
    fn default() -> Self {
        Self {
            state: State::Idle,
            kind: ShToken::Err,
            word_break: true,
        }
    }
}

impl ShLexer {
    pub fn new() -> Self {
        Self::default()
    }

    fn code(&mut self, c: u8) -> Step {
        self.state = match c {
            b'#' if self.word_break => {
                self.word_break = true;
                return Step::Reject;
            }
            b'\\' => State::CodeEscape,
            b'\'' => State::SingleQuoted,
            b'"' => State::DoubleQuoted,
            _ => State::Code,
        };
        self.word_break = matches!(c, b' ' | b'\t' | b';' | b'|' | b'&' | b'(' | b')');
        Step::Shift
    }
}

impl Machine for ShLexer {
    type Kind = ShToken;

    fn is_idle(&self) -> bool {
        self.state == State::Idle
    }

    fn kind(&self) -> ShToken {
        self.kind
    }

    fn step(&mut self, c: u8) -> Step {
        match self.state {
            State::Idle if c == b'#' => {
                self.state = State::Comment;
                self.kind = ShToken::Comment;
                Step::Shift
            }
            State::Idle => {
                self.kind = ShToken::Code;
                self.word_break = true;
                self.code(c)
            }
            State::Code => self.code(c),
            State::CodeEscape => {
                self.state = State::Code;
                self.word_break = false;
                Step::Shift
            }
            State::SingleQuoted => {
                if c == b'\'' {
                    self.state = State::Code;
                }
                Step::Shift
            }
            State::DoubleQuoted => {
                self.state = match c {
                    b'"' => State::Code,
                    b'\\' => State::DoubleQuotedEscape,
                    _ => State::DoubleQuoted,
                };
                Step::Shift
            }
            State::DoubleQuotedEscape => {
                self.state = State::DoubleQuoted;
                Step::Shift
            }
            State::Comment => Step::Shift,
        }
    }

    fn finish(&mut self) -> ShToken {
        let kind = self.kind;
        self.state = State::Idle;
        self.kind = ShToken::Err;
        self.word_break = true;
        kind
    }

    fn spans_newline(&self) -> bool {
        matches!(
            self.state,
            State::SingleQuoted | State::DoubleQuoted | State::DoubleQuotedEscape
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{lex, pairs_of};
    use crate::token::ShToken::*;

    #[test]
    fn trailing_comment() {
        let events = lex::<ShLexer>("echo $# hi # done\n# whole line\n");
        assert_eq!(
            pairs_of(&events),
            vec![
                (Code, "echo $# hi ".to_string()),
                (Comment, "# done".to_string()),
                (Comment, "# whole line".to_string()),
            ]
        );
    }

    #[test]
    fn hash_inside_quotes_is_code() {
        let events = lex::<ShLexer>("grep '#' x \"a #b\" \\# y");
        assert_eq!(
            pairs_of(&events),
            vec![(Code, "grep '#' x \"a #b\" \\# y".to_string())]
        );
    }

    #[test]
    fn quoted_string_spans_lines() {
        let events = lex::<ShLexer>("echo 'a\n# b' # c");
        assert_eq!(
            crate::testing::kinds_of(&events),
            vec![Code, Comment]
        );
        assert_eq!(
            crate::testing::texts_of(&events),
            vec!["echo 'a", "\n", "# b' ", "# c"]
        );
    }
}
