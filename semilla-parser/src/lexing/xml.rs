//! XML lexer
//!
//!     The lexer alternates between content mode, where everything up to the next `<` is
//!     character data, and tag mode, entered by `<`, `</`, `<?` or `<!` and left by `>`, `/>`
//!     or `?>`. Comments (`<!-- ... -->`) and quoted attribute values may span lines.
//!
//!     Entities are not resolved and no well-formedness is checked beyond the token level.

use super::engine::{Machine, Step};
use crate::token::XmlToken;

fn is_name_byte(c: u8) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, b'_' | b':' | b'-' | b'.') || c >= 0x80
}

fn is_separator(c: u8) -> bool {
    matches!(
        c,
        b' ' | b'\t' | b'\n' | b'\r' | b'<' | b'>' | b'=' | b'/' | b'"' | b'\''
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Content,
    Lt,
    Bang,
    BangDash,
    Comment,
    CommentDash,
    CommentDashDash,
    Name,
    Spaces,
    AttValue,
    Slash,
    Question,
    Error,
    Done,
}

#[derive(Debug, Clone)]
pub struct XmlLexer {
    state: State,
    kind: XmlToken,
    in_tag: bool,
    expects: u8,
}

impl Default for XmlLexer {
    fn default() -> Self {
        Self {
            state: State::Idle,
            kind: XmlToken::Err,
            in_tag: false,
            expects: b'"',
        }
    }
}

impl XmlLexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// True between `<` and the `>` closing it.
    pub fn in_tag(&self) -> bool {
        self.in_tag
    }

    fn go(&mut self, state: State, kind: XmlToken) -> Step {
        self.state = state;
        self.kind = kind;
        Step::Shift
    }

    fn accept(&mut self, kind: XmlToken, in_tag: bool) -> Step {
        self.kind = kind;
        self.in_tag = in_tag;
        Step::Accept
    }

    fn fail(&mut self, c: u8) -> Step {
        self.kind = XmlToken::Err;
        self.state = State::Error;
        if is_separator(c) {
            Step::Reject
        } else {
            Step::Shift
        }
    }

    fn start(&mut self, c: u8) -> Step {
        use XmlToken::*;
        if c == b'<' {
            return self.go(State::Lt, ElementStart);
        }
        if !self.in_tag {
            return self.go(State::Content, Content);
        }
        match c {
            b' ' | b'\t' => self.go(State::Spaces, Space),
            b'=' => self.accept(Assign, true),
            b'"' | b'\'' => {
                self.expects = c;
                self.go(State::AttValue, AttValue)
            }
            b'>' => self.accept(CloseTag, false),
            b'/' => self.go(State::Slash, EmptyElementEnd),
            b'?' => self.go(State::Question, DeclEnd),
            c if is_name_byte(c) => self.go(State::Name, Name),
            _ => self.go(State::Error, Err),
        }
    }

    fn advance(&mut self, c: u8) -> Step {
        use XmlToken::*;
        match self.state {
            State::Idle => self.start(c),
            State::Content => match c {
                b'<' => Step::Reject,
                _ => Step::Shift,
            },
            State::Lt => match c {
                b'/' => self.accept(ElementEnd, true),
                b'?' => self.accept(DeclStart, true),
                b'!' => self.go(State::Bang, DeclStart),
                _ => {
                    self.in_tag = true;
                    Step::Reject
                }
            },
            State::Bang => match c {
                b'-' => {
                    self.state = State::BangDash;
                    Step::Shift
                }
                _ => {
                    self.in_tag = true;
                    Step::Reject
                }
            },
            State::BangDash => match c {
                b'-' => self.go(State::Comment, Comment),
                _ => {
                    self.in_tag = true;
                    self.fail(c)
                }
            },
            State::Comment => {
                if c == b'-' {
                    self.state = State::CommentDash;
                }
                Step::Shift
            }
            State::CommentDash => {
                self.state = match c {
                    b'-' => State::CommentDashDash,
                    _ => State::Comment,
                };
                Step::Shift
            }
            State::CommentDashDash => match c {
                b'>' => self.accept(Comment, false),
                b'-' => Step::Shift,
                _ => {
                    self.state = State::Comment;
                    Step::Shift
                }
            },
            State::Name => {
                if is_name_byte(c) {
                    Step::Shift
                } else {
                    Step::Reject
                }
            }
            State::Spaces => match c {
                b' ' | b'\t' => Step::Shift,
                _ => Step::Reject,
            },
            State::AttValue => {
                if c == self.expects {
                    Step::Accept
                } else {
                    Step::Shift
                }
            }
            State::Slash => match c {
                b'>' => self.accept(EmptyElementEnd, false),
                _ => self.fail(c),
            },
            State::Question => match c {
                b'>' => self.accept(DeclEnd, false),
                _ => self.fail(c),
            },
            State::Error => {
                if is_separator(c) {
                    Step::Reject
                } else {
                    Step::Shift
                }
            }
            State::Done => Step::Reject,
        }
    }
}

impl Machine for XmlLexer {
    type Kind = XmlToken;

    fn is_idle(&self) -> bool {
        self.state == State::Idle
    }

    fn kind(&self) -> XmlToken {
        self.kind
    }

    fn step(&mut self, c: u8) -> Step {
        let step = self.advance(c);
        if step == Step::Accept {
            self.state = State::Done;
        }
        step
    }

    fn finish(&mut self) -> XmlToken {
        let kind = match self.state {
            State::Comment
            | State::CommentDash
            | State::CommentDashDash
            | State::AttValue
            | State::BangDash
            | State::Slash
            | State::Question => XmlToken::Err,
            _ => self.kind,
        };
        if matches!(self.state, State::Lt | State::Bang) {
            self.in_tag = true;
        }
        self.state = State::Idle;
        self.kind = XmlToken::Err;
        kind
    }

    fn spans_newline(&self) -> bool {
        matches!(
            self.state,
            State::Comment | State::CommentDash | State::CommentDashDash | State::AttValue
        )
    }

    fn newline(&mut self) {
        if matches!(self.state, State::CommentDash | State::CommentDashDash) {
            self.state = State::Comment;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{lex, lex_kinds, pairs_of, texts_of};
    use crate::token::XmlToken::*;

    #[test]
    fn element_with_attribute() {
        let events = lex::<XmlLexer>(r#"<a href="x.html">hi</a>"#);
        assert_eq!(
            pairs_of(&events),
            vec![
                (ElementStart, "<".to_string()),
                (Name, "a".to_string()),
                (Space, " ".to_string()),
                (Name, "href".to_string()),
                (Assign, "=".to_string()),
                (AttValue, "\"x.html\"".to_string()),
                (CloseTag, ">".to_string()),
                (Content, "hi".to_string()),
                (ElementEnd, "</".to_string()),
                (Name, "a".to_string()),
                (CloseTag, ">".to_string()),
            ]
        );
    }

    #[test]
    fn empty_element_and_declaration() {
        assert_eq!(
            lex_kinds::<XmlLexer>("<br/>"),
            vec![ElementStart, Name, EmptyElementEnd]
        );
        assert_eq!(
            lex_kinds::<XmlLexer>("<?xml version='1.0'?>"),
            vec![DeclStart, Name, Space, Name, Assign, AttValue, DeclEnd]
        );
        assert_eq!(
            lex_kinds::<XmlLexer>("<!DOCTYPE html>"),
            vec![DeclStart, Name, Space, Name, CloseTag]
        );
    }

    #[test]
    fn comment_spans_lines() {
        let events = lex::<XmlLexer>("<!-- a\nb -->x");
        assert_eq!(texts_of(&events), vec!["<!-- a", "\n", "b -->", "x"]);
        assert_eq!(crate::testing::kinds_of(&events), vec![Comment, Content]);
    }

    #[test]
    fn garbage_in_tag_is_an_error() {
        assert_eq!(
            lex_kinds::<XmlLexer>("<a @@ b>"),
            vec![ElementStart, Name, Space, Err, Space, Name, CloseTag]
        );
    }

    #[test]
    fn unterminated_attribute_value_is_an_error() {
        assert_eq!(lex_kinds::<XmlLexer>("<a b='x"), vec![ElementStart, Name, Space, Name, Assign, Err]);
    }
}
