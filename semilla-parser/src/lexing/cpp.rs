//! C and C++ lexer
//!
//!     A token-level lexer: literals, identifiers, operators and comments are recognized, no
//!     grammar is applied on top of them.
//!
//! Numbers
//!
//!     A leading `0` is ambiguous. The machine keeps following the longest transition (`x` to
//!     hexadecimal, octal digits to octal, `8`/`9` to a pending float, `.` or an exponent to
//!     float) and only settles the literal kind once the token ends. `09` is therefore an
//!     error, while `09.5` is a floating literal.
//!
//! Characters and strings
//!
//!     Both share one set of states, parameterized by the expected closing delimiter. Escape
//!     sequences are validated: simple escapes, up to three octal digits, `\x` followed by at
//!     least one hex digit, and universal names `\u` and `\U` requiring exactly four and eight
//!     hex digits. A malformed escape turns the token into an error that extends to the next
//!     separator. A literal still open at the end of its line is an error too.
//!
//! Identifiers
//!
//!     Identifier bytes are accumulated while the token runs and classified when it ends:
//!     first against the sorted keyword table, then against the naming style. Identifiers that
//!     do not follow the style are reported as `unstyledIdentifier`.

use super::engine::{Machine, Step};
use crate::token::CppToken;
use once_cell::sync::Lazy;
use regex::Regex;

/// Sorted, so that it can be binary searched.
static KEYWORDS: &[&str] = &[
    "alignas",
    "alignof",
    "asm",
    "auto",
    "bool",
    "break",
    "case",
    "catch",
    "char",
    "char16_t",
    "char32_t",
    "class",
    "const",
    "const_cast",
    "constexpr",
    "continue",
    "decltype",
    "default",
    "delete",
    "do",
    "double",
    "dynamic_cast",
    "else",
    "enum",
    "explicit",
    "export",
    "extern",
    "false",
    "float",
    "for",
    "friend",
    "goto",
    "if",
    "inline",
    "int",
    "long",
    "mutable",
    "namespace",
    "new",
    "noexcept",
    "nullptr",
    "operator",
    "private",
    "protected",
    "public",
    "register",
    "reinterpret_cast",
    "return",
    "short",
    "signed",
    "sizeof",
    "static",
    "static_assert",
    "static_cast",
    "struct",
    "switch",
    "template",
    "this",
    "thread_local",
    "throw",
    "true",
    "try",
    "typedef",
    "typeid",
    "typename",
    "union",
    "unsigned",
    "using",
    "virtual",
    "void",
    "volatile",
    "wchar_t",
    "while",
];

/// Default naming style: lower camel case.
pub const DEFAULT_IDENTIFIER_STYLE: &str = "^[a-z0-9]+([A-Z][a-z0-9]+)*$";

static DEFAULT_STYLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(DEFAULT_IDENTIFIER_STYLE).expect("default identifier style is a valid regex")
});

fn is_separator(c: u8) -> bool {
    matches!(
        c,
        b' ' | b'\t'
            | b'\n'
            | b'\r'
            | b'\''
            | b'"'
            | b'{'
            | b'}'
            | b'['
            | b']'
            | b'('
            | b')'
            | b';'
            | b','
            | b'#'
            | b'*'
            | b'^'
            | b'~'
            | b'!'
            | b'='
            | b':'
            | b'%'
            | b'-'
            | b'+'
            | b'&'
            | b'|'
            | b'/'
            | b'<'
            | b'>'
            | b'.'
            | b'?'
    )
}

fn is_float_suffix(c: u8) -> bool {
    matches!(c, b'f' | b'F' | b'l' | b'L')
}

fn is_int_suffix(c: u8) -> bool {
    matches!(c, b'u' | b'U' | b'l' | b'L')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Identifier,
    /// After `L`, which may prefix a wide literal.
    Wide,
    /// After a leading `0`.
    Zero,
    Decimal,
    Octal,
    /// Digits after a leading `0` including an `8` or `9`; only valid as a float.
    PendingFloat,
    HexStart,
    Hex,
    IntSuffix,
    Fraction,
    Exponent,
    ExponentSign,
    ExponentDigits,
    Quoted,
    Escape,
    /// Octal escape with `n` digits read so far.
    OctalEscape(u8),
    HexEscapeStart,
    HexEscape,
    /// Universal character name with `seen` of `need` hex digits read.
    Universal {
        seen: u8,
        need: u8,
    },
    Colon,
    Percent,
    Minus,
    Arrow,
    /// Single character operator that may be followed by `expects`.
    Twin(u8),
    /// `+`, `&`, `|`: doubled or followed by `=`.
    TwinOrAssign(u8),
    Divide,
    LineComment,
    BlockComment,
    BlockCommentStar,
    Greater,
    ShiftOp,
    Less,
    Dot,
    Ellipsis,
    Spaces,
    Tabs,
    Error,
    /// The byte just accepted closed the token.
    Done,
}

/// Lexer for C and C++ sources.
#[derive(Debug, Clone)]
pub struct CppLexer {
    state: State,
    kind: CppToken,
    /// Closing delimiter of the literal in progress.
    expects: u8,
    ident: Vec<u8>,
    style: Regex,
}

impl Default for CppLexer {
    fn default() -> Self {
        Self::with_style(DEFAULT_STYLE.clone())
    }
}

impl CppLexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A lexer that checks identifiers against `style` instead of lower camel case.
    pub fn with_style(style: Regex) -> Self {
        Self {
            state: State::Idle,
            kind: CppToken::Err,
            expects: 0,
            ident: Vec::new(),
            style,
        }
    }

    fn go(&mut self, state: State, kind: CppToken) -> Step {
        self.state = state;
        self.kind = kind;
        Step::Shift
    }

    fn accept(&mut self, kind: CppToken) -> Step {
        self.kind = kind;
        Step::Accept
    }

    /// Switches to error recovery. A separator is left to the next token.
    fn fail(&mut self, c: u8) -> Step {
        self.kind = CppToken::Err;
        self.state = State::Error;
        if is_separator(c) {
            Step::Reject
        } else {
            Step::Shift
        }
    }

    fn start(&mut self, c: u8) -> Step {
        use CppToken::*;
        match c {
            b'L' => {
                self.ident.push(c);
                self.go(State::Wide, Identifier)
            }
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                self.ident.push(c);
                self.go(State::Identifier, Identifier)
            }
            b'0' => self.go(State::Zero, DecimalLiteral),
            b'1'..=b'9' => self.go(State::Decimal, DecimalLiteral),
            b'\'' => self.quote(c, CharacterLiteral),
            b'"' => self.quote(c, StringLiteral),
            b'{' | b'}' | b'[' | b']' | b'(' | b')' | b';' | b',' => self.accept(Punctuator),
            b'?' => self.accept(Operator),
            b'#' => self.go(State::Twin(b'#'), Preprocessing),
            b'*' | b'^' | b'~' | b'!' | b'=' => self.go(State::Twin(b'='), Operator),
            b':' => self.go(State::Colon, Punctuator),
            b'%' => self.go(State::Percent, Operator),
            b'-' => self.go(State::Minus, Operator),
            b'+' | b'&' | b'|' => self.go(State::TwinOrAssign(c), Operator),
            b'/' => self.go(State::Divide, Operator),
            b'>' => self.go(State::Greater, Operator),
            b'<' => self.go(State::Less, Operator),
            b'.' => self.go(State::Dot, Operator),
            b' ' => self.go(State::Spaces, Space),
            b'\t' => self.go(State::Tabs, TabSpace),
            _ => {
                self.kind = Err;
                self.state = State::Error;
                Step::Shift
            }
        }
    }

    fn quote(&mut self, delimiter: u8, kind: CppToken) -> Step {
        self.expects = delimiter;
        self.go(State::Quoted, kind)
    }

    fn quoted(&mut self, c: u8) -> Step {
        match c {
            b'\\' => {
                self.state = State::Escape;
                Step::Shift
            }
            c if c == self.expects => Step::Accept,
            _ => Step::Shift,
        }
    }

    fn escape(&mut self, c: u8) -> Step {
        self.state = match c {
            b'\'' | b'"' | b'?' | b'\\' | b'a' | b'b' | b'f' | b'n' | b'r' | b't' | b'v' => {
                State::Quoted
            }
            b'0'..=b'7' => State::OctalEscape(1),
            b'x' => State::HexEscapeStart,
            b'u' => State::Universal { seen: 0, need: 4 },
            b'U' => State::Universal { seen: 0, need: 8 },
            _ => return self.fail(c),
        };
        Step::Shift
    }

    fn number(&mut self, c: u8, separated: CppToken) -> Step {
        if is_separator(c) {
            self.kind = separated;
            Step::Reject
        } else {
            self.fail(c)
        }
    }

    fn classify(&self) -> CppToken {
        if let Ok(word) = std::str::from_utf8(&self.ident) {
            if KEYWORDS.binary_search(&word).is_ok() {
                return match word {
                    "true" | "false" => CppToken::BooleanLiteral,
                    _ => CppToken::Keyword,
                };
            }
            if self.style.is_match(word) {
                return CppToken::Identifier;
            }
        }
        CppToken::UnstyledIdentifier
    }
}

impl Machine for CppLexer {
    type Kind = CppToken;

    fn is_idle(&self) -> bool {
        self.state == State::Idle
    }

    fn kind(&self) -> CppToken {
        self.kind
    }

    fn step(&mut self, c: u8) -> Step {
        let step = self.advance(c);
        if step == Step::Accept {
            self.state = State::Done;
        }
        step
    }

    fn finish(&mut self) -> CppToken {
        let kind = match self.state {
            State::Identifier | State::Wide => self.classify(),
            State::Quoted
            | State::Escape
            | State::OctalEscape(_)
            | State::HexEscapeStart
            | State::HexEscape
            | State::Universal { .. }
            | State::HexStart
            | State::Exponent
            | State::ExponentSign
            | State::Ellipsis
            | State::PendingFloat => CppToken::Err,
            _ => self.kind,
        };
        self.state = State::Idle;
        self.kind = CppToken::Err;
        self.ident.clear();
        kind
    }

    fn spans_newline(&self) -> bool {
        matches!(self.state, State::BlockComment | State::BlockCommentStar)
    }

    fn continues_lines(&self) -> bool {
        true
    }

    fn escaping(&self) -> bool {
        self.state == State::Escape
    }

    fn newline(&mut self) {
        if self.state == State::BlockCommentStar {
            self.state = State::BlockComment;
        }
    }
}

impl CppLexer {
    fn advance(&mut self, c: u8) -> Step {
        use CppToken::*;
        match self.state {
            State::Done => Step::Reject,
            State::Idle => self.start(c),
            State::Wide => match c {
                b'\'' => self.quote(c, CharacterLiteral),
                b'"' => self.quote(c, StringLiteral),
                c if is_separator(c) => Step::Reject,
                _ => {
                    self.ident.push(c);
                    self.state = State::Identifier;
                    Step::Shift
                }
            },
            State::Identifier => {
                if is_separator(c) {
                    Step::Reject
                } else {
                    self.ident.push(c);
                    Step::Shift
                }
            }
            State::Zero => match c {
                b'x' | b'X' => self.go(State::HexStart, HexadecimalLiteral),
                b'0'..=b'7' => self.go(State::Octal, OctalLiteral),
                b'8' | b'9' => self.go(State::PendingFloat, Err),
                b'.' => self.go(State::Fraction, FloatingLiteral),
                b'e' | b'E' => self.go(State::Exponent, FloatingLiteral),
                c if is_int_suffix(c) => self.go(State::IntSuffix, DecimalLiteral),
                _ => self.number(c, DecimalLiteral),
            },
            State::Octal => match c {
                b'0'..=b'7' => Step::Shift,
                b'8' | b'9' => self.go(State::PendingFloat, Err),
                b'.' => self.go(State::Fraction, FloatingLiteral),
                b'e' | b'E' => self.go(State::Exponent, FloatingLiteral),
                c if is_int_suffix(c) => self.go(State::IntSuffix, OctalLiteral),
                _ => self.number(c, OctalLiteral),
            },
            State::PendingFloat => match c {
                b'0'..=b'9' => Step::Shift,
                b'.' => self.go(State::Fraction, FloatingLiteral),
                b'e' | b'E' => self.go(State::Exponent, FloatingLiteral),
                _ => self.number(c, Err),
            },
            State::Decimal => match c {
                b'0'..=b'9' => Step::Shift,
                b'.' => self.go(State::Fraction, FloatingLiteral),
                b'e' | b'E' => self.go(State::Exponent, FloatingLiteral),
                c if is_int_suffix(c) => self.go(State::IntSuffix, DecimalLiteral),
                _ => self.number(c, DecimalLiteral),
            },
            State::HexStart => {
                if c.is_ascii_hexdigit() {
                    self.state = State::Hex;
                    Step::Shift
                } else {
                    self.fail(c)
                }
            }
            State::Hex => match c {
                c if c.is_ascii_hexdigit() => Step::Shift,
                c if is_int_suffix(c) => self.go(State::IntSuffix, HexadecimalLiteral),
                _ => self.number(c, HexadecimalLiteral),
            },
            State::IntSuffix => match c {
                c if is_int_suffix(c) => Step::Shift,
                _ => {
                    let kind = self.kind;
                    self.number(c, kind)
                }
            },
            State::Fraction => match c {
                b'0'..=b'9' => Step::Shift,
                b'e' | b'E' => {
                    self.state = State::Exponent;
                    Step::Shift
                }
                c if is_float_suffix(c) => Step::Accept,
                _ => self.number(c, FloatingLiteral),
            },
            State::Exponent => match c {
                b'0'..=b'9' => {
                    self.state = State::ExponentDigits;
                    Step::Shift
                }
                b'+' | b'-' => {
                    self.state = State::ExponentSign;
                    Step::Shift
                }
                _ => self.fail(c),
            },
            State::ExponentSign => match c {
                b'0'..=b'9' => {
                    self.state = State::ExponentDigits;
                    Step::Shift
                }
                _ => self.fail(c),
            },
            State::ExponentDigits => match c {
                b'0'..=b'9' => Step::Shift,
                c if is_float_suffix(c) => Step::Accept,
                _ => self.number(c, FloatingLiteral),
            },
            State::Quoted => self.quoted(c),
            State::Escape => self.escape(c),
            State::OctalEscape(n) => match c {
                b'0'..=b'7' if n < 3 => {
                    self.state = if n == 2 {
                        State::Quoted
                    } else {
                        State::OctalEscape(n + 1)
                    };
                    Step::Shift
                }
                _ => {
                    self.state = State::Quoted;
                    self.quoted(c)
                }
            },
            State::HexEscapeStart => {
                if c.is_ascii_hexdigit() {
                    self.state = State::HexEscape;
                    Step::Shift
                } else {
                    self.fail(c)
                }
            }
            State::HexEscape => {
                if c.is_ascii_hexdigit() {
                    Step::Shift
                } else {
                    self.state = State::Quoted;
                    self.quoted(c)
                }
            }
            State::Universal { seen, need } => {
                if !c.is_ascii_hexdigit() {
                    return self.fail(c);
                }
                self.state = if seen + 1 == need {
                    State::Quoted
                } else {
                    State::Universal {
                        seen: seen + 1,
                        need,
                    }
                };
                Step::Shift
            }
            State::Colon => match c {
                b':' | b'>' => Step::Accept,
                _ => Step::Reject,
            },
            State::Percent => match c {
                b'>' | b':' | b'=' => Step::Accept,
                _ => Step::Reject,
            },
            State::Minus => match c {
                b'-' | b'=' => Step::Accept,
                b'>' => {
                    self.state = State::Arrow;
                    Step::Shift
                }
                _ => Step::Reject,
            },
            State::Arrow => match c {
                b'*' => Step::Accept,
                _ => Step::Reject,
            },
            State::Twin(expects) => {
                if c == expects {
                    Step::Accept
                } else {
                    Step::Reject
                }
            }
            State::TwinOrAssign(first) => {
                if c == first || c == b'=' {
                    Step::Accept
                } else {
                    Step::Reject
                }
            }
            State::Divide => match c {
                b'=' => Step::Accept,
                b'/' => self.go(State::LineComment, Comment),
                b'*' => self.go(State::BlockComment, Comment),
                _ => Step::Reject,
            },
            State::LineComment => Step::Shift,
            State::BlockComment => {
                if c == b'*' {
                    self.state = State::BlockCommentStar;
                }
                Step::Shift
            }
            State::BlockCommentStar => match c {
                b'/' => Step::Accept,
                b'*' => Step::Shift,
                _ => {
                    self.state = State::BlockComment;
                    Step::Shift
                }
            },
            State::Greater => match c {
                b'=' => Step::Accept,
                b'>' => {
                    self.state = State::ShiftOp;
                    Step::Shift
                }
                _ => Step::Reject,
            },
            State::ShiftOp => match c {
                b'=' => Step::Accept,
                _ => Step::Reject,
            },
            State::Less => match c {
                b'=' | b':' | b'%' => Step::Accept,
                b'<' => {
                    self.state = State::ShiftOp;
                    Step::Shift
                }
                _ => Step::Reject,
            },
            State::Dot => match c {
                b'.' => {
                    self.state = State::Ellipsis;
                    Step::Shift
                }
                b'*' => Step::Accept,
                b'0'..=b'9' => self.go(State::Fraction, FloatingLiteral),
                _ => Step::Reject,
            },
            State::Ellipsis => match c {
                b'.' => Step::Accept,
                _ => self.fail(c),
            },
            State::Spaces => match c {
                b' ' => Step::Shift,
                _ => Step::Reject,
            },
            State::Tabs => match c {
                b'\t' => Step::Shift,
                _ => Step::Reject,
            },
            State::Error => {
                if is_separator(c) {
                    Step::Reject
                } else {
                    Step::Shift
                }
            }
        }
    }
}
