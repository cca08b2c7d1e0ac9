//! Token kinds and token records
//!
//!     Every text format owns a closed set of token kinds. Kinds are plain `Copy` enums with a
//!     stable title (`decimalLiteral`, `fieldBody`, ...) that doubles as the markup class name
//!     written by the highlighting decorators, so titles must never change once published.
//!
//!     Each set carries an `Err` member: lexical errors are reported as tokens of that kind,
//!     never as Rust errors.

use serde::Serialize;
use std::fmt;
use std::ops::Range;

pub mod kinds;

pub use kinds::{
    CppToken, DiagnosticToken, HrefToken, MarkdownToken, Rfc2822Token, ShToken, XmlEscToken,
    XmlToken,
};

/// Behavior shared by every per-format token kind.
pub trait TokenKind: Copy + Eq + fmt::Debug + 'static {
    /// The kind reported for unrecognized input.
    const ERR: Self;

    /// Stable name of the kind, used as markup class name.
    fn title(self) -> &'static str;
}

/// One emitted piece of a token.
///
/// `span` indexes into the buffer handed to the listener together with the token. A logical
/// token split across buffers is reported as several pieces; all but the last have
/// `fragment` set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token<K> {
    pub kind: K,
    pub span: Range<usize>,
    pub fragment: bool,
}

impl<K: TokenKind> Token<K> {
    pub fn new(kind: K, first: usize, last: usize, fragment: bool) -> Self {
        Self {
            kind,
            span: first..last,
            fragment,
        }
    }

    pub fn is_err(&self) -> bool {
        self.kind == K::ERR
    }
}

impl<K: TokenKind> fmt::Display for Token<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{},{})", self.kind.title(), self.span.start, self.span.end)?;
        if self.fragment {
            write!(f, "+")?;
        }
        Ok(())
    }
}
