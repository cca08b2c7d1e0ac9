//! Listeners
//!
//!     A listener receives the events produced by a [Tokenizer](crate::lexing::Tokenizer), in
//!     stream order and without gaps: every input byte belongs to exactly one token piece or
//!     one newline event. Offsets are relative to the `text` slice passed with each call.
//!
//!     Two families live here:
//!
//!         - Plain listeners implementing [Listener] directly: [TokenCollector] records events,
//!           [Annotator] writes an XML-like trace of every piece, [ErrorTable] accumulates
//!           compiler diagnostics into rows.
//!         - [Renderer]s, which write markup into a sink handed to them per call. Decorators
//!           own a renderer and hand it the sink they wrap; see [render].

use crate::token::TokenKind;

pub mod annotate;
pub mod collector;
pub mod error_table;
pub mod render;

pub use annotate::Annotator;
pub use collector::{Event, TokenCollector};
pub use error_table::{Diagnostic, ErrorTable};
pub use render::{EscapeRenderer, Renderer, Rendering, SpanRenderer, Verbatim};

/// Receiver of token and newline events.
pub trait Listener<K: TokenKind> {
    /// A token piece `text[first..last]`. `fragment` is set on every piece of a token but
    /// the last one.
    fn token(&mut self, kind: K, text: &[u8], first: usize, last: usize, fragment: bool);

    /// A newline `text[first..last]` (LF, CR or CRLF).
    fn newline(&mut self, text: &[u8], first: usize, last: usize);
}

impl<K: TokenKind, L: Listener<K> + ?Sized> Listener<K> for &mut L {
    fn token(&mut self, kind: K, text: &[u8], first: usize, last: usize, fragment: bool) {
        (**self).token(kind, text, first, last, fragment)
    }

    fn newline(&mut self, text: &[u8], first: usize, last: usize) {
        (**self).newline(text, first, last)
    }
}
