//! Testing utilities
//!
//!     Helpers shared by the unit tests of every lexer and by the integration tests. They all
//!     go through the public [Tokenizer] API, feeding the input either whole or in chunks, so
//!     tests exercise exactly the code paths a decorator would.
//!
//!     The merged view ([TokenCollector::merged]) is what most assertions look at: fragments
//!     are folded into whole tokens, which makes expectations independent of where buffers
//!     happen to be split.

use crate::lexing::{Machine, Tokenizer};
use crate::listeners::{Event, TokenCollector};
use crate::token::TokenKind;

/// Tokenizes `input` in chunks of `chunk` bytes (at least one) and flushes.
pub fn lex_chunks<M: Machine + Default>(input: &[u8], chunk: usize) -> TokenCollector<M::Kind> {
    let mut tokenizer = Tokenizer::<M>::new();
    let mut collector = TokenCollector::new();
    for piece in input.chunks(chunk.max(1)) {
        tokenizer.tokenize(piece, &mut collector);
    }
    tokenizer.flush(&mut collector);
    collector
}

/// Tokenizes `input` at the given split points and flushes.
pub fn lex_split<M: Machine + Default>(input: &[u8], splits: &[usize]) -> TokenCollector<M::Kind> {
    let mut tokenizer = Tokenizer::<M>::new();
    let mut collector = TokenCollector::new();
    let mut points: Vec<usize> = splits.iter().map(|&p| p.min(input.len())).collect();
    points.sort_unstable();
    let mut start = 0;
    for point in points.into_iter().chain(std::iter::once(input.len())) {
        if point > start {
            tokenizer.tokenize(&input[start..point], &mut collector);
            start = point;
        }
    }
    tokenizer.flush(&mut collector);
    collector
}

/// Merged events of `input` tokenized in one call.
pub fn lex<M: Machine + Default>(input: &str) -> Vec<Event<M::Kind>> {
    let mut tokenizer = Tokenizer::<M>::new();
    let mut collector = TokenCollector::new();
    tokenizer.tokenize_all(input.as_bytes(), &mut collector);
    collector.merged()
}

/// Kinds of the complete tokens of `input`.
pub fn lex_kinds<M: Machine + Default>(input: &str) -> Vec<M::Kind> {
    kinds_of(&lex::<M>(input))
}

/// Kinds of the complete (non-fragment) tokens among `events`.
pub fn kinds_of<K: TokenKind>(events: &[Event<K>]) -> Vec<K> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::Token {
                kind,
                fragment: false,
                ..
            } => Some(*kind),
            _ => None,
        })
        .collect()
}

/// Text of every event, newlines included.
pub fn texts_of<K: TokenKind>(events: &[Event<K>]) -> Vec<String> {
    events
        .iter()
        .map(|event| String::from_utf8_lossy(event.text()).into_owned())
        .collect()
}

pub fn newline_count<K: TokenKind>(events: &[Event<K>]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, Event::Newline(_)))
        .count()
}

/// `(kind, text)` of complete tokens, for compact assertions.
pub fn pairs_of<K: TokenKind>(events: &[Event<K>]) -> Vec<(K, String)> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::Token {
                kind,
                text,
                fragment: false,
            } => Some((*kind, String::from_utf8_lossy(text).into_owned())),
            _ => None,
        })
        .collect()
}
