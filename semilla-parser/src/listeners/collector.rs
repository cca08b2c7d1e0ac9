//! Records every event, mostly for tests and token dumps.

use super::Listener;
use crate::token::TokenKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event<K> {
    Token {
        kind: K,
        text: Vec<u8>,
        fragment: bool,
    },
    Newline(Vec<u8>),
}

impl<K: TokenKind> Event<K> {
    pub fn token(kind: K, text: &str, fragment: bool) -> Self {
        Event::Token {
            kind,
            text: text.as_bytes().to_vec(),
            fragment,
        }
    }

    pub fn newline(text: &str) -> Self {
        Event::Newline(text.as_bytes().to_vec())
    }

    pub fn text(&self) -> &[u8] {
        match self {
            Event::Token { text, .. } | Event::Newline(text) => text,
        }
    }

    /// Title of the token kind, or `newline`.
    pub fn title(&self) -> &'static str {
        match self {
            Event::Token { kind, .. } => kind.title(),
            Event::Newline(_) => "newline",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TokenCollector<K> {
    events: Vec<Event<K>>,
}

impl<K: TokenKind> TokenCollector<K> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn events(&self) -> &[Event<K>] {
        &self.events
    }

    pub fn into_events(self) -> Vec<Event<K>> {
        self.events
    }

    /// Concatenation of every piece and newline, which is the tokenized input.
    pub fn text(&self) -> Vec<u8> {
        self.events.iter().flat_map(|e| e.text().iter().copied()).collect()
    }

    /// Events with fragments folded into the piece that follows them.
    ///
    /// A run of pieces ends at a non-fragment piece or at a newline; the run takes the kind of
    /// its last piece. A run interrupted by a newline (a block comment, say) stays a fragment.
    pub fn merged(&self) -> Vec<Event<K>> {
        let mut out = Vec::with_capacity(self.events.len());
        let mut run: Option<(K, Vec<u8>)> = None;
        for event in &self.events {
            match event {
                Event::Token {
                    kind,
                    text,
                    fragment,
                } => {
                    let (run_kind, run_text) = run.get_or_insert_with(|| (*kind, Vec::new()));
                    *run_kind = *kind;
                    run_text.extend_from_slice(text);
                    if !fragment {
                        if let Some((kind, text)) = run.take() {
                            out.push(Event::Token {
                                kind,
                                text,
                                fragment: false,
                            });
                        }
                    }
                }
                Event::Newline(text) => {
                    if let Some((kind, run_text)) = run.take() {
                        out.push(Event::Token {
                            kind,
                            text: run_text,
                            fragment: true,
                        });
                    }
                    out.push(Event::Newline(text.clone()));
                }
            }
        }
        if let Some((kind, text)) = run {
            out.push(Event::Token {
                kind,
                text,
                fragment: true,
            });
        }
        out
    }

    /// Kinds of the merged, complete tokens.
    pub fn kinds(&self) -> Vec<K> {
        self.merged()
            .into_iter()
            .filter_map(|event| match event {
                Event::Token {
                    kind,
                    fragment: false,
                    ..
                } => Some(kind),
                _ => None,
            })
            .collect()
    }
}

impl<K: TokenKind> Default for TokenCollector<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: TokenKind> Listener<K> for TokenCollector<K> {
    fn token(&mut self, kind: K, text: &[u8], first: usize, last: usize, fragment: bool) {
        self.events.push(Event::Token {
            kind,
            text: text[first..last].to_vec(),
            fragment,
        });
    }

    fn newline(&mut self, text: &[u8], first: usize, last: usize) {
        self.events.push(Event::Newline(text[first..last].to_vec()));
    }
}
