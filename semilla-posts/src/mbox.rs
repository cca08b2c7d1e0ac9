//! Reading posts out of mbox files.
//!
//! The rfc2822 tokenizer does the splitting; the listener here only collects header fields
//! and body lines, and turns each message into a [Post] when the next `From ` line (or the
//! end of input) closes it.

use crate::error::PostError;
use crate::filters::PostFilter;
use crate::post::Post;
use chrono::{DateTime, Utc};
use semilla_parser::lexing::Rfc2822Tokenizer;
use semilla_parser::token::Rfc2822Token;
use semilla_parser::Listener;
use std::io::Read;
use tracing::{debug, warn};

const CHUNK: usize = 8 * 1024;

/// Collects the parts of the message being read.
#[derive(Debug, Default)]
struct Extractor {
    piece: Vec<u8>,
    field: Option<String>,
    value: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
    in_body: bool,
    line_has_token: bool,
    ready: Vec<Post>,
}

impl Extractor {
    fn end_field(&mut self) {
        if let Some(name) = self.field.take() {
            let value = std::mem::take(&mut self.value);
            self.headers.push((name, value.trim().to_string()));
        }
    }

    fn end_message(&mut self) {
        self.end_field();
        let headers = std::mem::take(&mut self.headers);
        let body = std::mem::take(&mut self.body);
        self.in_body = false;
        if headers.is_empty() && body.is_empty() {
            return;
        }
        let mut post = Post::default();
        for (name, value) in headers {
            match name.to_ascii_lowercase().as_str() {
                "subject" => post.title = value,
                "from" => post.author = value,
                "message-id" => post.guid = value.trim_matches(['<', '>']).to_string(),
                "date" => match DateTime::parse_from_rfc2822(&value) {
                    Ok(time) => post.time = time.with_timezone(&Utc),
                    Err(error) => warn!(%error, date = %value, "unreadable date"),
                },
                "score" => match value.parse() {
                    Ok(score) => post.score = score,
                    Err(error) => warn!(%error, score = %value, "unreadable score"),
                },
                "tags" | "keywords" => post.tag = value,
                _ => {}
            }
        }
        let body = String::from_utf8_lossy(&body);
        post.content = body
            .trim_end_matches(['\r', '\n'])
            .lines()
            .map(|line| match line.strip_prefix('>') {
                Some(rest) if rest.trim_start_matches('>').starts_with("From ") => rest,
                _ => line,
            })
            .collect::<Vec<_>>()
            .join("\n");
        post.normalize();
        self.ready.push(post);
    }

    fn complete(&mut self, kind: Rfc2822Token, text: &[u8]) {
        let text = String::from_utf8_lossy(text);
        match kind {
            Rfc2822Token::FieldName => {
                self.end_field();
                self.field = Some(text.trim().to_string());
            }
            Rfc2822Token::FieldBody => {
                if self.field.is_some() {
                    if !self.value.is_empty() {
                        self.value.push(' ');
                    }
                    self.value.push_str(text.trim());
                }
            }
            Rfc2822Token::MessageBody => {
                self.in_body = true;
                self.body.extend_from_slice(text.as_bytes());
            }
            Rfc2822Token::MessageBreak => self.end_message(),
            Rfc2822Token::Colon | Rfc2822Token::Err => {}
        }
    }
}

impl Listener<Rfc2822Token> for Extractor {
    fn token(
        &mut self,
        kind: Rfc2822Token,
        text: &[u8],
        first: usize,
        last: usize,
        fragment: bool,
    ) {
        self.line_has_token = true;
        self.piece.extend_from_slice(&text[first..last]);
        if !fragment {
            let piece = std::mem::take(&mut self.piece);
            self.complete(kind, &piece);
        }
    }

    fn newline(&mut self, _text: &[u8], _first: usize, _last: usize) {
        let blank = !std::mem::replace(&mut self.line_has_token, false);
        if self.in_body {
            self.body.push(b'\n');
        } else if blank && (self.field.is_some() || !self.headers.is_empty()) {
            self.end_field();
            self.in_body = true;
        }
    }
}

/// Reads mbox input and feeds one [Post] per message into a filter.
///
/// The reader does not flush the filter: several mailboxes can feed one pass.
#[derive(Debug, Default)]
pub struct MboxReader {
    tokenizer: Rfc2822Tokenizer,
    extractor: Extractor,
    messages: usize,
}

impl MboxReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of posts produced so far.
    pub fn messages(&self) -> usize {
        self.messages
    }

    fn relay(&mut self, next: &mut dyn PostFilter) -> Result<(), PostError> {
        for post in std::mem::take(&mut self.extractor.ready) {
            self.messages += 1;
            next.filters(&post)?;
        }
        Ok(())
    }

    /// Feeds the next part of the input. Messages completed by it are relayed.
    pub fn feed(&mut self, input: &[u8], next: &mut dyn PostFilter) -> Result<(), PostError> {
        self.tokenizer.tokenize(input, &mut self.extractor);
        self.relay(next)
    }

    /// Declares the end of input and relays the last message.
    pub fn finish(&mut self, next: &mut dyn PostFilter) -> Result<(), PostError> {
        self.tokenizer.flush(&mut self.extractor);
        self.extractor.end_message();
        self.relay(next)?;
        debug!(messages = self.messages, "mailbox read");
        Ok(())
    }

    /// Reads a whole mailbox from `reader`.
    pub fn read_from<R: Read>(
        &mut self,
        mut reader: R,
        next: &mut dyn PostFilter,
    ) -> Result<(), PostError> {
        let mut buf = vec![0; CHUNK];
        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }
            self.feed(&buf[..n], next)?;
        }
        self.finish(next)
    }
}
