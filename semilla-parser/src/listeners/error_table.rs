//! Accumulates compiler diagnostics into table rows.

use super::Listener;
use crate::decorating::HtmlEscaper;
use crate::token::DiagnosticToken;
use serde::Serialize;
use std::io::{self, Write};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub file: String,
    pub line: Option<u32>,
    pub column: Option<u32>,
    pub message: String,
}

/// Listener for the diagnostics lexer that turns each `path:line: message` line into a
/// [Diagnostic]. Indented lines are appended to the previous message; lines that are not
/// diagnostics are ignored.
#[derive(Debug, Default)]
pub struct ErrorTable {
    rows: Vec<Diagnostic>,
    current: Option<Diagnostic>,
    numbers: usize,
    piece: Vec<u8>,
}

impl ErrorTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[Diagnostic] {
        &self.rows
    }

    /// Closes a diagnostic left open by input without a final newline.
    pub fn close(&mut self) {
        self.end_line();
    }

    pub fn into_rows(mut self) -> Vec<Diagnostic> {
        self.close();
        self.rows
    }

    /// Writes one `<tr>` per diagnostic.
    pub fn write_html(&self, out: &mut dyn Write) -> io::Result<()> {
        for row in &self.rows {
            out.write_all(b"<tr><td>")?;
            HtmlEscaper::escape_to(row.file.as_bytes(), out)?;
            out.write_all(b"</td><td>")?;
            if let Some(line) = row.line {
                write!(out, "{line}")?;
            }
            out.write_all(b"</td><td>")?;
            HtmlEscaper::escape_to(row.message.as_bytes(), out)?;
            out.write_all(b"</td></tr>\n")?;
        }
        Ok(())
    }

    fn end_line(&mut self) {
        if let Some(row) = self.current.take() {
            self.rows.push(row);
        }
        self.numbers = 0;
    }

    fn complete(&mut self, kind: DiagnosticToken, text: &str) {
        match kind {
            DiagnosticToken::Filename => {
                self.current = Some(Diagnostic {
                    file: text.to_string(),
                    line: None,
                    column: None,
                    message: String::new(),
                });
            }
            DiagnosticToken::LineNum => {
                if let Some(row) = self.current.as_mut() {
                    let number = text.parse().ok();
                    match self.numbers {
                        0 => row.line = number,
                        _ => row.column = number,
                    }
                    self.numbers += 1;
                }
            }
            DiagnosticToken::Message => {
                let message = text.trim();
                let row = match self.current.as_mut() {
                    Some(row) => row,
                    None => match self.rows.last_mut() {
                        Some(row) => row,
                        None => return,
                    },
                };
                if !row.message.is_empty() {
                    row.message.push(' ');
                }
                row.message.push_str(message);
            }
            DiagnosticToken::Separator => {}
            DiagnosticToken::Err => self.current = None,
        }
    }
}

impl Listener<DiagnosticToken> for ErrorTable {
    fn token(
        &mut self,
        kind: DiagnosticToken,
        text: &[u8],
        first: usize,
        last: usize,
        fragment: bool,
    ) {
        self.piece.extend_from_slice(&text[first..last]);
        if !fragment {
            let piece = std::mem::take(&mut self.piece);
            self.complete(kind, &String::from_utf8_lossy(&piece));
        }
    }

    fn newline(&mut self, _text: &[u8], _first: usize, _last: usize) {
        self.end_line();
    }
}
